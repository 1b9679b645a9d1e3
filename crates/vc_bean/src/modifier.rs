use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::bean::BeanDescription;
use crate::mapper::BeanMapper;
use crate::settable::SettableProperty;
use crate::writer::PropertyWriter;

/// Hook run once per bean type before its writer list is finalized.
///
/// Modifiers run in registration order, each receiving the output of
/// the previous one.
pub trait SerializerModifier: Send + Sync {
    fn change_properties(
        &self,
        bean: &BeanDescription,
        properties: Vec<Arc<dyn PropertyWriter>>,
    ) -> Vec<Arc<dyn PropertyWriter>>;
}

/// Hook run once per bean type before its settable list is finalized.
pub trait DeserializerModifier: Send + Sync {
    fn update_properties(
        &self,
        bean: &BeanDescription,
        properties: Vec<Arc<dyn SettableProperty>>,
    ) -> Vec<Arc<dyn SettableProperty>>;
}

/// A bundle of extensions installed into a [`BeanMapper`].
pub trait Module {
    fn name(&self) -> &str;

    fn setup(&self, mapper: &mut BeanMapper);
}
