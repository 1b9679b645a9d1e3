use alloc::sync::Arc;
use core::any::Any;

use serde_core::ser::{Error, SerializeMap};
use serde_core::{Serialize, Serializer};

use crate::writer::PropertyWriter;

/// A bean bound to its writer list, serialized as a map of properties.
///
/// Created by [`BeanMapper::serializable`](super::BeanMapper::serializable).
pub struct BeanSerializer<'a> {
    bean: &'a dyn Any,
    type_path: &'static str,
    writers: Arc<[Arc<dyn PropertyWriter>]>,
}

impl<'a> BeanSerializer<'a> {
    #[inline]
    pub(super) fn new(
        bean: &'a dyn Any,
        type_path: &'static str,
        writers: Arc<[Arc<dyn PropertyWriter>]>,
    ) -> Self {
        Self {
            bean,
            type_path,
            writers,
        }
    }
}

impl Serialize for BeanSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(self.writers.len()))?;
        for writer in self.writers.iter() {
            let value = writer.get(self.bean).map_err(|e| {
                S::Error::custom(format_args!("failed to serialize `{}`: {e}", self.type_path))
            })?;
            state.serialize_entry(writer.name(), &value)?;
        }
        state.end()
    }
}
