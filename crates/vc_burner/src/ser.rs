use alloc::borrow::Cow;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use vc_bean::{
    BeanDescription, PropertyDescriptor, PropertyError, PropertyWriter, ReflectPropertyWriter, SerializerModifier,
    Value,
};

use crate::classify::classify_getter;
use crate::collector::{PropertyCollector, PropertySlot, Side};
use crate::dispatch::BeanPropertyAccessor;
use crate::module::BurnerConfig;
use crate::scope::DispatcherScope;

// -----------------------------------------------------------------------------
// OptimizedPropertyWriter

/// A [`PropertyWriter`] that reads through a generated dispatcher.
///
/// Wraps the generic writer it replaces. Until a dispatcher is bound
/// (see [`with_accessor`](Self::with_accessor)) every read goes to the
/// wrapped writer, so an unbound instance behaves exactly like the
/// original.
#[derive(Debug, Clone)]
pub struct OptimizedPropertyWriter {
    original: Arc<dyn PropertyWriter>,
    slot: PropertySlot,
    accessor: Option<Arc<dyn BeanPropertyAccessor>>,
}

impl OptimizedPropertyWriter {
    /// Creates an unbound writer dispatching to `slot` once bound.
    #[inline]
    pub fn new(original: Arc<dyn PropertyWriter>, slot: PropertySlot) -> Self {
        Self {
            original,
            slot,
            accessor: None,
        }
    }

    /// Returns a copy bound to `accessor`.
    #[inline]
    pub fn with_accessor(&self, accessor: Arc<dyn BeanPropertyAccessor>) -> Self {
        Self {
            accessor: Some(accessor),
            ..self.clone()
        }
    }

    #[inline]
    pub fn slot(&self) -> PropertySlot {
        self.slot
    }

    #[inline]
    pub fn original(&self) -> &Arc<dyn PropertyWriter> {
        &self.original
    }

    #[inline]
    pub fn accessor(&self) -> Option<&Arc<dyn BeanPropertyAccessor>> {
        self.accessor.as_ref()
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.accessor.is_some()
    }
}

impl PropertyWriter for OptimizedPropertyWriter {
    #[inline]
    fn name(&self) -> &str {
        self.original.name()
    }

    #[inline]
    fn descriptor(&self) -> &Arc<PropertyDescriptor> {
        self.original.descriptor()
    }

    fn get(&self, bean: &dyn Any) -> Result<Value, PropertyError> {
        match &self.accessor {
            Some(accessor) => Ok(accessor.read(bean, self.slot)?),
            None => self.original.get(bean),
        }
    }

    fn rename(&self, name: Cow<'static, str>) -> Arc<dyn PropertyWriter> {
        Arc::new(Self {
            original: self.original.rename(name),
            ..self.clone()
        })
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// -----------------------------------------------------------------------------
// BurnerSerializerModifier

/// Replaces eligible generic writers of a bean with [`OptimizedPropertyWriter`]s
/// sharing one read dispatcher.
///
/// Writers installed by other modifiers, and properties whose getter is
/// ineligible, are passed through unchanged. If no dispatcher can be
/// obtained the input list is returned as is.
#[derive(Debug, Clone)]
pub struct BurnerSerializerModifier {
    scope: Arc<DispatcherScope>,
    config: BurnerConfig,
}

impl BurnerSerializerModifier {
    #[inline]
    pub fn new(scope: Arc<DispatcherScope>, config: BurnerConfig) -> Self {
        Self { scope, config }
    }

    fn collect(&self, collector: &mut PropertyCollector, writer: &Arc<dyn PropertyWriter>) -> Option<PropertySlot> {
        if !writer.as_any().is::<ReflectPropertyWriter>() {
            log::trace!("keeping custom writer `{}`", writer.name());
            return None;
        }
        let descriptor = writer.descriptor();
        let Some(category) = classify_getter(descriptor, &self.config) else {
            log::trace!("`{}` is not eligible for optimized reads", writer.name());
            return None;
        };
        Some(collector.add_property(Arc::clone(descriptor), category))
    }
}

impl SerializerModifier for BurnerSerializerModifier {
    fn change_properties(
        &self,
        bean: &BeanDescription,
        properties: Vec<Arc<dyn PropertyWriter>>,
    ) -> Vec<Arc<dyn PropertyWriter>> {
        let mut collector = PropertyCollector::new(Side::Read);
        let stubs: Vec<Option<OptimizedPropertyWriter>> = properties
            .iter()
            .map(|writer| {
                self.collect(&mut collector, writer)
                    .map(|slot| OptimizedPropertyWriter::new(Arc::clone(writer), slot))
            })
            .collect();

        if collector.is_empty() {
            return properties;
        }

        let plan = collector.into_plan(bean);
        let accessor = match self.scope.get_or_create_accessor(bean, &plan) {
            Ok(accessor) => accessor,
            Err(e) => {
                log::warn!("keeping generic writers for `{}`: {e}", bean.type_path());
                return properties;
            }
        };

        properties
            .into_iter()
            .zip(stubs)
            .map(|(writer, stub)| match stub {
                Some(stub) => Arc::new(stub.with_accessor(Arc::clone(&accessor))) as Arc<dyn PropertyWriter>,
                None => writer,
            })
            .collect()
    }
}

// -----------------------------------------------------------------------------
// Tests
