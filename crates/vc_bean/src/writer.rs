use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::category::Category;
use crate::descriptor::PropertyDescriptor;
use crate::error::PropertyError;
use crate::value::Value;

// -----------------------------------------------------------------------------
// PropertyWriter

/// A property object used during serialization: pulls one value out of a bean.
pub trait PropertyWriter: Send + Sync + fmt::Debug {
    /// The serialized name.
    fn name(&self) -> &str;

    fn descriptor(&self) -> &Arc<PropertyDescriptor>;

    #[inline]
    fn category(&self) -> Category {
        self.descriptor().category()
    }

    /// Reads the property value from `bean`.
    fn get(&self, bean: &dyn Any) -> Result<Value, PropertyError>;

    /// Re-derives this writer under a different serialized name.
    fn rename(&self, name: Cow<'static, str>) -> Arc<dyn PropertyWriter>;

    fn as_any(&self) -> &dyn Any;
}

// -----------------------------------------------------------------------------
// ReflectPropertyWriter

/// The generic writer: invokes the descriptor's reflective getter.
#[derive(Debug, Clone)]
pub struct ReflectPropertyWriter {
    name: Cow<'static, str>,
    descriptor: Arc<PropertyDescriptor>,
}

impl ReflectPropertyWriter {
    /// Returns `None` if the property has no getter.
    pub fn new(descriptor: Arc<PropertyDescriptor>) -> Option<Self> {
        descriptor.getter()?;
        Some(Self {
            name: descriptor.name_cow(),
            descriptor,
        })
    }
}

impl PropertyWriter for ReflectPropertyWriter {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn descriptor(&self) -> &Arc<PropertyDescriptor> {
        &self.descriptor
    }

    fn get(&self, bean: &dyn Any) -> Result<Value, PropertyError> {
        match self.descriptor.getter() {
            Some(getter) => getter.invoke(bean),
            None => Err(PropertyError::NotReadable {
                property: self.name.clone(),
                bean: self.descriptor.bean_type_path(),
            }),
        }
    }

    fn rename(&self, name: Cow<'static, str>) -> Arc<dyn PropertyWriter> {
        Arc::new(Self {
            name,
            descriptor: self.descriptor.clone(),
        })
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}
