use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::category::Category;
use crate::decode::ValueDecoder;
use crate::descriptor::PropertyDescriptor;
use crate::error::PropertyError;
use crate::value::Value;

// -----------------------------------------------------------------------------
// SettableProperty

/// A property object used during deserialization: pushes one value into a bean.
pub trait SettableProperty: Send + Sync + fmt::Debug {
    /// The serialized name.
    fn name(&self) -> &str;

    fn descriptor(&self) -> &Arc<PropertyDescriptor>;

    #[inline]
    fn category(&self) -> Category {
        self.descriptor().category()
    }

    /// The decoder used by [`deserialize_and_set`](Self::deserialize_and_set).
    fn decoder(&self) -> &ValueDecoder;

    /// Sets an already decoded value.
    fn set(&self, bean: &mut dyn Any, value: Value) -> Result<(), PropertyError>;

    /// Decodes the next input token and sets it.
    fn deserialize_and_set(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
        bean: &mut dyn Any,
    ) -> Result<(), PropertyError>;

    /// Re-derives this property under a different serialized name.
    fn with_name(&self, name: Cow<'static, str>) -> Arc<dyn SettableProperty>;

    /// Re-derives this property with a different decoder.
    fn with_decoder(&self, decoder: ValueDecoder) -> Arc<dyn SettableProperty>;

    fn as_any(&self) -> &dyn Any;
}

// -----------------------------------------------------------------------------
// ReflectSettableProperty

/// The generic settable: decodes through its [`ValueDecoder`] and invokes
/// the descriptor's reflective setter.
#[derive(Debug, Clone)]
pub struct ReflectSettableProperty {
    name: Cow<'static, str>,
    descriptor: Arc<PropertyDescriptor>,
    decoder: ValueDecoder,
}

impl ReflectSettableProperty {
    /// Returns `None` if the property has no setter.
    pub fn new(descriptor: Arc<PropertyDescriptor>) -> Option<Self> {
        descriptor.setter()?;
        Some(Self {
            name: descriptor.name_cow(),
            decoder: descriptor.decoder().clone(),
            descriptor,
        })
    }
}

impl SettableProperty for ReflectSettableProperty {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn descriptor(&self) -> &Arc<PropertyDescriptor> {
        &self.descriptor
    }

    #[inline]
    fn decoder(&self) -> &ValueDecoder {
        &self.decoder
    }

    fn set(&self, bean: &mut dyn Any, value: Value) -> Result<(), PropertyError> {
        match self.descriptor.setter() {
            Some(setter) => setter.invoke(bean, value),
            None => Err(PropertyError::NotWritable {
                property: self.name.clone(),
                bean: self.descriptor.bean_type_path(),
            }),
        }
    }

    fn deserialize_and_set(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
        bean: &mut dyn Any,
    ) -> Result<(), PropertyError> {
        let value = self
            .decoder
            .decode(deserializer)
            .map_err(|source| PropertyError::Decode {
                property: self.name.clone(),
                source,
            })?;
        self.set(bean, value)
    }

    fn with_name(&self, name: Cow<'static, str>) -> Arc<dyn SettableProperty> {
        Arc::new(Self {
            name,
            ..self.clone()
        })
    }

    fn with_decoder(&self, decoder: ValueDecoder) -> Arc<dyn SettableProperty> {
        Arc::new(Self {
            decoder,
            ..self.clone()
        })
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}
