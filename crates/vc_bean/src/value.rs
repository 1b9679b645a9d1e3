use alloc::boxed::Box;
use core::any::{Any, type_name};
use core::fmt;

use serde_core::{Serialize, Serializer};

use crate::category::Category;

// -----------------------------------------------------------------------------
// ObjectData

/// Reference-typed property values.
///
/// Implemented for every `Serialize + Debug + Send + Sync + 'static` type.
pub trait ObjectData: erased_serde::Serialize + Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
    fn value_type_path(&self) -> &'static str;
}

impl<T: Serialize + Any + Send + Sync + fmt::Debug> ObjectData for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    #[inline]
    fn value_type_path(&self) -> &'static str {
        type_name::<T>()
    }
}

// -----------------------------------------------------------------------------
// ObjectValue

/// A type-erased, serializable object value.
///
/// # Examples
///
/// ```
/// use vc_bean::ObjectValue;
///
/// let value = ObjectValue::new(String::from("hello"));
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "hello");
///
/// let value = value.take::<u8>().unwrap_err();
/// assert_eq!(value.take::<String>().unwrap(), "hello");
/// ```
pub struct ObjectValue(Box<dyn ObjectData>);

impl ObjectValue {
    #[inline]
    pub fn new<T: ObjectData>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Returns the type path of the contained value.
    #[inline]
    pub fn value_type_path(&self) -> &'static str {
        self.0.value_type_path()
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Moves the contained value out, or gives `self` back on a type mismatch.
    pub fn take<T: Any>(self) -> Result<T, Self> {
        if self.is::<T>() {
            match self.0.into_any().downcast::<T>() {
                Ok(value) => Ok(*value),
                // `is::<T>` was checked above.
                Err(_) => unreachable!(),
            }
        } else {
            Err(self)
        }
    }
}

impl fmt::Debug for ObjectValue {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl Serialize for ObjectValue {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        erased_serde::serialize(&*self.0, serializer)
    }
}

// -----------------------------------------------------------------------------
// Value

/// The generic value representation of the property pipeline.
///
/// Primitives are stored unboxed, objects as an [`ObjectValue`].
#[derive(Debug)]
pub enum Value {
    Boolean(bool),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Object(ObjectValue),
}

impl Value {
    /// Returns the category this value belongs to.
    pub const fn category(&self) -> Category {
        match self {
            Value::Boolean(_) => Category::Boolean,
            Value::Short(_) => Category::Short,
            Value::Int(_) => Category::Int,
            Value::Long(_) => Category::Long,
            Value::Float(_) => Category::Float,
            Value::Double(_) => Category::Double,
            Value::Object(_) => Category::Object,
        }
    }

    /// Wraps an object value.
    #[inline]
    pub fn object<T: ObjectData>(value: T) -> Self {
        Value::Object(ObjectValue::new(value))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Boolean(v) => serializer.serialize_bool(*v),
            Value::Short(v) => serializer.serialize_i16(*v),
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::Long(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f32(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::Object(v) => v.serialize(serializer),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
