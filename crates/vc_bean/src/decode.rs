//! Reading property values from input tokens.
//!
//! Every property path (generic or otherwise) decodes through the
//! functions in this module, so a value always decodes the same way
//! regardless of which property object consumes it.

use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::fmt;
use core::marker::PhantomData;

use serde_core::Deserializer;
use serde_core::de::{DeserializeOwned, Error, Visitor};

use crate::category::{Category, Primitive};
use crate::value::{ObjectData, Value};

// -----------------------------------------------------------------------------
// Primitive decoding

struct PrimitiveVisitor<P>(PhantomData<P>);

impl<'de, P: Primitive> Visitor<'de> for PrimitiveVisitor<P> {
    type Value = P;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a value coercible to {}", P::CATEGORY)
    }

    #[inline]
    fn visit_bool<E: Error>(self, v: bool) -> Result<P, E> {
        Ok(P::from_bool(v))
    }

    #[inline]
    fn visit_i64<E: Error>(self, v: i64) -> Result<P, E> {
        Ok(P::from_i64(v))
    }

    #[inline]
    fn visit_u64<E: Error>(self, v: u64) -> Result<P, E> {
        Ok(P::from_u64(v))
    }

    #[inline]
    fn visit_f64<E: Error>(self, v: f64) -> Result<P, E> {
        Ok(P::from_f64(v))
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<P, E> {
        P::parse(v).ok_or_else(|| E::custom(format_args!("cannot decode `{v}` as {}", P::CATEGORY)))
    }

    #[inline]
    fn visit_unit<E: Error>(self) -> Result<P, E> {
        Ok(P::DEFAULT)
    }

    #[inline]
    fn visit_none<E: Error>(self) -> Result<P, E> {
        Ok(P::DEFAULT)
    }

    #[inline]
    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<P, D::Error> {
        deserializer.deserialize_any(self)
    }
}

/// Decodes a primitive from the next input token.
///
/// Integers, floats, booleans, numeric strings and `null` are coerced:
/// floats are truncated, booleans map to `1`/`0`, `null` maps to
/// [`Primitive::DEFAULT`]. Unparseable strings fail.
///
/// # Examples
///
/// ```
/// use vc_bean::decode::decode_primitive;
///
/// let mut json = serde_json::Deserializer::from_str("\"17\"");
/// let mut erased = <dyn erased_serde::Deserializer>::erase(&mut json);
/// assert_eq!(decode_primitive::<i32>(&mut erased).unwrap(), 17);
/// ```
#[inline]
pub fn decode_primitive<'de, P: Primitive>(
    deserializer: &mut dyn erased_serde::Deserializer<'de>,
) -> Result<P, erased_serde::Error> {
    deserializer.deserialize_any(PrimitiveVisitor::<P>(PhantomData))
}

// -----------------------------------------------------------------------------
// ValueDecoder

type DecodeFn =
    dyn for<'de> Fn(&mut dyn erased_serde::Deserializer<'de>) -> Result<Value, erased_serde::Error>
        + Send
        + Sync;

#[inline]
fn decode_fn<F>(func: F) -> Arc<DecodeFn>
where
    F: for<'de> Fn(&mut dyn erased_serde::Deserializer<'de>) -> Result<Value, erased_serde::Error>
        + Send
        + Sync
        + 'static,
{
    Arc::new(func)
}

/// Turns the next input token into a generic [`Value`].
///
/// Every property owns one. The default decoder of a primitive property
/// is [`decode_primitive`]; property objects may be re-derived with a
/// custom decoder, in which case [`is_default`](Self::is_default)
/// reports `false`.
#[derive(Clone)]
pub struct ValueDecoder {
    name: Cow<'static, str>,
    category: Category,
    default: bool,
    func: Arc<DecodeFn>,
}

impl ValueDecoder {
    /// The default decoder of a primitive category.
    pub fn primitive<P: Primitive>() -> Self {
        Self {
            name: Cow::Borrowed(P::CATEGORY.name()),
            category: P::CATEGORY,
            default: true,
            func: decode_fn(|de| decode_primitive::<P>(de).map(P::into_value)),
        }
    }

    /// The default decoder of an object property, driven by `T`'s `Deserialize`.
    pub fn object<T: ObjectData + DeserializeOwned>() -> Self {
        Self {
            name: Cow::Borrowed(core::any::type_name::<T>()),
            category: Category::Object,
            default: true,
            func: decode_fn(|de| erased_serde::deserialize::<T>(de).map(Value::object)),
        }
    }

    /// A custom decoder producing values of `category`.
    pub fn custom<F>(name: impl Into<Cow<'static, str>>, category: Category, func: F) -> Self
    where
        F: for<'de> Fn(&mut dyn erased_serde::Deserializer<'de>) -> Result<Value, erased_serde::Error>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            category,
            default: false,
            func: decode_fn(func),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns `true` if this is the category's default decoder.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.default
    }

    #[inline]
    pub fn decode<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        (self.func)(deserializer)
    }
}

impl fmt::Debug for ValueDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueDecoder")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("default", &self.default)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{ValueDecoder, decode_primitive};
    use crate::category::{Category, Primitive};
    use crate::value::Value;

    fn decode_json<P: Primitive>(input: &str) -> Result<P, erased_serde::Error> {
        let mut json = serde_json::Deserializer::from_str(input);
        let mut erased = <dyn erased_serde::Deserializer>::erase(&mut json);
        decode_primitive::<P>(&mut erased)
    }

    #[test]
    fn lenient_primitive_tokens() {
        assert_eq!(decode_json::<i32>("12").unwrap(), 12);
        assert_eq!(decode_json::<i32>("12.75").unwrap(), 12);
        assert_eq!(decode_json::<i32>("\"-8\"").unwrap(), -8);
        assert_eq!(decode_json::<i32>("true").unwrap(), 1);
        assert_eq!(decode_json::<i64>("null").unwrap(), 0);
        assert_eq!(decode_json::<f64>("3").unwrap(), 3.0);
        assert!(decode_json::<bool>("1").unwrap());
        assert!(!decode_json::<bool>("\"false\"").unwrap());
        assert!(decode_json::<i16>("\"x\"").is_err());
        assert!(decode_json::<i32>("[1]").is_err());
    }

    #[test]
    fn default_and_custom_decoders() {
        let int = ValueDecoder::primitive::<i32>();
        assert!(int.is_default());
        assert_eq!(int.category(), Category::Int);

        let mut json = serde_json::Deserializer::from_str("\"5\"");
        let mut erased = <dyn erased_serde::Deserializer>::erase(&mut json);
        assert!(matches!(int.decode(&mut erased).unwrap(), Value::Int(5)));

        let object = ValueDecoder::object::<String>();
        let mut json = serde_json::Deserializer::from_str("\"abc\"");
        let mut erased = <dyn erased_serde::Deserializer>::erase(&mut json);
        let Value::Object(value) = object.decode(&mut erased).unwrap() else {
            panic!("expected an object value");
        };
        assert_eq!(value.downcast_ref::<String>().unwrap(), "abc");

        let doubled = ValueDecoder::custom("doubled", Category::Int, |de| {
            decode_primitive::<i32>(de).map(|v| Value::Int(v * 2))
        });
        assert!(!doubled.is_default());
        let mut json = serde_json::Deserializer::from_str("21");
        let mut erased = <dyn erased_serde::Deserializer>::erase(&mut json);
        assert!(matches!(doubled.decode(&mut erased).unwrap(), Value::Int(42)));
    }
}
