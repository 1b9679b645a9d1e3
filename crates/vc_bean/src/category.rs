use core::fmt;

use crate::value::Value;

// -----------------------------------------------------------------------------
// Category

/// The closed set of value categories a property can be declared with.
///
/// Each primitive category owns its own index space when properties are
/// grouped for indexed access. [`Category::Object`] covers every
/// reference-typed property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Boolean,
    Short,
    Int,
    Long,
    Float,
    Double,
    Object,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 7;

    /// All categories, in [`index`](Self::index) order.
    pub const ALL: [Category; Self::COUNT] = [
        Category::Boolean,
        Category::Short,
        Category::Int,
        Category::Long,
        Category::Float,
        Category::Double,
        Category::Object,
    ];

    /// Dense position of the category, usable as an array index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for every category except [`Category::Object`].
    #[inline]
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Category::Object)
    }

    /// Lower-case name, e.g. `"int"`.
    pub const fn name(self) -> &'static str {
        match self {
            Category::Boolean => "boolean",
            Category::Short => "short",
            Category::Int => "int",
            Category::Long => "long",
            Category::Float => "float",
            Category::Double => "double",
            Category::Object => "object",
        }
    }
}

impl fmt::Display for Category {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// Primitive

mod sealed {
    pub trait Sealed {}
}

/// A Rust primitive backing one of the primitive [`Category`]s.
///
/// Besides the category tag, the trait carries the two conversion rule
/// sets shared by every property path:
///
/// - narrowing from a generic [`Value`] (`from_value`), and
/// - coercion from raw input tokens (`from_i64`, `from_f64`, `parse`, ...),
///   used by [`decode_primitive`](crate::decode::decode_primitive).
///
/// This trait is sealed.
pub trait Primitive: Copy + Send + Sync + fmt::Debug + PartialEq + 'static + sealed::Sealed {
    /// The category tag of this primitive.
    const CATEGORY: Category;
    /// The value a `null` token decodes to.
    const DEFAULT: Self;

    /// Wraps the primitive in its [`Value`] variant.
    fn into_value(self) -> Value;

    /// Narrows a generic value.
    ///
    /// Numeric primitives accept every numeric variant and convert it with
    /// Rust's `as` semantics; `bool` only accepts [`Value::Boolean`].
    fn from_value(value: &Value) -> Option<Self>;

    fn from_i64(value: i64) -> Self;
    fn from_u64(value: u64) -> Self;
    fn from_f64(value: f64) -> Self;
    fn from_bool(value: bool) -> Self;
    fn parse(text: &str) -> Option<Self>;
}

macro_rules! impl_numeric_primitive {
    ($ty:ty, $category:ident, $default:expr) => {
        impl sealed::Sealed for $ty {}

        impl Primitive for $ty {
            const CATEGORY: Category = Category::$category;
            const DEFAULT: Self = $default;

            #[inline]
            fn into_value(self) -> Value {
                Value::$category(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match *value {
                    Value::Short(v) => Some(v as $ty),
                    Value::Int(v) => Some(v as $ty),
                    Value::Long(v) => Some(v as $ty),
                    Value::Float(v) => Some(v as $ty),
                    Value::Double(v) => Some(v as $ty),
                    Value::Boolean(_) | Value::Object(_) => None,
                }
            }

            #[inline]
            fn from_i64(value: i64) -> Self {
                value as $ty
            }

            #[inline]
            fn from_u64(value: u64) -> Self {
                value as $ty
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            #[inline]
            fn from_bool(value: bool) -> Self {
                if value { 1 as $ty } else { 0 as $ty }
            }

            fn parse(text: &str) -> Option<Self> {
                let text = text.trim();
                text.parse::<$ty>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().map(|v| v as $ty))
            }
        }
    };
}

impl_numeric_primitive!(i16, Short, 0);
impl_numeric_primitive!(i32, Int, 0);
impl_numeric_primitive!(i64, Long, 0);
impl_numeric_primitive!(f32, Float, 0.0);
impl_numeric_primitive!(f64, Double, 0.0);

impl sealed::Sealed for bool {}

impl Primitive for bool {
    const CATEGORY: Category = Category::Boolean;
    const DEFAULT: Self = false;

    #[inline]
    fn into_value(self) -> Value {
        Value::Boolean(self)
    }

    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::Boolean(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    fn from_i64(value: i64) -> Self {
        value != 0
    }

    #[inline]
    fn from_u64(value: u64) -> Self {
        value != 0
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value != 0.0
    }

    #[inline]
    fn from_bool(value: bool) -> Self {
        value
    }

    fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Category, Primitive};
    use crate::value::Value;

    #[test]
    fn category_index_is_dense() {
        for (index, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), index);
        }
        assert!(!Category::Object.is_primitive());
        assert_eq!(Category::Long.to_string(), "long");
    }

    #[test]
    fn numeric_narrowing() {
        assert_eq!(i32::from_value(&Value::Long(7)), Some(7));
        assert_eq!(i32::from_value(&Value::Double(3.9)), Some(3));
        assert_eq!(i64::from_value(&Value::Short(-2)), Some(-2));
        assert_eq!(i32::from_value(&Value::Boolean(true)), None);
        assert_eq!(bool::from_value(&Value::Int(1)), None);
        assert_eq!(bool::from_value(&Value::Boolean(true)), Some(true));
    }

    #[test]
    fn token_coercion() {
        assert_eq!(i32::parse(" 42 "), Some(42));
        assert_eq!(i32::parse("4.5"), Some(4));
        assert_eq!(i32::parse("four"), None);
        assert_eq!(i16::from_bool(true), 1);
        assert!(bool::from_i64(-1));
        assert_eq!(f32::from_i64(3), 3.0);
    }
}
