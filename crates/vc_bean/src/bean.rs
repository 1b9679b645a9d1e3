use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::marker::PhantomData;

use crate::descriptor::PropertyDescriptor;
use crate::type_map::TypeIdMap;

// -----------------------------------------------------------------------------
// Bean & FromType

/// A type the mapper can serialize and deserialize property by property.
///
/// # Examples
///
/// ```
/// use vc_bean::{Bean, BeanDescription, Member, PropertyDescriptor};
///
/// struct Point { x: i32, y: i32 }
///
/// impl Bean for Point {
///     fn describe() -> BeanDescription {
///         BeanDescription::builder::<Point>()
///             .property(
///                 PropertyDescriptor::primitive::<Point, i32>("x")
///                     .getter(Member::method("x"), |p| p.x)
///                     .setter(Member::method("set_x"), |p, v| p.x = v),
///             )
///             .property(
///                 PropertyDescriptor::primitive::<Point, i32>("y")
///                     .getter(Member::method("y"), |p| p.y),
///             )
///             .build()
///     }
/// }
///
/// let info = Point::describe();
/// assert_eq!(info.type_ident(), "Point");
/// assert_eq!(info.properties().len(), 2);
/// assert!(info.property("y").unwrap().setter().is_none());
/// ```
pub trait Bean: Any + Send + Sync {
    fn describe() -> BeanDescription;
}

/// A type trait created for a concrete bean type `T`.
///
/// Type traits carry capabilities that need `T` at compile time (typed
/// code paths) through the type-erased [`BeanDescription`].
pub trait FromType<T> {
    fn from_type() -> Self;
}

// -----------------------------------------------------------------------------
// BeanDescription

/// Type-level information of a [`Bean`]: identity, ordered properties and type traits.
#[derive(Clone)]
pub struct BeanDescription {
    type_id: TypeId,
    type_path: &'static str,
    properties: Vec<Arc<PropertyDescriptor>>,
    traits: TypeIdMap<Arc<dyn Any + Send + Sync>>,
}

impl BeanDescription {
    /// Starts a description of bean `T`.
    #[inline]
    pub fn builder<T: Any + Send + Sync>() -> BeanBuilder<T> {
        BeanBuilder {
            description: BeanDescription {
                type_id: TypeId::of::<T>(),
                type_path: type_name::<T>(),
                properties: Vec::new(),
                traits: TypeIdMap::new(),
            },
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Full type path, e.g. `my_crate::model::Point`.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// The last segment of the type path, without generics.
    pub fn type_ident(&self) -> &'static str {
        let path = match self.type_path.find('<') {
            Some(end) => &self.type_path[..end],
            None => self.type_path,
        };
        match path.rfind("::") {
            Some(start) => &path[start + 2..],
            None => path,
        }
    }

    /// Properties in declaration order.
    #[inline]
    pub fn properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Arc<PropertyDescriptor>> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Returns the type trait `D`, if the bean registered one.
    #[inline]
    pub fn get_trait<D: Any>(&self) -> Option<&D> {
        self.traits.get_type::<D>().and_then(|t| t.downcast_ref::<D>())
    }

    #[inline]
    pub fn has_trait<D: Any>(&self) -> bool {
        self.traits.contains(&TypeId::of::<D>())
    }
}

impl fmt::Debug for BeanDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDescription")
            .field("type_path", &self.type_path)
            .field("properties", &self.properties)
            .field("traits", &self.traits.len())
            .finish()
    }
}

/// Builder of a [`BeanDescription`].
pub struct BeanBuilder<T> {
    description: BeanDescription,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> BeanBuilder<T> {
    /// Appends a property. Declaration order is kept.
    ///
    /// # Panics
    ///
    /// Panics if the property belongs to another bean type.
    pub fn property(mut self, property: impl Into<PropertyDescriptor>) -> Self {
        let property = property.into();
        assert!(
            property.bean_type() == self.description.type_id,
            "property `{}` of `{}` added to `{}`",
            property.name(),
            property.bean_type_path(),
            self.description.type_path,
        );
        self.description.properties.push(Arc::new(property));
        self
    }

    /// Registers the type trait `D`, replacing an earlier one.
    pub fn with_trait<D: FromType<T> + Any + Send + Sync>(mut self) -> Self {
        self.description
            .traits
            .insert(TypeId::of::<D>(), Arc::new(D::from_type()));
        self
    }

    #[inline]
    pub fn build(self) -> BeanDescription {
        self.description
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::type_name;

    use super::{BeanDescription, FromType};
    use crate::descriptor::{Member, PropertyDescriptor};

    struct Sample {
        a: i32,
    }

    struct Generic<T>(T);

    struct NameTrait(&'static str);

    impl<T> FromType<T> for NameTrait {
        fn from_type() -> Self {
            NameTrait(type_name::<T>())
        }
    }

    #[test]
    fn type_ident_strips_path_and_generics() {
        let info = BeanDescription::builder::<Generic<u8>>().build();
        assert_eq!(info.type_ident(), "Generic");
        assert!(info.type_path().ends_with("Generic<u8>"));
    }

    #[test]
    fn type_traits_are_created_for_the_bean() {
        let info = BeanDescription::builder::<Sample>()
            .property(PropertyDescriptor::primitive::<Sample, i32>("a").getter(Member::method("a"), |s| s.a))
            .with_trait::<NameTrait>()
            .build();
        assert!(info.has_trait::<NameTrait>());
        assert_eq!(info.get_trait::<NameTrait>().unwrap().0, type_name::<Sample>());
        assert!(info.property("a").is_some());
        assert!(info.property("b").is_none());
    }

    #[test]
    #[should_panic]
    fn foreign_property_is_rejected() {
        let _ = BeanDescription::builder::<Sample>()
            .property(PropertyDescriptor::primitive::<Generic<u8>, i32>("a").getter(Member::method("a"), |_| 0))
            .build();
    }
}
