//! A small serde-driven bean mapper.
//!
//! The mapper owns the per-type property lists. On first use of a bean
//! type it creates the generic reflective property objects, runs the
//! installed modifiers over them once, and caches the result.

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::SettableTable;
pub use ser::BeanSerializer;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use serde_core::Deserializer;

use crate::bean::{Bean, BeanDescription};
use crate::modifier::{DeserializerModifier, Module, SerializerModifier};
use crate::settable::{ReflectSettableProperty, SettableProperty};
use crate::type_map::TypeIdMap;
use crate::writer::{PropertyWriter, ReflectPropertyWriter};

// -----------------------------------------------------------------------------
// BeanMapper

/// Serializes and deserializes [`Bean`]s through their property objects.
///
/// # Examples
///
/// ```
/// use vc_bean::{Bean, BeanDescription, BeanMapper, Member, PropertyDescriptor};
///
/// #[derive(Default)]
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
///                     .getter(Member::method("y"), |p| p.y)
///                     .setter(Member::method("set_y"), |p, v| p.y = v),
///             )
///             .build()
///     }
/// }
///
/// let mapper = BeanMapper::new();
/// let json = serde_json::to_string(&mapper.serializable(&Point { x: 1, y: 2 })).unwrap();
/// assert_eq!(json, r#"{"x":1,"y":2}"#);
///
/// let mut de = serde_json::Deserializer::from_str(r#"{"y":5,"x":"4"}"#);
/// let point: Point = mapper.deserialize(&mut de).unwrap();
/// assert_eq!((point.x, point.y), (4, 5));
/// ```
pub struct BeanMapper {
    modules: Vec<String>,
    serializer_modifiers: Vec<Arc<dyn SerializerModifier>>,
    deserializer_modifiers: Vec<Arc<dyn DeserializerModifier>>,
    fail_on_unknown_properties: bool,
    descriptions: RwLock<TypeIdMap<Arc<BeanDescription>>>,
    writers: RwLock<TypeIdMap<Arc<[Arc<dyn PropertyWriter>]>>>,
    settables: RwLock<TypeIdMap<Arc<SettableTable>>>,
}

impl Default for BeanMapper {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Looks up `type_id`, building the value outside the lock on a miss.
///
/// Concurrent builders may race; the first insert wins and every caller
/// returns that entry.
fn get_or_build<V: Clone>(
    table: &RwLock<TypeIdMap<V>>,
    type_id: TypeId,
    build: impl FnOnce() -> V,
) -> V {
    if let Some(found) = table
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&type_id)
    {
        return found.clone();
    }
    let built = build();
    table
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert(type_id, || built)
        .clone()
}

impl BeanMapper {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            serializer_modifiers: Vec::new(),
            deserializer_modifiers: Vec::new(),
            fail_on_unknown_properties: true,
            descriptions: RwLock::new(TypeIdMap::new()),
            writers: RwLock::new(TypeIdMap::new()),
            settables: RwLock::new(TypeIdMap::new()),
        }
    }

    /// Fail (`true`, the default) or skip when the input names a property
    /// the bean does not have.
    #[inline]
    pub fn fail_on_unknown_properties(mut self, fail: bool) -> Self {
        self.fail_on_unknown_properties = fail;
        self
    }

    /// Installs a module. Registering the same module name twice is a no-op.
    pub fn register_module(&mut self, module: &impl Module) -> &mut Self {
        if self.modules.iter().any(|name| name == module.name()) {
            log::debug!("module `{}` is already registered", module.name());
            return self;
        }
        self.modules.push(String::from(module.name()));
        module.setup(self);
        self
    }

    /// Names of the installed modules, in registration order.
    #[inline]
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Appends a serializer modifier and drops cached writer lists.
    pub fn add_serializer_modifier(&mut self, modifier: Arc<dyn SerializerModifier>) -> &mut Self {
        self.serializer_modifiers.push(modifier);
        self.writers.get_mut().unwrap_or_else(PoisonError::into_inner).clear();
        self
    }

    /// Appends a deserializer modifier and drops cached settable lists.
    pub fn add_deserializer_modifier(&mut self, modifier: Arc<dyn DeserializerModifier>) -> &mut Self {
        self.deserializer_modifiers.push(modifier);
        self.settables.get_mut().unwrap_or_else(PoisonError::into_inner).clear();
        self
    }

    /// Returns the cached description of `T`.
    pub fn description<T: Bean>(&self) -> Arc<BeanDescription> {
        get_or_build(&self.descriptions, TypeId::of::<T>(), || Arc::new(T::describe()))
    }

    /// Returns the writer list of `T`, built and modified on first use.
    pub fn writers<T: Bean>(&self) -> Arc<[Arc<dyn PropertyWriter>]> {
        get_or_build(&self.writers, TypeId::of::<T>(), || {
            let description = self.description::<T>();
            let mut writers = description
                .properties()
                .iter()
                .filter_map(|p| ReflectPropertyWriter::new(p.clone()))
                .map(|w| Arc::new(w) as Arc<dyn PropertyWriter>)
                .collect::<Vec<_>>();
            for modifier in &self.serializer_modifiers {
                writers = modifier.change_properties(&description, writers);
            }
            writers.into()
        })
    }

    /// Returns the settable table of `T`, built and modified on first use.
    pub fn settables<T: Bean>(&self) -> Arc<SettableTable> {
        get_or_build(&self.settables, TypeId::of::<T>(), || {
            let description = self.description::<T>();
            let mut settables = description
                .properties()
                .iter()
                .filter_map(|p| ReflectSettableProperty::new(p.clone()))
                .map(|s| Arc::new(s) as Arc<dyn SettableProperty>)
                .collect::<Vec<_>>();
            for modifier in &self.deserializer_modifiers {
                settables = modifier.update_properties(&description, settables);
            }
            Arc::new(SettableTable::new(settables))
        })
    }

    /// Wraps `bean` into a [`serde::Serialize`](serde_core::Serialize) value.
    pub fn serializable<'a, T: Bean>(&self, bean: &'a T) -> BeanSerializer<'a> {
        BeanSerializer::new(bean, self.description::<T>().type_path(), self.writers::<T>())
    }

    /// Deserializes a map of properties into an existing `bean`.
    pub fn deserialize_into<'de, T: Bean, D: Deserializer<'de>>(
        &self,
        deserializer: D,
        bean: &mut T,
    ) -> Result<(), D::Error> {
        let table = self.settables::<T>();
        de::deserialize_into(
            deserializer,
            bean,
            &table,
            &self.description::<T>(),
            self.fail_on_unknown_properties,
        )
    }

    /// Deserializes a map of properties into `T::default()`.
    pub fn deserialize<'de, T: Bean + Default, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<T, D::Error> {
        let mut bean = T::default();
        self.deserialize_into(deserializer, &mut bean)?;
        Ok(bean)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::borrow::Cow;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use super::BeanMapper;
    use crate::bean::{Bean, BeanDescription};
    use crate::descriptor::{Member, PropertyDescriptor};
    use crate::modifier::{Module, SerializerModifier};
    use crate::writer::PropertyWriter;

    #[derive(Debug, Default, PartialEq)]
    struct User {
        id: i64,
        age: i16,
        active: bool,
        score: f64,
        name: String,
    }

    impl Bean for User {
        fn describe() -> BeanDescription {
            BeanDescription::builder::<User>()
                .property(
                    PropertyDescriptor::primitive::<User, i64>("id")
                        .getter(Member::method("id"), |u| u.id)
                        .setter(Member::method("set_id").private(), |u, v| u.id = v),
                )
                .property(
                    PropertyDescriptor::primitive::<User, i16>("age")
                        .getter(Member::field("age"), |u| u.age)
                        .setter(Member::field("age"), |u, v| u.age = v),
                )
                .property(
                    PropertyDescriptor::primitive::<User, bool>("active")
                        .getter(Member::method("active"), |u| u.active)
                        .setter(Member::method("set_active"), |u, v| u.active = v),
                )
                .property(
                    PropertyDescriptor::primitive::<User, f64>("score")
                        .getter(Member::method("score"), |u| u.score),
                )
                .property(
                    PropertyDescriptor::object::<User, String>("name")
                        .getter(Member::method("name"), |u| u.name.clone())
                        .setter(Member::method("set_name"), |u, v| u.name = v),
                )
                .build()
        }
    }

    fn user() -> User {
        User {
            id: 9,
            age: 30,
            active: true,
            score: 1.5,
            name: String::from("ann"),
        }
    }

    #[test]
    fn generic_round_trip() {
        let mapper = BeanMapper::new();
        let json = serde_json::to_string(&mapper.serializable(&user())).unwrap();
        assert_eq!(json, r#"{"id":9,"age":30,"active":true,"score":1.5,"name":"ann"}"#);

        let mut de = serde_json::Deserializer::from_str(&json);
        let back: User = mapper.deserialize(&mut de).unwrap();
        // `score` has no setter and keeps its default.
        assert_eq!(back, User { score: 0.0, ..user() });
    }

    #[test]
    fn unknown_properties() {
        let mapper = BeanMapper::new();
        let mut de = serde_json::Deserializer::from_str(r#"{"id":1,"nick":"x"}"#);
        let err = mapper.deserialize::<User, _>(&mut de).unwrap_err();
        assert!(err.to_string().contains("nick"));

        let mapper = BeanMapper::new().fail_on_unknown_properties(false);
        let mut de = serde_json::Deserializer::from_str(r#"{"id":1,"nick":"x"}"#);
        let user: User = mapper.deserialize(&mut de).unwrap();
        assert_eq!(user.id, 1);
    }

    #[test]
    fn decode_errors_name_the_property() {
        let mapper = BeanMapper::new();
        let mut de = serde_json::Deserializer::from_str(r#"{"age":"old"}"#);
        let err = mapper.deserialize::<User, _>(&mut de).unwrap_err();
        assert!(err.to_string().contains("age"));
    }

    struct Upper;

    impl SerializerModifier for Upper {
        fn change_properties(
            &self,
            _bean: &BeanDescription,
            properties: Vec<Arc<dyn PropertyWriter>>,
        ) -> Vec<Arc<dyn PropertyWriter>> {
            properties
                .into_iter()
                .map(|w| w.rename(Cow::Owned(w.name().to_uppercase())))
                .collect()
        }
    }

    struct UpperModule;

    impl Module for UpperModule {
        fn name(&self) -> &str {
            "upper"
        }

        fn setup(&self, mapper: &mut BeanMapper) {
            mapper.add_serializer_modifier(Arc::new(Upper));
        }
    }

    #[test]
    fn modules_install_modifiers_once() {
        let mut mapper = BeanMapper::new();
        mapper.register_module(&UpperModule).register_module(&UpperModule);
        assert_eq!(mapper.modules(), ["upper"]);

        let json = serde_json::to_string(&mapper.serializable(&user())).unwrap();
        assert!(json.starts_with(r#"{"ID":9,"AGE":30"#));
        assert!(Arc::ptr_eq(&mapper.writers::<User>(), &mapper.writers::<User>()));
    }
}
