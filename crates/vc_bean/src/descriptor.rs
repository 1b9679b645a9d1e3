use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::marker::PhantomData;

use serde_core::de::DeserializeOwned;

use crate::category::{Category, Primitive};
use crate::decode::ValueDecoder;
use crate::error::PropertyError;
use crate::value::{ObjectData, ObjectValue, Value};

// -----------------------------------------------------------------------------
// Member

/// Visibility of an accessor member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    /// Visible within the owning crate or module only.
    Restricted,
    Private,
}

/// How an accessor reaches the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    /// A getter or setter method.
    Method,
    /// Direct field access.
    Field,
}

/// Identity of an accessor: the member name, its kind and visibility.
///
/// # Examples
///
/// ```
/// use vc_bean::{AccessorKind, Member, Visibility};
///
/// let member = Member::method("set_id").private();
/// assert_eq!(member.kind(), AccessorKind::Method);
/// assert_eq!(member.visibility(), Visibility::Private);
/// assert!(member.is_private());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Member {
    name: &'static str,
    kind: AccessorKind,
    visibility: Visibility,
}

impl Member {
    /// A public method member.
    #[inline]
    pub const fn method(name: &'static str) -> Self {
        Self {
            name,
            kind: AccessorKind::Method,
            visibility: Visibility::Public,
        }
    }

    /// A public field member.
    #[inline]
    pub const fn field(name: &'static str) -> Self {
        Self {
            name,
            kind: AccessorKind::Field,
            visibility: Visibility::Public,
        }
    }

    #[inline]
    pub const fn private(self) -> Self {
        self.with_visibility(Visibility::Private)
    }

    #[inline]
    pub const fn restricted(self) -> Self {
        self.with_visibility(Visibility::Restricted)
    }

    #[inline]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn kind(&self) -> AccessorKind {
        self.kind
    }

    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub const fn is_private(&self) -> bool {
        matches!(self.visibility, Visibility::Private)
    }
}

// -----------------------------------------------------------------------------
// Typed accessor handles

/// Typed getter of an object property, as stored in a [`Getter`].
///
/// Primitive getters are stored as plain `fn(&T) -> P` pointers.
pub type ObjectGetter<T> = Arc<dyn Fn(&T) -> ObjectValue + Send + Sync>;

/// Typed setter of an object property, as stored in a [`Setter`].
///
/// Primitive setters are stored as plain `fn(&mut T, P)` pointers.
pub type ObjectSetter<T> = Arc<dyn Fn(&mut T, ObjectValue) -> Result<(), PropertyError> + Send + Sync>;

type ReflectGetFn = dyn Fn(&dyn Any) -> Result<Value, PropertyError> + Send + Sync;
type ReflectSetFn = dyn Fn(&mut dyn Any, Value) -> Result<(), PropertyError> + Send + Sync;

// -----------------------------------------------------------------------------
// Getter & Setter

/// The read accessor of a property.
///
/// Holds two ways of invoking the same member: the typed handle
/// (see [`typed`](Self::typed)) and the reflective [`invoke`](Self::invoke),
/// which checks the bean type and boxes the result on every call.
#[derive(Clone)]
pub struct Getter {
    member: Member,
    typed: Arc<dyn Any + Send + Sync>,
    reflect: Arc<ReflectGetFn>,
}

impl Getter {
    #[inline]
    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Returns the typed handle if it has the shape `G`.
    ///
    /// `G` is `fn(&T) -> P` for primitives and [`ObjectGetter<T>`] for objects.
    #[inline]
    pub fn typed<G: Any>(&self) -> Option<&G> {
        self.typed.downcast_ref::<G>()
    }

    /// Reads the value reflectively.
    #[inline]
    pub fn invoke(&self, bean: &dyn Any) -> Result<Value, PropertyError> {
        (self.reflect)(bean)
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter").field("member", &self.member).finish_non_exhaustive()
    }
}

/// The write accessor of a property. See [`Getter`].
#[derive(Clone)]
pub struct Setter {
    member: Member,
    typed: Arc<dyn Any + Send + Sync>,
    reflect: Arc<ReflectSetFn>,
}

impl Setter {
    #[inline]
    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Returns the typed handle if it has the shape `S`.
    ///
    /// `S` is `fn(&mut T, P)` for primitives and [`ObjectSetter<T>`] for objects.
    #[inline]
    pub fn typed<S: Any>(&self) -> Option<&S> {
        self.typed.downcast_ref::<S>()
    }

    /// Writes the value reflectively.
    #[inline]
    pub fn invoke(&self, bean: &mut dyn Any, value: Value) -> Result<(), PropertyError> {
        (self.reflect)(bean, value)
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter").field("member", &self.member).finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// PropertyDescriptor

/// One property of a bean type as seen by the mapper.
///
/// Built with [`PropertyDescriptor::primitive`] or [`PropertyDescriptor::object`].
///
/// # Examples
///
/// ```
/// use vc_bean::{Category, Member, PropertyDescriptor, Value};
///
/// struct Point { x: i32 }
///
/// let x = PropertyDescriptor::primitive::<Point, i32>("x")
///     .getter(Member::method("x"), |p| p.x)
///     .setter(Member::method("set_x"), |p, v| p.x = v)
///     .build();
///
/// assert_eq!(x.category(), Category::Int);
///
/// let mut point = Point { x: 1 };
/// x.setter().unwrap().invoke(&mut point, Value::Long(9)).unwrap();
/// assert!(matches!(x.getter().unwrap().invoke(&point).unwrap(), Value::Int(9)));
/// ```
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: Cow<'static, str>,
    bean_type: TypeId,
    bean_type_path: &'static str,
    category: Category,
    value_type_path: &'static str,
    getter: Option<Getter>,
    setter: Option<Setter>,
    decoder: ValueDecoder,
}

impl PropertyDescriptor {
    /// Starts a primitive property of bean `T` with value type `P`.
    #[inline]
    pub fn primitive<T: Any + Send + Sync, P: Primitive>(
        name: impl Into<Cow<'static, str>>,
    ) -> PrimitiveProperty<T, P> {
        PrimitiveProperty {
            descriptor: Self::empty::<T>(name.into(), P::CATEGORY, type_name::<P>(), ValueDecoder::primitive::<P>()),
            _marker: PhantomData,
        }
    }

    /// Starts an object property of bean `T` with value type `V`.
    #[inline]
    pub fn object<T: Any + Send + Sync, V: ObjectData + DeserializeOwned>(
        name: impl Into<Cow<'static, str>>,
    ) -> ObjectProperty<T, V> {
        ObjectProperty {
            descriptor: Self::empty::<T>(name.into(), Category::Object, type_name::<V>(), ValueDecoder::object::<V>()),
            _marker: PhantomData,
        }
    }

    fn empty<T: Any>(
        name: Cow<'static, str>,
        category: Category,
        value_type_path: &'static str,
        decoder: ValueDecoder,
    ) -> Self {
        Self {
            name,
            bean_type: TypeId::of::<T>(),
            bean_type_path: type_name::<T>(),
            category,
            value_type_path,
            getter: None,
            setter: None,
            decoder,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the owned name, cheap to clone for `'static` names.
    #[inline]
    pub fn name_cow(&self) -> Cow<'static, str> {
        self.name.clone()
    }

    #[inline]
    pub fn bean_type(&self) -> TypeId {
        self.bean_type
    }

    #[inline]
    pub fn bean_type_path(&self) -> &'static str {
        self.bean_type_path
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub fn value_type_path(&self) -> &'static str {
        self.value_type_path
    }

    #[inline]
    pub fn getter(&self) -> Option<&Getter> {
        self.getter.as_ref()
    }

    #[inline]
    pub fn setter(&self) -> Option<&Setter> {
        self.setter.as_ref()
    }

    /// The default decoder of this property.
    #[inline]
    pub fn decoder(&self) -> &ValueDecoder {
        &self.decoder
    }
}

// -----------------------------------------------------------------------------
// Builders

fn bean_mismatch<T>(property: &Cow<'static, str>) -> PropertyError {
    PropertyError::BeanMismatch {
        property: property.clone(),
        expected: type_name::<T>(),
    }
}

/// Builder of a primitive [`PropertyDescriptor`].
pub struct PrimitiveProperty<T, P> {
    descriptor: PropertyDescriptor,
    _marker: PhantomData<fn(T) -> P>,
}

impl<T: Any + Send + Sync, P: Primitive> PrimitiveProperty<T, P> {
    pub fn getter(mut self, member: Member, get: fn(&T) -> P) -> Self {
        let name = self.descriptor.name.clone();
        self.descriptor.getter = Some(Getter {
            member,
            typed: Arc::new(get),
            reflect: Arc::new(move |bean: &dyn Any| match bean.downcast_ref::<T>() {
                Some(bean) => Ok(get(bean).into_value()),
                None => Err(bean_mismatch::<T>(&name)),
            }),
        });
        self
    }

    pub fn setter(mut self, member: Member, set: fn(&mut T, P)) -> Self {
        let name = self.descriptor.name.clone();
        self.descriptor.setter = Some(Setter {
            member,
            typed: Arc::new(set),
            reflect: Arc::new(move |bean: &mut dyn Any, value: Value| {
                let Some(bean) = bean.downcast_mut::<T>() else {
                    return Err(bean_mismatch::<T>(&name));
                };
                match P::from_value(&value) {
                    Some(value) => {
                        set(bean, value);
                        Ok(())
                    }
                    None => Err(PropertyError::ValueMismatch {
                        property: name.clone(),
                        expected: P::CATEGORY,
                        found: value.category(),
                    }),
                }
            }),
        });
        self
    }

    #[inline]
    pub fn build(self) -> PropertyDescriptor {
        self.descriptor
    }
}

impl<T: Any + Send + Sync, P: Primitive> From<PrimitiveProperty<T, P>> for PropertyDescriptor {
    #[inline]
    fn from(value: PrimitiveProperty<T, P>) -> Self {
        value.build()
    }
}

/// Builder of an object [`PropertyDescriptor`].
pub struct ObjectProperty<T, V> {
    descriptor: PropertyDescriptor,
    _marker: PhantomData<fn(T) -> V>,
}

impl<T: Any + Send + Sync, V: ObjectData + DeserializeOwned> ObjectProperty<T, V> {
    pub fn getter(mut self, member: Member, get: fn(&T) -> V) -> Self {
        let name = self.descriptor.name.clone();
        let typed: ObjectGetter<T> = Arc::new(move |bean: &T| ObjectValue::new(get(bean)));
        self.descriptor.getter = Some(Getter {
            member,
            typed: Arc::new(typed),
            reflect: Arc::new(move |bean: &dyn Any| match bean.downcast_ref::<T>() {
                Some(bean) => Ok(Value::object(get(bean))),
                None => Err(bean_mismatch::<T>(&name)),
            }),
        });
        self
    }

    pub fn setter(mut self, member: Member, set: fn(&mut T, V)) -> Self {
        let name = self.descriptor.name.clone();
        let typed_name = name.clone();
        let typed: ObjectSetter<T> = Arc::new(move |bean: &mut T, value: ObjectValue| {
            match value.take::<V>() {
                Ok(value) => {
                    set(bean, value);
                    Ok(())
                }
                Err(value) => Err(PropertyError::ObjectMismatch {
                    property: typed_name.clone(),
                    expected: type_name::<V>(),
                    found: value.value_type_path(),
                }),
            }
        });
        self.descriptor.setter = Some(Setter {
            member,
            typed: Arc::new(typed.clone()),
            reflect: Arc::new(move |bean: &mut dyn Any, value: Value| {
                let Some(bean) = bean.downcast_mut::<T>() else {
                    return Err(bean_mismatch::<T>(&name));
                };
                match value {
                    Value::Object(value) => typed(bean, value),
                    other => Err(PropertyError::ValueMismatch {
                        property: name.clone(),
                        expected: Category::Object,
                        found: other.category(),
                    }),
                }
            }),
        });
        self
    }

    #[inline]
    pub fn build(self) -> PropertyDescriptor {
        self.descriptor
    }
}

impl<T: Any + Send + Sync, V: ObjectData + DeserializeOwned> From<ObjectProperty<T, V>> for PropertyDescriptor {
    #[inline]
    fn from(value: ObjectProperty<T, V>) -> Self {
        value.build()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{AccessorKind, Member, ObjectGetter, PropertyDescriptor};
    use crate::category::Category;
    use crate::error::PropertyError;
    use crate::value::Value;

    struct Account {
        id: i64,
        owner: String,
    }

    fn account() -> Account {
        Account {
            id: 7,
            owner: String::from("ann"),
        }
    }

    #[test]
    fn typed_handles_have_expected_shape() {
        let id = PropertyDescriptor::primitive::<Account, i64>("id")
            .getter(Member::method("id"), |a| a.id)
            .build();
        let get = id.getter().unwrap().typed::<fn(&Account) -> i64>().unwrap();
        assert_eq!(get(&account()), 7);
        assert!(id.getter().unwrap().typed::<fn(&Account) -> i32>().is_none());
        assert!(id.setter().is_none());

        let owner = PropertyDescriptor::object::<Account, String>("owner")
            .getter(Member::field("owner"), |a| a.owner.clone())
            .build();
        assert_eq!(owner.category(), Category::Object);
        assert_eq!(owner.getter().unwrap().member().kind(), AccessorKind::Field);
        let get = owner.getter().unwrap().typed::<ObjectGetter<Account>>().unwrap();
        assert_eq!(get(&account()).downcast_ref::<String>().unwrap(), "ann");
    }

    #[test]
    fn reflective_access_checks_types() {
        let id = PropertyDescriptor::primitive::<Account, i64>("id")
            .getter(Member::method("id"), |a| a.id)
            .setter(Member::method("set_id").private(), |a, v| a.id = v)
            .build();

        let err = id.getter().unwrap().invoke(&5_u8).unwrap_err();
        assert!(matches!(err, PropertyError::BeanMismatch { .. }));

        let mut bean = account();
        let err = id.setter().unwrap().invoke(&mut bean, Value::Boolean(true)).unwrap_err();
        assert!(matches!(
            err,
            PropertyError::ValueMismatch { expected: Category::Long, found: Category::Boolean, .. }
        ));

        id.setter().unwrap().invoke(&mut bean, Value::Int(12)).unwrap();
        assert_eq!(bean.id, 12);
    }

    #[test]
    fn object_setter_rejects_foreign_values() {
        let owner = PropertyDescriptor::object::<Account, String>("owner")
            .setter(Member::method("set_owner"), |a, v| a.owner = v)
            .build();
        let mut bean = account();
        let err = owner.setter().unwrap().invoke(&mut bean, Value::object(3_u32)).unwrap_err();
        assert!(matches!(err, PropertyError::ObjectMismatch { .. }));

        owner
            .setter()
            .unwrap()
            .invoke(&mut bean, Value::object(String::from("bob")))
            .unwrap();
        assert_eq!(bean.owner, "bob");
    }
}
