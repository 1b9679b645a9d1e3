//! Per-type dispatchers: one object per bean type that invokes the
//! accessor selected by a `(category, index)` pair.
//!
//! Dispatchers are synthesized from a [`DispatchPlan`] through the
//! [`TypeTraitDispatch`] type trait, which carries the code path for the
//! concrete bean type. A bean description without the trait cannot be
//! optimized; its properties keep the generic path.

// -----------------------------------------------------------------------------
// Modules

mod generate;
mod table;

// -----------------------------------------------------------------------------
// Exports

pub use table::{CHAIN_LIMIT, DispatchTable};

use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use vc_bean::{BeanDescription, Category, FromType, ObjectValue, Primitive, Value};

use crate::collector::{DispatchPlan, PropertySlot};
use crate::error::{DispatchError, SynthesisError};

// -----------------------------------------------------------------------------
// BeanPropertyAccessor

/// Reads properties of one bean type by per-category index.
///
/// Every operation first checks that `bean` is an instance of the
/// dispatcher's type, then selects the getter at `index`. An index
/// outside the category's range is a [`DispatchError::InvalidIndex`].
pub trait BeanPropertyAccessor: Send + Sync + fmt::Debug {
    fn bean_type(&self) -> TypeId;

    fn bean_type_path(&self) -> &'static str;

    /// Number of getters of `category`.
    fn len(&self, category: Category) -> usize;

    fn boolean_getter(&self, bean: &dyn Any, index: usize) -> Result<bool, DispatchError>;
    fn short_getter(&self, bean: &dyn Any, index: usize) -> Result<i16, DispatchError>;
    fn int_getter(&self, bean: &dyn Any, index: usize) -> Result<i32, DispatchError>;
    fn long_getter(&self, bean: &dyn Any, index: usize) -> Result<i64, DispatchError>;
    fn float_getter(&self, bean: &dyn Any, index: usize) -> Result<f32, DispatchError>;
    fn double_getter(&self, bean: &dyn Any, index: usize) -> Result<f64, DispatchError>;
    fn object_getter(&self, bean: &dyn Any, index: usize) -> Result<ObjectValue, DispatchError>;

    /// Reads the property at `slot` as a boxed [`Value`].
    fn read(&self, bean: &dyn Any, slot: PropertySlot) -> Result<Value, DispatchError> {
        let index = slot.index();
        Ok(match slot.category() {
            Category::Boolean => Value::Boolean(self.boolean_getter(bean, index)?),
            Category::Short => Value::Short(self.short_getter(bean, index)?),
            Category::Int => Value::Int(self.int_getter(bean, index)?),
            Category::Long => Value::Long(self.long_getter(bean, index)?),
            Category::Float => Value::Float(self.float_getter(bean, index)?),
            Category::Double => Value::Double(self.double_getter(bean, index)?),
            Category::Object => Value::Object(self.object_getter(bean, index)?),
        })
    }
}

// -----------------------------------------------------------------------------
// BeanPropertyMutator

/// Writes properties of one bean type by per-category index.
///
/// The write-side counterpart of [`BeanPropertyAccessor`], with the same
/// type check and index validation.
pub trait BeanPropertyMutator: Send + Sync + fmt::Debug {
    fn bean_type(&self) -> TypeId;

    fn bean_type_path(&self) -> &'static str;

    /// Number of setters of `category`.
    fn len(&self, category: Category) -> usize;

    fn boolean_setter(&self, bean: &mut dyn Any, index: usize, value: bool) -> Result<(), DispatchError>;
    fn short_setter(&self, bean: &mut dyn Any, index: usize, value: i16) -> Result<(), DispatchError>;
    fn int_setter(&self, bean: &mut dyn Any, index: usize, value: i32) -> Result<(), DispatchError>;
    fn long_setter(&self, bean: &mut dyn Any, index: usize, value: i64) -> Result<(), DispatchError>;
    fn float_setter(&self, bean: &mut dyn Any, index: usize, value: f32) -> Result<(), DispatchError>;
    fn double_setter(&self, bean: &mut dyn Any, index: usize, value: f64) -> Result<(), DispatchError>;
    fn object_setter(&self, bean: &mut dyn Any, index: usize, value: ObjectValue) -> Result<(), DispatchError>;
}

/// Invokes the typed setter of `P`'s category.
///
/// Lets callers stay generic over the primitive type instead of
/// matching on [`Category`] at every call site.
pub fn set_primitive<P: Primitive>(
    mutator: &dyn BeanPropertyMutator,
    bean: &mut dyn Any,
    index: usize,
    value: P,
) -> Result<(), DispatchError> {
    match value.into_value() {
        Value::Boolean(v) => mutator.boolean_setter(bean, index, v),
        Value::Short(v) => mutator.short_setter(bean, index, v),
        Value::Int(v) => mutator.int_setter(bean, index, v),
        Value::Long(v) => mutator.long_setter(bean, index, v),
        Value::Float(v) => mutator.float_setter(bean, index, v),
        Value::Double(v) => mutator.double_setter(bean, index, v),
        Value::Object(v) => mutator.object_setter(bean, index, v),
    }
}

// -----------------------------------------------------------------------------
// TypeTraitDispatch

type AccessorFn = fn(&DispatchPlan) -> Result<Arc<dyn BeanPropertyAccessor>, SynthesisError>;
type MutatorFn = fn(&DispatchPlan) -> Result<Arc<dyn BeanPropertyMutator>, SynthesisError>;

/// Type trait enabling dispatcher synthesis for a bean type.
///
/// Register it on the bean description with
/// [`BeanBuilder::with_trait`](vc_bean::BeanBuilder::with_trait).
///
/// # Examples
///
/// ```
/// use vc_bean::{Bean, BeanDescription, Member, PropertyDescriptor};
/// use vc_burner::dispatch::TypeTraitDispatch;
///
/// struct Point { x: i32 }
///
/// impl Bean for Point {
///     fn describe() -> BeanDescription {
///         BeanDescription::builder::<Point>()
///             .property(
///                 PropertyDescriptor::primitive::<Point, i32>("x")
///                     .getter(Member::method("x"), |p| p.x),
///             )
///             .with_trait::<TypeTraitDispatch>()
///             .build()
///     }
/// }
///
/// assert!(Point::describe().has_trait::<TypeTraitDispatch>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeTraitDispatch {
    accessor: AccessorFn,
    mutator: MutatorFn,
}

impl TypeTraitDispatch {
    /// Builds the read-side dispatcher described by `plan`.
    #[inline]
    pub fn synthesize_accessor(&self, plan: &DispatchPlan) -> Result<Arc<dyn BeanPropertyAccessor>, SynthesisError> {
        (self.accessor)(plan)
    }

    /// Builds the write-side dispatcher described by `plan`.
    #[inline]
    pub fn synthesize_mutator(&self, plan: &DispatchPlan) -> Result<Arc<dyn BeanPropertyMutator>, SynthesisError> {
        (self.mutator)(plan)
    }
}

impl<T: Any + Send + Sync> FromType<T> for TypeTraitDispatch {
    fn from_type() -> Self {
        Self {
            accessor: generate::synthesize_accessor::<T>,
            mutator: generate::synthesize_mutator::<T>,
        }
    }
}

impl fmt::Debug for TypeTraitDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeTraitDispatch")
    }
}

/// Looks up [`TypeTraitDispatch`] on `bean`.
pub(crate) fn dispatch_trait(bean: &BeanDescription) -> Result<&TypeTraitDispatch, SynthesisError> {
    bean.get_trait::<TypeTraitDispatch>()
        .ok_or(SynthesisError::Unsupported { bean: bean.type_path() })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use vc_bean::{Bean, Category, ObjectValue};

    use super::{BeanPropertyAccessor, BeanPropertyMutator, TypeTraitDispatch, set_primitive};
    use crate::collector::{PropertyCollector, PropertySlot, Side};
    use crate::error::{DispatchError, SynthesisError};
    use crate::testing::{NoTrait, Point, Profile, Wide, plan_all};

    fn point_accessor() -> Arc<dyn BeanPropertyAccessor> {
        let description = Point::describe();
        let plan = plan_all(&description, Side::Read);
        let dispatch = description.get_trait::<TypeTraitDispatch>().unwrap();
        dispatch.synthesize_accessor(&plan).unwrap()
    }

    fn point_mutator() -> Arc<dyn BeanPropertyMutator> {
        let description = Point::describe();
        let plan = plan_all(&description, Side::Write);
        let dispatch = description.get_trait::<TypeTraitDispatch>().unwrap();
        dispatch.synthesize_mutator(&plan).unwrap()
    }

    #[test]
    fn accessor_reads_by_index() {
        let accessor = point_accessor();
        let point = Point { x: 3, y: 4, id: 99 };

        assert_eq!(accessor.len(Category::Int), 2);
        assert_eq!(accessor.len(Category::Long), 1);
        assert_eq!(accessor.int_getter(&point, 0).unwrap(), 3);
        assert_eq!(accessor.int_getter(&point, 1).unwrap(), 4);
        assert_eq!(accessor.long_getter(&point, 0).unwrap(), 99);
        assert!(matches!(
            accessor.read(&point, PropertySlot::new(Category::Long, 0)).unwrap(),
            vc_bean::Value::Long(99)
        ));
    }

    #[test]
    fn invalid_index_reports_range() {
        let accessor = point_accessor();
        let point = Point { x: 3, y: 4, id: 99 };

        let err = accessor.int_getter(&point, 2).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::InvalidIndex { category: Category::Int, index: 2, len: 2, .. }
        ));
        assert_eq!(err.valid_range(), Some(0..2));
        assert!(err.to_string().contains("index 2"));
        assert!(err.to_string().contains("0 <= n < 2"));

        // Categories without properties reject every index.
        let err = accessor.boolean_getter(&point, 0).unwrap_err();
        assert_eq!(err.valid_range(), Some(0..0));
    }

    #[test]
    fn foreign_bean_is_rejected() {
        let accessor = point_accessor();
        let err = accessor.int_getter(&NoTrait { a: 1, b: 2 }, 0).unwrap_err();
        assert!(matches!(err, DispatchError::TypeMismatch { .. }));
        assert!(err.to_string().contains("Point"));

        let mutator = point_mutator();
        let err = mutator.int_setter(&mut 5_i32, 0, 1).unwrap_err();
        assert!(matches!(err, DispatchError::TypeMismatch { .. }));
    }

    #[test]
    fn mutator_writes_by_index() {
        let mutator = point_mutator();
        let mut point = Point::default();

        mutator.int_setter(&mut point, 0, 10).unwrap();
        mutator.int_setter(&mut point, 1, 20).unwrap();
        set_primitive(&*mutator, &mut point, 1, 21_i32).unwrap();
        assert_eq!((point.x, point.y), (10, 21));

        // `set_id` is private, so it was never collected on the write side.
        assert_eq!(mutator.len(Category::Long), 0);
        assert!(mutator.long_setter(&mut point, 0, 1).is_err());
    }

    #[test]
    fn jump_table_dispatch() {
        let description = Wide::describe();
        let plan = plan_all(&description, Side::Read);
        let accessor = description
            .get_trait::<TypeTraitDispatch>()
            .unwrap()
            .synthesize_accessor(&plan)
            .unwrap();

        let wide = Wide::sample();
        assert_eq!(accessor.len(Category::Int), 6);
        let read: Vec<i32> = (0..6).map(|i| accessor.int_getter(&wide, i).unwrap()).collect();
        assert_eq!(read, [1, 2, 3, 4, 5, 6]);
        assert!(accessor.int_getter(&wide, 6).is_err());
    }

    #[test]
    fn object_dispatch() {
        let description = Profile::describe();
        let dispatch = description.get_trait::<TypeTraitDispatch>().unwrap();
        let accessor = dispatch.synthesize_accessor(&plan_all(&description, Side::Read)).unwrap();
        let mutator = dispatch.synthesize_mutator(&plan_all(&description, Side::Write)).unwrap();

        let mut profile = Profile::sample();
        let name = accessor.object_getter(&profile, 0).unwrap();
        assert_eq!(name.downcast_ref::<String>().map(|s| s.as_str()), Some("ada"));

        mutator
            .object_setter(&mut profile, 0, ObjectValue::new(String::from("grace")))
            .unwrap();
        assert_eq!(profile.name, "grace");

        let err = mutator.object_setter(&mut profile, 0, ObjectValue::new(7_u8)).unwrap_err();
        assert!(matches!(err, DispatchError::Value(_)));
        assert_eq!(profile.name, "grace");
    }

    #[test]
    fn malformed_plans_fail_synthesis() {
        let point = Point::describe();
        let dispatch = point.get_trait::<TypeTraitDispatch>().unwrap();

        // Plans of another bean type.
        let wide = Wide::describe();
        let err = dispatch.synthesize_accessor(&plan_all(&wide, Side::Read)).unwrap_err();
        assert!(matches!(err, SynthesisError::Malformed { .. }));

        // Read plans cannot build mutators.
        let err = dispatch.synthesize_mutator(&plan_all(&point, Side::Read)).unwrap_err();
        assert!(matches!(err, SynthesisError::Malformed { .. }));

        // Lists that disagree with the handle types.
        let mut collector = PropertyCollector::new(Side::Read);
        collector.add_property(Arc::clone(point.property("x").unwrap()), Category::Long);
        let err = dispatch.synthesize_accessor(&collector.into_plan(&point)).unwrap_err();
        assert!(matches!(err, SynthesisError::Malformed { .. }));
    }
}
