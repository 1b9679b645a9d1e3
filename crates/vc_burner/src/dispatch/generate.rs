use alloc::borrow::Cow;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use core::fmt;

use vc_bean::{Category, ObjectGetter, ObjectSetter, ObjectValue};

use super::table::DispatchTable;
use super::{BeanPropertyAccessor, BeanPropertyMutator};
use crate::collector::{DispatchPlan, Side};
use crate::error::{DispatchError, SynthesisError};

// -----------------------------------------------------------------------------
// Synthesis helpers

fn malformed<T>(side: Side, reason: impl Into<Cow<'static, str>>) -> SynthesisError {
    SynthesisError::Malformed {
        bean: type_name::<T>(),
        side,
        reason: reason.into(),
    }
}

fn check_plan<T: Any>(plan: &DispatchPlan, side: Side) -> Result<(), SynthesisError> {
    if plan.bean_type() != TypeId::of::<T>() {
        return Err(malformed::<T>(
            side,
            alloc::format!("plan was collected for `{}`", plan.bean_type_path()),
        ));
    }
    if plan.side() != side {
        return Err(malformed::<T>(side, alloc::format!("plan was collected for the {} side", plan.side())));
    }
    Ok(())
}

/// Pulls the typed handle `H` out of every property of `category`.
fn collect_handles<T, H: Any + Clone>(
    plan: &DispatchPlan,
    side: Side,
    category: Category,
) -> Result<DispatchTable<H>, SynthesisError> {
    plan.properties(category)
        .iter()
        .map(|descriptor| {
            let handle = match side {
                Side::Read => descriptor.getter().and_then(|getter| getter.typed::<H>()),
                Side::Write => descriptor.setter().and_then(|setter| setter.typed::<H>()),
            };
            handle.cloned().ok_or_else(|| {
                malformed::<T>(
                    side,
                    alloc::format!(
                        "property `{}` has no {category} accessor of type `{}`",
                        descriptor.name(),
                        type_name::<H>(),
                    ),
                )
            })
        })
        .collect::<Result<Vec<H>, _>>()
        .map(DispatchTable::new)
}

pub(super) fn synthesize_accessor<T: Any + Send + Sync>(
    plan: &DispatchPlan,
) -> Result<Arc<dyn BeanPropertyAccessor>, SynthesisError> {
    let accessor = GeneratedAccessor::<T>::synthesize(plan)?;
    Ok(Arc::new(accessor))
}

pub(super) fn synthesize_mutator<T: Any + Send + Sync>(
    plan: &DispatchPlan,
) -> Result<Arc<dyn BeanPropertyMutator>, SynthesisError> {
    let mutator = GeneratedMutator::<T>::synthesize(plan)?;
    Ok(Arc::new(mutator))
}

// -----------------------------------------------------------------------------
// GeneratedAccessor

/// Read dispatcher of bean type `T`: one [`DispatchTable`] of typed
/// getters per category.
pub(super) struct GeneratedAccessor<T: 'static> {
    booleans: DispatchTable<fn(&T) -> bool>,
    shorts: DispatchTable<fn(&T) -> i16>,
    ints: DispatchTable<fn(&T) -> i32>,
    longs: DispatchTable<fn(&T) -> i64>,
    floats: DispatchTable<fn(&T) -> f32>,
    doubles: DispatchTable<fn(&T) -> f64>,
    objects: DispatchTable<ObjectGetter<T>>,
}

impl<T: Any + Send + Sync> GeneratedAccessor<T> {
    pub(super) fn synthesize(plan: &DispatchPlan) -> Result<Self, SynthesisError> {
        const SIDE: Side = Side::Read;
        check_plan::<T>(plan, SIDE)?;
        Ok(Self {
            booleans: collect_handles::<T, _>(plan, SIDE, Category::Boolean)?,
            shorts: collect_handles::<T, _>(plan, SIDE, Category::Short)?,
            ints: collect_handles::<T, _>(plan, SIDE, Category::Int)?,
            longs: collect_handles::<T, _>(plan, SIDE, Category::Long)?,
            floats: collect_handles::<T, _>(plan, SIDE, Category::Float)?,
            doubles: collect_handles::<T, _>(plan, SIDE, Category::Double)?,
            objects: collect_handles::<T, _>(plan, SIDE, Category::Object)?,
        })
    }

    #[inline]
    fn narrow<'a>(&self, bean: &'a dyn Any) -> Result<&'a T, DispatchError> {
        bean.downcast_ref::<T>()
            .ok_or(DispatchError::TypeMismatch { expected: type_name::<T>() })
    }
}

macro_rules! impl_getter {
    ($method:ident, $table:ident, $category:ident, $ty:ty) => {
        fn $method(&self, bean: &dyn Any, index: usize) -> Result<$ty, DispatchError> {
            let bean = self.narrow(bean)?;
            match self.$table.select(index) {
                Some(get) => Ok(get(bean)),
                None => Err(invalid_index::<T>(Category::$category, index, self.$table.len())),
            }
        }
    };
}

impl<T: Any + Send + Sync> BeanPropertyAccessor for GeneratedAccessor<T> {
    #[inline]
    fn bean_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    #[inline]
    fn bean_type_path(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self, category: Category) -> usize {
        match category {
            Category::Boolean => self.booleans.len(),
            Category::Short => self.shorts.len(),
            Category::Int => self.ints.len(),
            Category::Long => self.longs.len(),
            Category::Float => self.floats.len(),
            Category::Double => self.doubles.len(),
            Category::Object => self.objects.len(),
        }
    }

    impl_getter!(boolean_getter, booleans, Boolean, bool);
    impl_getter!(short_getter, shorts, Short, i16);
    impl_getter!(int_getter, ints, Int, i32);
    impl_getter!(long_getter, longs, Long, i64);
    impl_getter!(float_getter, floats, Float, f32);
    impl_getter!(double_getter, doubles, Double, f64);
    impl_getter!(object_getter, objects, Object, ObjectValue);
}

// -----------------------------------------------------------------------------
// GeneratedMutator

/// Write dispatcher of bean type `T`.
pub(super) struct GeneratedMutator<T: 'static> {
    booleans: DispatchTable<fn(&mut T, bool)>,
    shorts: DispatchTable<fn(&mut T, i16)>,
    ints: DispatchTable<fn(&mut T, i32)>,
    longs: DispatchTable<fn(&mut T, i64)>,
    floats: DispatchTable<fn(&mut T, f32)>,
    doubles: DispatchTable<fn(&mut T, f64)>,
    objects: DispatchTable<ObjectSetter<T>>,
}

impl<T: Any + Send + Sync> GeneratedMutator<T> {
    pub(super) fn synthesize(plan: &DispatchPlan) -> Result<Self, SynthesisError> {
        const SIDE: Side = Side::Write;
        check_plan::<T>(plan, SIDE)?;
        Ok(Self {
            booleans: collect_handles::<T, _>(plan, SIDE, Category::Boolean)?,
            shorts: collect_handles::<T, _>(plan, SIDE, Category::Short)?,
            ints: collect_handles::<T, _>(plan, SIDE, Category::Int)?,
            longs: collect_handles::<T, _>(plan, SIDE, Category::Long)?,
            floats: collect_handles::<T, _>(plan, SIDE, Category::Float)?,
            doubles: collect_handles::<T, _>(plan, SIDE, Category::Double)?,
            objects: collect_handles::<T, _>(plan, SIDE, Category::Object)?,
        })
    }

    #[inline]
    fn narrow<'a>(&self, bean: &'a mut dyn Any) -> Result<&'a mut T, DispatchError> {
        bean.downcast_mut::<T>()
            .ok_or(DispatchError::TypeMismatch { expected: type_name::<T>() })
    }
}

macro_rules! impl_setter {
    ($method:ident, $table:ident, $category:ident, $ty:ty) => {
        fn $method(&self, bean: &mut dyn Any, index: usize, value: $ty) -> Result<(), DispatchError> {
            let bean = self.narrow(bean)?;
            match self.$table.select(index) {
                Some(set) => {
                    set(bean, value);
                    Ok(())
                }
                None => Err(invalid_index::<T>(Category::$category, index, self.$table.len())),
            }
        }
    };
}

impl<T: Any + Send + Sync> BeanPropertyMutator for GeneratedMutator<T> {
    #[inline]
    fn bean_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    #[inline]
    fn bean_type_path(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self, category: Category) -> usize {
        match category {
            Category::Boolean => self.booleans.len(),
            Category::Short => self.shorts.len(),
            Category::Int => self.ints.len(),
            Category::Long => self.longs.len(),
            Category::Float => self.floats.len(),
            Category::Double => self.doubles.len(),
            Category::Object => self.objects.len(),
        }
    }

    impl_setter!(boolean_setter, booleans, Boolean, bool);
    impl_setter!(short_setter, shorts, Short, i16);
    impl_setter!(int_setter, ints, Int, i32);
    impl_setter!(long_setter, longs, Long, i64);
    impl_setter!(float_setter, floats, Float, f32);
    impl_setter!(double_setter, doubles, Double, f64);

    fn object_setter(&self, bean: &mut dyn Any, index: usize, value: ObjectValue) -> Result<(), DispatchError> {
        let bean = self.narrow(bean)?;
        match self.objects.select(index) {
            Some(set) => Ok(set(bean, value)?),
            None => Err(invalid_index::<T>(Category::Object, index, self.objects.len())),
        }
    }
}

// -----------------------------------------------------------------------------
// Shared

#[cold]
fn invalid_index<T>(category: Category, index: usize, len: usize) -> DispatchError {
    DispatchError::InvalidIndex {
        bean: type_name::<T>(),
        category,
        index,
        len,
    }
}

macro_rules! impl_debug {
    ($name:ident) => {
        impl<T: 'static> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("bean", &type_name::<T>())
                    .field("booleans", &self.booleans.len())
                    .field("shorts", &self.shorts.len())
                    .field("ints", &self.ints.len())
                    .field("longs", &self.longs.len())
                    .field("floats", &self.floats.len())
                    .field("doubles", &self.doubles.len())
                    .field("objects", &self.objects.len())
                    .finish()
            }
        }
    };
}

impl_debug!(GeneratedAccessor);
impl_debug!(GeneratedMutator);
