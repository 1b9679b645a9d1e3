use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use vc_bean::{BeanDescription, Category, PropertyDescriptor};

// -----------------------------------------------------------------------------
// Side

/// Which accessor of a property a dispatcher invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Getters, used by serialization.
    Read,
    /// Setters, used by deserialization.
    Write,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}

// -----------------------------------------------------------------------------
// PropertySlot

/// The `(category, index)` pair an optimized property object dispatches by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertySlot {
    category: Category,
    index: usize,
}

impl PropertySlot {
    #[inline]
    pub const fn new(category: Category, index: usize) -> Self {
        Self { category, index }
    }

    #[inline]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }
}

// -----------------------------------------------------------------------------
// PropertyCollector

type CategoryLists = [Vec<Arc<PropertyDescriptor>>; Category::COUNT];

/// Accumulates eligible properties of one bean and assigns each a
/// per-category index.
///
/// Indices are dense and follow insertion order: the first `int`
/// property gets `0`, the second `1`, and so on, independently for each
/// category. [`into_plan`](Self::into_plan) consumes the collector, so
/// no property can be added after a dispatcher was planned.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_bean::{Category, PropertyDescriptor};
/// use vc_burner::{PropertyCollector, Side};
///
/// struct Point { x: i32, y: i32, id: i64 }
///
/// let x = PropertyDescriptor::primitive::<Point, i32>("x").build();
/// let id = PropertyDescriptor::primitive::<Point, i64>("id").build();
/// let y = PropertyDescriptor::primitive::<Point, i32>("y").build();
///
/// let mut collector = PropertyCollector::new(Side::Read);
/// assert_eq!(collector.add_property(Arc::new(x), Category::Int).index(), 0);
/// assert_eq!(collector.add_property(Arc::new(id), Category::Long).index(), 0);
/// assert_eq!(collector.add_property(Arc::new(y), Category::Int).index(), 1);
/// assert_eq!(collector.len(Category::Int), 2);
/// ```
pub struct PropertyCollector {
    side: Side,
    lists: CategoryLists,
}

impl PropertyCollector {
    #[inline]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            lists: core::array::from_fn(|_| Vec::new()),
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Appends `descriptor` to the list of `category` and returns its slot.
    ///
    /// `category` is normally `descriptor.category()`; a plan whose lists
    /// disagree with the descriptors fails to synthesize.
    pub fn add_property(&mut self, descriptor: Arc<PropertyDescriptor>, category: Category) -> PropertySlot {
        let list = &mut self.lists[category.index()];
        let index = list.len();
        list.push(descriptor);
        PropertySlot::new(category, index)
    }

    /// Number of properties collected for `category`.
    #[inline]
    pub fn len(&self, category: Category) -> usize {
        self.lists[category.index()].len()
    }

    /// Returns `true` if no category has any property.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    /// Freezes the collected lists into a [`DispatchPlan`] for `bean`.
    pub fn into_plan(self, bean: &BeanDescription) -> DispatchPlan {
        let side = self.side;
        let fingerprint = Fingerprint(core::array::from_fn(|i| {
            self.lists[i]
                .iter()
                .map(|descriptor| member_name(descriptor, side))
                .collect()
        }));

        let plan = DispatchPlan {
            side,
            bean_type: bean.type_id(),
            bean_type_path: bean.type_path(),
            lists: self.lists,
            fingerprint,
        };

        #[cfg(all(debug_assertions, feature = "debug"))]
        plan.debug_validate();

        plan
    }
}

impl fmt::Debug for PropertyCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for category in Category::ALL {
            map.entry(&category, &self.len(category));
        }
        map.finish()
    }
}

fn member_name(descriptor: &PropertyDescriptor, side: Side) -> &'static str {
    let member = match side {
        Side::Read => descriptor.getter().map(|getter| getter.member()),
        Side::Write => descriptor.setter().map(|setter| setter.member()),
    };
    member.map_or("", |member| member.name())
}

// -----------------------------------------------------------------------------
// Fingerprint

/// Identifies which accessor members answer which index of a plan.
///
/// Two plans with equal fingerprints assign every `(category, index)` to
/// the same member, so a dispatcher built from one is valid for the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint([Box<[&'static str]>; Category::COUNT]);

impl Fingerprint {
    /// Member names of `category`, in index order.
    #[inline]
    pub fn members(&self, category: Category) -> &[&'static str] {
        &self.0[category.index()]
    }
}

// -----------------------------------------------------------------------------
// DispatchPlan

/// The frozen output of a [`PropertyCollector`]: everything a dispatcher
/// synthesizer needs for one bean type and one [`Side`].
pub struct DispatchPlan {
    side: Side,
    bean_type: TypeId,
    bean_type_path: &'static str,
    lists: CategoryLists,
    fingerprint: Fingerprint,
}

impl DispatchPlan {
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn bean_type(&self) -> TypeId {
        self.bean_type
    }

    #[inline]
    pub fn bean_type_path(&self) -> &'static str {
        self.bean_type_path
    }

    /// Properties of `category`, where position equals dispatch index.
    #[inline]
    pub fn properties(&self, category: Category) -> &[Arc<PropertyDescriptor>] {
        &self.lists[category.index()]
    }

    #[inline]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Total number of properties across all categories.
    pub fn len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(all(debug_assertions, feature = "debug"))]
    fn debug_validate(&self) {
        for category in Category::ALL {
            for descriptor in self.properties(category) {
                debug_assert_eq!(
                    descriptor.bean_type(),
                    self.bean_type,
                    "property `{}` was collected for another bean than `{}`",
                    descriptor.name(),
                    self.bean_type_path,
                );
            }
        }
    }
}

impl fmt::Debug for DispatchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchPlan")
            .field("side", &self.side)
            .field("bean", &self.bean_type_path)
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
