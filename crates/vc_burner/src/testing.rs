//! Bean fixtures shared by unit tests.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_bean::{Bean, BeanDescription, Member, PropertyDescriptor};

use crate::classify::classify;
use crate::collector::{DispatchPlan, PropertyCollector, Side};
use crate::dispatch::TypeTraitDispatch;
use crate::module::BurnerConfig;

/// Collects every eligible property of `bean` for `side`, in declaration order.
pub(crate) fn plan_all(bean: &BeanDescription, side: Side) -> DispatchPlan {
    let config = BurnerConfig::default();
    let mut collector = PropertyCollector::new(side);
    for property in bean.properties() {
        if let Some(category) = classify(property, side, &config) {
            collector.add_property(Arc::clone(property), category);
        }
    }
    collector.into_plan(bean)
}

// -----------------------------------------------------------------------------
// Point

/// Two ints and a long; the long has a private setter.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Point {
    pub x: i32,
    pub y: i32,
    pub id: i64,
}

impl Bean for Point {
    fn describe() -> BeanDescription {
        BeanDescription::builder::<Point>()
            .property(
                PropertyDescriptor::primitive::<Point, i32>("x")
                    .getter(Member::method("x"), |p| p.x)
                    .setter(Member::method("set_x"), |p, v| p.x = v),
            )
            .property(
                PropertyDescriptor::primitive::<Point, i32>("y")
                    .getter(Member::method("y"), |p| p.y)
                    .setter(Member::method("set_y"), |p, v| p.y = v),
            )
            .property(
                PropertyDescriptor::primitive::<Point, i64>("id")
                    .getter(Member::method("id"), |p| p.id)
                    .setter(Member::method("set_id").private(), |p, v| p.id = v),
            )
            .with_trait::<TypeTraitDispatch>()
            .build()
    }
}

// -----------------------------------------------------------------------------
// Twin

/// Same accessor names as [`Point`], different type.
#[derive(Debug, Default)]
pub(crate) struct Twin {
    pub x: i32,
    pub y: i32,
    pub id: i64,
}

impl Bean for Twin {
    fn describe() -> BeanDescription {
        BeanDescription::builder::<Twin>()
            .property(PropertyDescriptor::primitive::<Twin, i32>("x").getter(Member::method("x"), |t| t.x))
            .property(PropertyDescriptor::primitive::<Twin, i32>("y").getter(Member::method("y"), |t| t.y))
            .property(PropertyDescriptor::primitive::<Twin, i64>("id").getter(Member::method("id"), |t| t.id))
            .with_trait::<TypeTraitDispatch>()
            .build()
    }
}

// -----------------------------------------------------------------------------
// Wide

/// More ints than a conditional chain selects.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Wide {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
    pub e: i32,
    pub f: i32,
}

impl Wide {
    pub(crate) fn sample() -> Self {
        Self { a: 1, b: 2, c: 3, d: 4, e: 5, f: 6 }
    }
}

macro_rules! wide_int {
    ($field:ident, $setter:literal) => {
        PropertyDescriptor::primitive::<Wide, i32>(stringify!($field))
            .getter(Member::method(stringify!($field)), |w| w.$field)
            .setter(Member::method($setter), |w, v| w.$field = v)
    };
}

impl Bean for Wide {
    fn describe() -> BeanDescription {
        BeanDescription::builder::<Wide>()
            .property(wide_int!(a, "set_a"))
            .property(wide_int!(b, "set_b"))
            .property(wide_int!(c, "set_c"))
            .property(wide_int!(d, "set_d"))
            .property(wide_int!(e, "set_e"))
            .property(wide_int!(f, "set_f"))
            .with_trait::<TypeTraitDispatch>()
            .build()
    }
}

// -----------------------------------------------------------------------------
// Hidden

/// Only a private getter.
#[derive(Debug, Default)]
pub(crate) struct Hidden {
    pub secret: i32,
}

impl Bean for Hidden {
    fn describe() -> BeanDescription {
        BeanDescription::builder::<Hidden>()
            .property(
                PropertyDescriptor::primitive::<Hidden, i32>("secret")
                    .getter(Member::method("secret").private(), |h| h.secret),
            )
            .with_trait::<TypeTraitDispatch>()
            .build()
    }
}

// -----------------------------------------------------------------------------
// NoTrait

/// Eligible properties, but no [`TypeTraitDispatch`].
#[derive(Debug, Default)]
pub(crate) struct NoTrait {
    pub a: i32,
    pub b: i32,
}

impl Bean for NoTrait {
    fn describe() -> BeanDescription {
        BeanDescription::builder::<NoTrait>()
            .property(
                PropertyDescriptor::primitive::<NoTrait, i32>("a")
                    .getter(Member::method("a"), |n| n.a)
                    .setter(Member::method("set_a"), |n, v| n.a = v),
            )
            .property(
                PropertyDescriptor::primitive::<NoTrait, i32>("b")
                    .getter(Member::method("b"), |n| n.b)
                    .setter(Member::method("set_b"), |n, v| n.b = v),
            )
            .build()
    }
}

// -----------------------------------------------------------------------------
// Profile

#[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub(crate) struct Address {
    pub city: String,
    pub zip: u32,
}

/// Objects, every primitive category but `int`, and a field accessor.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Profile {
    pub name: String,
    pub tags: Vec<String>,
    pub nickname: String,
    pub level: i16,
    pub ratio: f32,
    pub enabled: bool,
    pub weight: f64,
    pub home: Address,
}

impl Profile {
    pub(crate) fn sample() -> Self {
        Self {
            name: String::from("ada"),
            tags: alloc::vec![String::from("math")],
            nickname: String::from("countess"),
            level: 7,
            ratio: 0.25,
            enabled: true,
            weight: 61.5,
            home: Address {
                city: String::from("london"),
                zip: 1815,
            },
        }
    }
}

impl Bean for Profile {
    fn describe() -> BeanDescription {
        BeanDescription::builder::<Profile>()
            .property(
                PropertyDescriptor::object::<Profile, String>("name")
                    .getter(Member::method("name"), |p| p.name.clone())
                    .setter(Member::method("set_name"), |p, v| p.name = v),
            )
            .property(
                PropertyDescriptor::object::<Profile, Vec<String>>("tags")
                    .getter(Member::method("tags"), |p| p.tags.clone())
                    .setter(Member::method("set_tags"), |p, v| p.tags = v),
            )
            .property(
                PropertyDescriptor::object::<Profile, String>("nickname")
                    .getter(Member::field("nickname"), |p| p.nickname.clone())
                    .setter(Member::field("nickname"), |p, v| p.nickname = v),
            )
            .property(
                PropertyDescriptor::primitive::<Profile, i16>("level")
                    .getter(Member::method("level"), |p| p.level)
                    .setter(Member::method("set_level"), |p, v| p.level = v),
            )
            .property(
                PropertyDescriptor::primitive::<Profile, f32>("ratio")
                    .getter(Member::method("ratio"), |p| p.ratio)
                    .setter(Member::method("set_ratio"), |p, v| p.ratio = v),
            )
            .property(
                PropertyDescriptor::primitive::<Profile, bool>("enabled")
                    .getter(Member::method("is_enabled"), |p| p.enabled)
                    .setter(Member::method("set_enabled"), |p, v| p.enabled = v),
            )
            .property(
                PropertyDescriptor::primitive::<Profile, f64>("weight")
                    .getter(Member::method("weight"), |p| p.weight)
                    .setter(Member::method("set_weight"), |p, v| p.weight = v),
            )
            .property(
                PropertyDescriptor::object::<Profile, Address>("home")
                    .getter(Member::method("home"), |p| p.home.clone())
                    .setter(Member::method("set_home"), |p, v| p.home = v),
            )
            .with_trait::<TypeTraitDispatch>()
            .build()
    }
}
