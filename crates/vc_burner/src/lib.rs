//! Optimized property dispatch for [`vc_bean`].
//!
//! The generic property objects of a bean mapper reach every property
//! through a type-erased, boxing accessor. This crate replaces them, per
//! bean type, with objects that know a `(category, index)` slot and call
//! one shared dispatcher, which invokes the typed accessor directly.
//!
//! - [`classify`] decides which properties are eligible.
//! - [`PropertyCollector`] assigns per-category indices and freezes them
//!   into a [`DispatchPlan`].
//! - [`dispatch`] holds the dispatcher traits and the synthesizer.
//! - [`DispatcherScope`] caches one dispatcher per bean type and side.
//! - [`OptimizedPropertyWriter`] and [`OptimizedSettableProperty`] are the
//!   replacement property objects; [`BurnerModule`] installs them.
//!
//! Anything that cannot be optimized keeps the generic path, so output is
//! identical with and without the module.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use vc_bean::{Bean, BeanDescription, BeanMapper, Member, PropertyDescriptor};
//! use vc_burner::{BurnerModule, DispatcherScope};
//! use vc_burner::dispatch::TypeTraitDispatch;
//!
//! #[derive(Default)]
//! struct Point { x: i32, y: i32 }
//!
//! impl Bean for Point {
//!     fn describe() -> BeanDescription {
//!         BeanDescription::builder::<Point>()
//!             .property(
//!                 PropertyDescriptor::primitive::<Point, i32>("x")
//!                     .getter(Member::method("x"), |p| p.x)
//!                     .setter(Member::method("set_x"), |p, v| p.x = v),
//!             )
//!             .property(
//!                 PropertyDescriptor::primitive::<Point, i32>("y")
//!                     .getter(Member::method("y"), |p| p.y)
//!                     .setter(Member::method("set_y"), |p, v| p.y = v),
//!             )
//!             .with_trait::<TypeTraitDispatch>()
//!             .build()
//!     }
//! }
//!
//! let scope = Arc::new(DispatcherScope::new("example"));
//! let mut mapper = BeanMapper::new();
//! mapper.register_module(&BurnerModule::new().with_scope(scope.clone()));
//!
//! let json = serde_json::to_string(&mapper.serializable(&Point { x: 1, y: 2 })).unwrap();
//! assert_eq!(json, r#"{"x":1,"y":2}"#);
//!
//! let point: Point = mapper.deserialize(&mut serde_json::Deserializer::from_str(&json)).unwrap();
//! assert_eq!((point.x, point.y), (1, 2));
//! assert_eq!(scope.len(), 2);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern crates

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod collector;
mod de;
mod error;
mod module;
mod scope;
mod ser;

pub mod classify;
pub mod dispatch;

#[cfg(test)]
mod testing;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use classify::has_optimizable_properties;
pub use collector::{DispatchPlan, Fingerprint, PropertyCollector, PropertySlot, Side};
pub use de::{BurnerDeserializerModifier, OptimizedSettableProperty};
pub use dispatch::{BeanPropertyAccessor, BeanPropertyMutator, TypeTraitDispatch};
pub use error::{DispatchError, SynthesisError};
pub use module::{BurnerConfig, BurnerModule};
pub use scope::DispatcherScope;
pub use ser::{BurnerSerializerModifier, OptimizedPropertyWriter};
