//! Bean-style property model and mapper.
//!
//! A [`Bean`] describes itself as an ordered list of
//! [`PropertyDescriptor`]s. The [`BeanMapper`] turns those into property
//! objects ([`PropertyWriter`] for serialization, [`SettableProperty`]
//! for deserialization), lets installed modifiers replace them once per
//! type, and then drives `serde` through them.
//!
//! The generic property objects ([`ReflectPropertyWriter`],
//! [`ReflectSettableProperty`]) go through the reflective accessor path:
//! a bean type check and a boxed [`Value`] on every call. Modifiers may
//! substitute faster objects with the same contract.
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern crates

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod bean;
mod category;
mod descriptor;
mod error;
mod modifier;
mod settable;
mod type_map;
mod value;
mod writer;

pub mod decode;
pub mod mapper;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use bean::{Bean, BeanBuilder, BeanDescription, FromType};
pub use category::{Category, Primitive};
pub use decode::ValueDecoder;
pub use descriptor::{AccessorKind, Getter, Member, Setter, Visibility};
pub use descriptor::{ObjectGetter, ObjectProperty, ObjectSetter, PrimitiveProperty, PropertyDescriptor};
pub use error::PropertyError;
pub use mapper::BeanMapper;
pub use modifier::{DeserializerModifier, Module, SerializerModifier};
pub use settable::{ReflectSettableProperty, SettableProperty};
pub use type_map::{NoOpHashState, NoOpHasher, TypeIdMap};
pub use value::{ObjectData, ObjectValue, Value};
pub use writer::{PropertyWriter, ReflectPropertyWriter};
