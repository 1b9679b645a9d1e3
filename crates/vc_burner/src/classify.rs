//! Eligibility rules for optimized dispatch.
//!
//! A property takes the optimized path for one side only if that side's
//! accessor is a method, is not private, and the property category is
//! optimized under the active [`BurnerConfig`]. Everything else keeps
//! the generic property object.

use vc_bean::{AccessorKind, BeanDescription, Category, Member, PropertyDescriptor};

use crate::collector::Side;
use crate::dispatch::TypeTraitDispatch;
use crate::module::BurnerConfig;

#[inline]
fn eligible(member: &Member, category: Category, config: &BurnerConfig) -> bool {
    member.kind() == AccessorKind::Method
        && !member.is_private()
        && (category.is_primitive() || config.optimize_objects)
}

/// Returns the dispatch category of the property's getter, or `None` if
/// reads must stay on the generic path.
pub fn classify_getter(descriptor: &PropertyDescriptor, config: &BurnerConfig) -> Option<Category> {
    let getter = descriptor.getter()?;
    let category = descriptor.category();
    eligible(getter.member(), category, config).then_some(category)
}

/// Returns the dispatch category of the property's setter, or `None` if
/// writes must stay on the generic path.
pub fn classify_setter(descriptor: &PropertyDescriptor, config: &BurnerConfig) -> Option<Category> {
    let setter = descriptor.setter()?;
    let category = descriptor.category();
    eligible(setter.member(), category, config).then_some(category)
}

/// Classifies `descriptor` for `side`.
#[inline]
pub fn classify(descriptor: &PropertyDescriptor, side: Side, config: &BurnerConfig) -> Option<Category> {
    match side {
        Side::Read => classify_getter(descriptor, config),
        Side::Write => classify_setter(descriptor, config),
    }
}

/// Returns `true` if `bean` registers [`TypeTraitDispatch`] and any of its
/// properties would be optimized on either side under the default
/// configuration.
///
/// A type for which this is `false` never gets a dispatcher.
pub fn has_optimizable_properties(bean: &BeanDescription) -> bool {
    has_optimizable_properties_with(bean, &BurnerConfig::default())
}

/// [`has_optimizable_properties`] under an explicit configuration.
pub fn has_optimizable_properties_with(bean: &BeanDescription, config: &BurnerConfig) -> bool {
    bean.has_trait::<TypeTraitDispatch>()
        && bean.properties().iter().any(|p| {
            (config.optimize_serialization && classify_getter(p, config).is_some())
                || (config.optimize_deserialization && classify_setter(p, config).is_some())
        })
}

// -----------------------------------------------------------------------------
// Tests
