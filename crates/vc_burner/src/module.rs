use alloc::sync::Arc;

use vc_bean::{BeanDescription, BeanMapper, Module};

use crate::de::BurnerDeserializerModifier;
use crate::scope::DispatcherScope;
use crate::ser::BurnerSerializerModifier;

// -----------------------------------------------------------------------------
// BurnerConfig

/// Which property objects [`BurnerModule`] replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnerConfig {
    /// Install the serializer modifier.
    pub optimize_serialization: bool,
    /// Install the deserializer modifier.
    pub optimize_deserialization: bool,
    /// Dispatch object properties too, not only primitives.
    pub optimize_objects: bool,
}

impl Default for BurnerConfig {
    #[inline]
    fn default() -> Self {
        Self {
            optimize_serialization: true,
            optimize_deserialization: true,
            optimize_objects: true,
        }
    }
}

// -----------------------------------------------------------------------------
// BurnerModule

/// Installs optimized property dispatch into a [`BeanMapper`].
///
/// By default dispatchers are cached in [`DispatcherScope::global`];
/// [`with_scope`](Self::with_scope) isolates them, e.g. per mapper.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_bean::BeanMapper;
/// use vc_burner::{BurnerModule, DispatcherScope};
///
/// let scope = Arc::new(DispatcherScope::new("mapper"));
/// let mut mapper = BeanMapper::new();
/// mapper.register_module(&BurnerModule::new().with_scope(scope));
/// assert_eq!(mapper.modules(), ["vc_burner"]);
/// ```
#[derive(Debug, Clone)]
pub struct BurnerModule {
    scope: Arc<DispatcherScope>,
    config: BurnerConfig,
}

impl BurnerModule {
    pub const NAME: &'static str = "vc_burner";

    #[inline]
    pub fn new() -> Self {
        Self {
            scope: DispatcherScope::global(),
            config: BurnerConfig::default(),
        }
    }

    #[inline]
    pub fn with_scope(mut self, scope: Arc<DispatcherScope>) -> Self {
        self.scope = scope;
        self
    }

    #[inline]
    pub fn with_config(mut self, config: BurnerConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn scope(&self) -> &Arc<DispatcherScope> {
        &self.scope
    }

    #[inline]
    pub fn config(&self) -> &BurnerConfig {
        &self.config
    }

    /// Returns `true` if this module would optimize any property of `bean`.
    #[inline]
    pub fn has_optimizable_properties(&self, bean: &BeanDescription) -> bool {
        crate::classify::has_optimizable_properties_with(bean, &self.config)
    }
}

impl Default for BurnerModule {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Module for BurnerModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn setup(&self, mapper: &mut BeanMapper) {
        if self.config.optimize_serialization {
            let modifier = BurnerSerializerModifier::new(Arc::clone(&self.scope), self.config);
            mapper.add_serializer_modifier(Arc::new(modifier));
        }
        if self.config.optimize_deserialization {
            let modifier = BurnerDeserializerModifier::new(Arc::clone(&self.scope), self.config);
            mapper.add_deserializer_modifier(Arc::new(modifier));
        }
        log::debug!("installed `{}` with {:?} in scope `{}`", Self::NAME, self.config, self.scope.name());
    }
}

// -----------------------------------------------------------------------------
// Tests
