use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{LazyLock, PoisonError, RwLock};

use vc_bean::{BeanDescription, TypeIdMap};

use crate::collector::{DispatchPlan, Fingerprint, Side};
use crate::dispatch::{BeanPropertyAccessor, BeanPropertyMutator, TypeTraitDispatch, dispatch_trait};
use crate::error::SynthesisError;

// -----------------------------------------------------------------------------
// CacheEntry

struct CacheEntry<A: ?Sized> {
    fingerprint: Fingerprint,
    artifact: Arc<A>,
}

impl<A: ?Sized> Clone for CacheEntry<A> {
    fn clone(&self) -> Self {
        Self {
            fingerprint: self.fingerprint.clone(),
            artifact: Arc::clone(&self.artifact),
        }
    }
}

type Cache<A> = RwLock<TypeIdMap<CacheEntry<A>>>;

// -----------------------------------------------------------------------------
// DispatcherScope

static GLOBAL: LazyLock<Arc<DispatcherScope>> = LazyLock::new(|| Arc::new(DispatcherScope::new("global")));

/// A cache of synthesized dispatchers, one per bean type and side.
///
/// The first dispatcher stored for a bean type wins; later requests get
/// that instance. Synthesis runs without holding the cache lock, so
/// unrelated bean types never wait on each other, and two threads racing
/// on the same type may both synthesize while only one result is kept.
///
/// A request whose plan assigns indices differently from the cached
/// dispatcher fails with [`SynthesisError::Conflict`] instead of
/// returning a dispatcher that would answer the wrong properties.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_burner::DispatcherScope;
///
/// let scope = DispatcherScope::new("tests");
/// assert_eq!(scope.name(), "tests");
/// assert!(scope.is_empty());
/// assert!(!Arc::ptr_eq(&DispatcherScope::global(), &Arc::new(scope)));
/// ```
pub struct DispatcherScope {
    name: Cow<'static, str>,
    accessors: Cache<dyn BeanPropertyAccessor>,
    mutators: Cache<dyn BeanPropertyMutator>,
    synthesized: AtomicUsize,
}

impl DispatcherScope {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            accessors: RwLock::new(TypeIdMap::new()),
            mutators: RwLock::new(TypeIdMap::new()),
            synthesized: AtomicUsize::new(0),
        }
    }

    /// The process-wide default scope.
    #[inline]
    pub fn global() -> Arc<DispatcherScope> {
        Arc::clone(&GLOBAL)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cached read dispatcher for `bean`, synthesizing it from
    /// `plan` on first request.
    pub fn get_or_create_accessor(
        &self,
        bean: &BeanDescription,
        plan: &DispatchPlan,
    ) -> Result<Arc<dyn BeanPropertyAccessor>, SynthesisError> {
        self.get_or_create(&self.accessors, bean, plan, Side::Read, TypeTraitDispatch::synthesize_accessor)
    }

    /// Returns the cached write dispatcher for `bean`, synthesizing it from
    /// `plan` on first request.
    pub fn get_or_create_mutator(
        &self,
        bean: &BeanDescription,
        plan: &DispatchPlan,
    ) -> Result<Arc<dyn BeanPropertyMutator>, SynthesisError> {
        self.get_or_create(&self.mutators, bean, plan, Side::Write, TypeTraitDispatch::synthesize_mutator)
    }

    fn get_or_create<A: ?Sized>(
        &self,
        cache: &Cache<A>,
        bean: &BeanDescription,
        plan: &DispatchPlan,
        side: Side,
        synthesize: fn(&TypeTraitDispatch, &DispatchPlan) -> Result<Arc<A>, SynthesisError>,
    ) -> Result<Arc<A>, SynthesisError> {
        let type_id = bean.type_id();
        let conflict = || SynthesisError::Conflict {
            bean: bean.type_path(),
            side,
        };

        if plan.side() != side || plan.bean_type() != type_id {
            return Err(SynthesisError::Malformed {
                bean: bean.type_path(),
                side,
                reason: Cow::Borrowed("plan does not match the requested bean and side"),
            });
        }

        let cached = cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned();
        if let Some(entry) = cached {
            if entry.fingerprint != *plan.fingerprint() {
                return Err(conflict());
            }
            return Ok(entry.artifact);
        }

        let artifact = synthesize(dispatch_trait(bean)?, plan)?;
        self.synthesized.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "synthesized {side} dispatcher for `{}` ({} properties) in scope `{}`",
            bean.type_path(),
            plan.len(),
            self.name,
        );

        let mut guard = cache.write().unwrap_or_else(PoisonError::into_inner);
        let entry = guard.get_or_insert(type_id, || CacheEntry {
            fingerprint: plan.fingerprint().clone(),
            artifact,
        });
        if entry.fingerprint != *plan.fingerprint() {
            return Err(conflict());
        }
        Ok(Arc::clone(&entry.artifact))
    }

    /// Returns the cached read dispatcher for a bean type, if any.
    pub fn find_accessor(&self, bean: &BeanDescription) -> Option<Arc<dyn BeanPropertyAccessor>> {
        let guard = self.accessors.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(&bean.type_id()).map(|entry| Arc::clone(&entry.artifact))
    }

    /// Returns the cached write dispatcher for a bean type, if any.
    pub fn find_mutator(&self, bean: &BeanDescription) -> Option<Arc<dyn BeanPropertyMutator>> {
        let guard = self.mutators.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(&bean.type_id()).map(|entry| Arc::clone(&entry.artifact))
    }

    /// Number of synthesis runs, including those whose result lost a race.
    #[inline]
    pub fn synthesized(&self) -> usize {
        self.synthesized.load(Ordering::Relaxed)
    }

    /// Number of cached dispatchers across both sides.
    pub fn len(&self) -> usize {
        let accessors = self.accessors.read().unwrap_or_else(PoisonError::into_inner).len();
        let mutators = self.mutators.read().unwrap_or_else(PoisonError::into_inner).len();
        accessors + mutators
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for DispatcherScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherScope")
            .field("name", &self.name)
            .field("cached", &self.len())
            .field("synthesized", &self.synthesized())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
