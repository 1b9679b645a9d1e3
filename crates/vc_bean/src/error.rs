use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::error::Error;

use crate::category::Category;

// -----------------------------------------------------------------------------
// PropertyError

/// An error raised while reading or writing a property.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PropertyError {
    #[error("property `{property}` expects an instance of `{expected}`")]
    BeanMismatch {
        property: Cow<'static, str>,
        expected: &'static str,
    },

    #[error("property `{property}` of `{bean}` has no getter")]
    NotReadable {
        property: Cow<'static, str>,
        bean: &'static str,
    },

    #[error("property `{property}` of `{bean}` has no setter")]
    NotWritable {
        property: Cow<'static, str>,
        bean: &'static str,
    },

    #[error("property `{property}` expects a {expected} value, found {found}")]
    ValueMismatch {
        property: Cow<'static, str>,
        expected: Category,
        found: Category,
    },

    #[error("property `{property}` expects a `{expected}` object, found `{found}`")]
    ObjectMismatch {
        property: Cow<'static, str>,
        expected: &'static str,
        found: &'static str,
    },

    #[error("failed to decode property `{property}`: {source}")]
    Decode {
        property: Cow<'static, str>,
        #[source]
        source: erased_serde::Error,
    },

    /// An error raised by a property object installed through a modifier.
    #[error(transparent)]
    Access(Box<dyn Error + Send + Sync>),
}

impl PropertyError {
    /// Wraps an error raised by an installed property object.
    #[inline]
    pub fn access(error: impl Error + Send + Sync + 'static) -> Self {
        Self::Access(Box::new(error))
    }
}
