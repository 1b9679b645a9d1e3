use alloc::borrow::Cow;
use core::ops::Range;

use vc_bean::{Category, PropertyError};

use crate::collector::Side;

// -----------------------------------------------------------------------------
// DispatchError

/// An error raised by a generated dispatcher.
///
/// These indicate a wrapper bound to the wrong dispatcher or handed the
/// wrong bean; they are propagated to the caller, never recovered from.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DispatchError {
    #[error("invalid {category} property index {index} for `{bean}` (valid: 0 <= n < {len})")]
    InvalidIndex {
        bean: &'static str,
        category: Category,
        index: usize,
        len: usize,
    },

    #[error("dispatcher for `{expected}` called with an instance of another type")]
    TypeMismatch { expected: &'static str },

    /// An object setter rejected the value.
    #[error(transparent)]
    Value(#[from] PropertyError),
}

impl DispatchError {
    /// The valid index range carried by [`DispatchError::InvalidIndex`].
    pub fn valid_range(&self) -> Option<Range<usize>> {
        match self {
            Self::InvalidIndex { len, .. } => Some(0..*len),
            _ => None,
        }
    }
}

impl From<DispatchError> for PropertyError {
    #[inline]
    fn from(value: DispatchError) -> Self {
        PropertyError::access(value)
    }
}

// -----------------------------------------------------------------------------
// SynthesisError

/// An error raised while creating or loading a dispatcher.
///
/// Always recoverable: the caller keeps the generic property objects.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum SynthesisError {
    #[error("`{bean}` does not register `TypeTraitDispatch`")]
    Unsupported { bean: &'static str },

    #[error("cannot synthesize {side} dispatcher for `{bean}`: {reason}")]
    Malformed {
        bean: &'static str,
        side: Side,
        reason: Cow<'static, str>,
    },

    #[error("`{bean}` already has a {side} dispatcher built from different properties")]
    Conflict { bean: &'static str, side: Side },
}
