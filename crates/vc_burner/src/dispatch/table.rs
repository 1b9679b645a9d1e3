use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// Largest table selected by a conditional chain; larger tables use
/// direct indexing.
pub const CHAIN_LIMIT: usize = 4;

/// Index-to-handle selection for one category of a dispatcher.
///
/// Tables of up to [`CHAIN_LIMIT`] entries select by comparing the index
/// against each position in turn; larger ones index directly. Both shapes
/// return the same handle for every index and `None` outside `0..len`.
///
/// # Examples
///
/// ```
/// use vc_burner::dispatch::{CHAIN_LIMIT, DispatchTable};
///
/// let small = DispatchTable::new(vec!['a', 'b']);
/// assert!(small.is_chain());
/// assert_eq!(small.select(1), Some(&'b'));
/// assert_eq!(small.select(2), None);
///
/// let large = DispatchTable::new((0..=CHAIN_LIMIT).collect());
/// assert!(!large.is_chain());
/// assert_eq!(large.select(CHAIN_LIMIT), Some(&CHAIN_LIMIT));
/// ```
pub struct DispatchTable<H> {
    handles: Box<[H]>,
    chain: bool,
}

impl<H> DispatchTable<H> {
    pub fn new(handles: Vec<H>) -> Self {
        let chain = handles.len() <= CHAIN_LIMIT;
        Self {
            handles: handles.into_boxed_slice(),
            chain,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Returns `true` if selection uses the conditional chain.
    #[inline]
    pub fn is_chain(&self) -> bool {
        self.chain
    }

    #[inline]
    pub fn select(&self, index: usize) -> Option<&H> {
        if self.chain {
            select_chain(&self.handles, index)
        } else {
            self.handles.get(index)
        }
    }
}

#[inline]
fn select_chain<H>(handles: &[H], index: usize) -> Option<&H> {
    match handles {
        [] => None,
        [a] => (index == 0).then_some(a),
        [a, b] => {
            if index == 0 {
                Some(a)
            } else if index == 1 {
                Some(b)
            } else {
                None
            }
        }
        [a, b, c] => {
            if index == 0 {
                Some(a)
            } else if index == 1 {
                Some(b)
            } else if index == 2 {
                Some(c)
            } else {
                None
            }
        }
        [a, b, c, d] => {
            if index == 0 {
                Some(a)
            } else if index == 1 {
                Some(b)
            } else if index == 2 {
                Some(c)
            } else if index == 3 {
                Some(d)
            } else {
                None
            }
        }
        _ => handles.get(index),
    }
}

impl<H> Default for DispatchTable<H> {
    #[inline]
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<H> fmt::Debug for DispatchTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("len", &self.handles.len())
            .field("chain", &self.chain)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
