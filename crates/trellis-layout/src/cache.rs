//! Per-pass measurement cache.
//!
//! Each element of a layout snapshot is measured at most once for its minimum
//! and once for its preferred size; both axis engines read the cached result.

use std::cell::{Cell, OnceCell};
use trellis_core::Size;

/// Hit and miss counters of a measurement cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeasureStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that queried the element
    pub misses: usize,
}

/// Lazily populated minimum/preferred sizes, one slot pair per element.
///
/// No eviction: the whole cache is dropped with its snapshot.
#[derive(Debug, Default)]
pub(crate) struct MeasureCache {
    minimum: Vec<OnceCell<Size>>,
    preferred: Vec<OnceCell<Size>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl MeasureCache {
    /// Create an empty cache for `len` elements.
    pub(crate) fn with_len(len: usize) -> Self {
        Self {
            minimum: (0..len).map(|_| OnceCell::new()).collect(),
            preferred: (0..len).map(|_| OnceCell::new()).collect(),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Minimum size of element `index`, measuring on first use.
    pub(crate) fn minimum(&self, index: usize, measure: impl FnOnce() -> Size) -> Size {
        self.lookup(&self.minimum[index], measure)
    }

    /// Preferred size of element `index`, measuring on first use.
    pub(crate) fn preferred(&self, index: usize, measure: impl FnOnce() -> Size) -> Size {
        self.lookup(&self.preferred[index], measure)
    }

    fn lookup(&self, slot: &OnceCell<Size>, measure: impl FnOnce() -> Size) -> Size {
        if let Some(size) = slot.get() {
            self.hits.set(self.hits.get() + 1);
            *size
        } else {
            self.misses.set(self.misses.get() + 1);
            *slot.get_or_init(measure)
        }
    }

    /// Current hit/miss counters.
    pub(crate) fn stats(&self) -> MeasureStats {
        MeasureStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
        }
    }

    /// Number of measured sizes held.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.minimum.iter().filter(|slot| slot.get().is_some()).count()
            + self
                .preferred
                .iter()
                .filter(|slot| slot.get().is_some())
                .count()
    }

    /// Check if nothing has been measured yet.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
