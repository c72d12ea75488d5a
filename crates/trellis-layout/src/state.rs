//! Layout snapshot: the elements taking part in one layout pass.

use crate::cache::{MeasureCache, MeasureStats};
use crate::constraints::GridConstraints;
use crate::manager::GridChild;
use crate::measure::{effective_minimum_size, effective_preferred_size};
use trellis_core::{LayoutElement, Size};

/// Filtered, ordered view of a grid's children for one layout pass.
///
/// The snapshot stores child indices rather than borrowing the children, so
/// every accessor that needs the element itself takes the child slice it was
/// built from.
#[derive(Debug)]
pub(crate) struct LayoutState {
    children: Vec<usize>,
    constraints: Vec<GridConstraints>,
    fillers: Vec<bool>,
    row_count: usize,
    column_count: usize,
    cache: MeasureCache,
}

impl LayoutState {
    /// Build a snapshot, optionally dropping invisible elements.
    ///
    /// Relative order of the remaining elements is preserved.
    pub(crate) fn new<E: LayoutElement>(
        children: &[GridChild<E>],
        row_count: usize,
        column_count: usize,
        ignore_invisible: bool,
    ) -> Self {
        let mut indices = Vec::with_capacity(children.len());
        let mut constraints = Vec::with_capacity(children.len());
        let mut fillers = Vec::with_capacity(children.len());

        for (index, child) in children.iter().enumerate() {
            if ignore_invisible && !child.element.is_visible() {
                continue;
            }
            indices.push(index);
            constraints.push(child.constraints.clone());
            fillers.push(child.element.is_filler());
        }

        let cache = MeasureCache::with_len(indices.len());
        Self {
            children: indices,
            constraints,
            fillers,
            row_count,
            column_count,
            cache,
        }
    }

    /// Number of elements in the pass.
    pub(crate) fn count(&self) -> usize {
        self.children.len()
    }

    /// Index into the grid's child list of pass element `i`.
    pub(crate) fn child_index(&self, i: usize) -> usize {
        self.children[i]
    }

    /// Constraints of pass element `i`.
    pub(crate) fn constraints(&self, i: usize) -> &GridConstraints {
        &self.constraints[i]
    }

    /// Whether pass element `i` is a filler.
    pub(crate) fn is_filler(&self, i: usize) -> bool {
        self.fillers[i]
    }

    /// Grid row count.
    pub(crate) const fn row_count(&self) -> usize {
        self.row_count
    }

    /// Grid column count.
    pub(crate) const fn column_count(&self) -> usize {
        self.column_count
    }

    /// Element `i` of the pass.
    pub(crate) fn element<'a, E>(&self, i: usize, children: &'a [GridChild<E>]) -> &'a E {
        &children[self.children[i]].element
    }

    /// Effective minimum size of element `i`, indent included, measured once per pass.
    pub(crate) fn measured_minimum<E: LayoutElement>(
        &self,
        i: usize,
        children: &[GridChild<E>],
    ) -> Size {
        self.cache.minimum(i, || {
            effective_minimum_size(self.element(i, children), &self.constraints[i], true)
        })
    }

    /// Effective preferred size of element `i`, indent included, measured once per pass.
    pub(crate) fn measured_preferred<E: LayoutElement>(
        &self,
        i: usize,
        children: &[GridChild<E>],
    ) -> Size {
        self.cache.preferred(i, || {
            effective_preferred_size(self.element(i, children), &self.constraints[i], true)
        })
    }

    /// Cache counters for this pass.
    pub(crate) fn stats(&self) -> MeasureStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::SizeOverride;
    use trellis_core::FixedElement;

    fn child(element: FixedElement, row: usize, column: usize) -> GridChild<FixedElement> {
        GridChild {
            element,
            constraints: GridConstraints::at(row, column),
        }
    }

    #[test]
    fn test_state_keeps_order() {
        let children = vec![
            child(FixedElement::sized(1, 1), 0, 0),
            child(FixedElement::sized(2, 2), 0, 1),
            child(FixedElement::sized(3, 3), 1, 0),
        ];
        let state = LayoutState::new(&children, 2, 2, true);

        assert_eq!(state.count(), 3);
        assert_eq!(state.row_count(), 2);
        assert_eq!(state.column_count(), 2);
        assert_eq!(state.constraints(2).row(), 1);
        assert_eq!(state.element(1, &children).preferred, Size::new(2, 2));
    }

    #[test]
    fn test_state_filters_invisible() {
        let children = vec![
            child(FixedElement::sized(1, 1), 0, 0),
            child(FixedElement::sized(2, 2).with_visible(false), 0, 1),
            child(FixedElement::sized(3, 3), 0, 2),
        ];

        let state = LayoutState::new(&children, 1, 3, true);
        assert_eq!(state.count(), 2);
        assert_eq!(state.child_index(0), 0);
        assert_eq!(state.child_index(1), 2);

        let state = LayoutState::new(&children, 1, 3, false);
        assert_eq!(state.count(), 3);
    }

    #[test]
    fn test_state_records_fillers() {
        let children = vec![
            child(FixedElement::sized(1, 1), 0, 0),
            child(FixedElement::default().with_filler(true), 0, 1),
        ];
        let state = LayoutState::new(&children, 1, 2, true);
        assert!(!state.is_filler(0));
        assert!(state.is_filler(1));
    }

    #[test]
    fn test_measurements_are_cached_and_overridden() {
        let mut c = GridConstraints::at(0, 0).with_indent(1);
        c.set_preferred_size(SizeOverride::height(30)).unwrap();
        let children = vec![GridChild {
            element: FixedElement::new(Size::new(5, 5), Size::new(20, 10)),
            constraints: c,
        }];
        let state = LayoutState::new(&children, 1, 1, true);

        assert_eq!(state.measured_preferred(0, &children), Size::new(30, 30));
        assert_eq!(state.measured_preferred(0, &children), Size::new(30, 30));
        assert_eq!(state.measured_minimum(0, &children), Size::new(15, 5));

        let stats = state.stats();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 1);
    }
}
