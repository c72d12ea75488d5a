//! Axis engine: projects a layout snapshot onto one axis.
//!
//! The same engine runs twice per pass, once with [`Axis::Horizontal`]
//! (columns, widths) and once with [`Axis::Vertical`] (rows, heights). It
//! derives per-cell stretch weights, aggregated size policies and the gap
//! adjacency of cells; measurement is delegated to the snapshot cache.

use crate::constraints::{Anchor, Fill, GridConstraints, SizePolicy};
use crate::eliminate::eliminate;
use crate::manager::GridChild;
use crate::state::LayoutState;
use serde::{Deserialize, Serialize};
use trellis_core::{LayoutElement, Size};

/// One of the two grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Columns and widths
    Horizontal,
    /// Rows and heights
    Vertical,
}

impl Axis {
    /// First cell of an element along this axis.
    #[must_use]
    pub const fn cell(self, constraints: &GridConstraints) -> usize {
        match self {
            Self::Horizontal => constraints.column(),
            Self::Vertical => constraints.row(),
        }
    }

    /// Number of cells an element covers along this axis.
    #[must_use]
    pub const fn span(self, constraints: &GridConstraints) -> usize {
        match self {
            Self::Horizontal => constraints.col_span(),
            Self::Vertical => constraints.row_span(),
        }
    }

    /// Size policy of an element along this axis.
    #[must_use]
    pub const fn size_policy(self, constraints: &GridConstraints) -> SizePolicy {
        match self {
            Self::Horizontal => constraints.h_size_policy(),
            Self::Vertical => constraints.v_size_policy(),
        }
    }

    /// Component of a size along this axis.
    #[must_use]
    pub const fn extent(self, size: Size) -> i32 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Whether a fill mode stretches along this axis.
    #[must_use]
    pub const fn fills(self, fill: Fill) -> bool {
        match self {
            Self::Horizontal => fill.horizontal(),
            Self::Vertical => fill.vertical(),
        }
    }

    /// Anchor bit pinning an element to the far edge (east or south).
    #[must_use]
    pub const fn far_anchor(self) -> Anchor {
        match self {
            Self::Horizontal => Anchor::EAST,
            Self::Vertical => Anchor::SOUTH,
        }
    }

    /// Anchor bit pinning an element to the near edge (west or north).
    #[must_use]
    pub const fn near_anchor(self) -> Anchor {
        match self {
            Self::Horizontal => Anchor::WEST,
            Self::Vertical => Anchor::NORTH,
        }
    }

    /// Cell universe of a grid along this axis.
    #[must_use]
    pub const fn cell_count(self, row_count: usize, column_count: usize) -> usize {
        match self {
            Self::Horizontal => column_count,
            Self::Vertical => row_count,
        }
    }
}

/// Per-axis projection of a layout snapshot.
///
/// Cell arrays are indexed by the grid's own cell indices. Elimination only
/// feeds the size-policy aggregation; placement uses the original spans.
#[derive(Debug)]
pub(crate) struct DimensionInfo {
    axis: Axis,
    gap: i32,
    cells: Vec<usize>,
    spans: Vec<usize>,
    spans_after_elimination: Vec<usize>,
    policies: Vec<SizePolicy>,
    fillers: Vec<bool>,
    stretches: Vec<u32>,
    cell_size_policies: Vec<SizePolicy>,
    gap_after: Vec<bool>,
}

impl DimensionInfo {
    pub(crate) fn new(state: &LayoutState, gap: i32, axis: Axis) -> Self {
        let count = state.count();
        let cells: Vec<usize> = (0..count).map(|i| axis.cell(state.constraints(i))).collect();
        let spans: Vec<usize> = (0..count).map(|i| axis.span(state.constraints(i))).collect();
        let policies = (0..count)
            .map(|i| axis.size_policy(state.constraints(i)))
            .collect();
        let fillers = (0..count).map(|i| state.is_filler(i)).collect();
        let cell_count = axis.cell_count(state.row_count(), state.column_count());

        // Hook for per-cell weights; every cell weighs the same for now.
        let stretches = vec![1; cell_count];

        let mut spans_after_elimination = spans.clone();
        let mut eliminated = Vec::new();
        eliminate(
            &mut cells.clone(),
            &mut spans_after_elimination,
            &mut eliminated,
        );

        let mut info = Self {
            axis,
            gap,
            cells,
            spans,
            spans_after_elimination,
            policies,
            fillers,
            stretches,
            cell_size_policies: Vec::new(),
            gap_after: Vec::new(),
        };
        info.cell_size_policies = (0..cell_count)
            .map(|cell| info.aggregate_cell_policy(cell, &eliminated))
            .collect();
        info.gap_after = (0..cell_count)
            .map(|cell| info.should_add_gap_after_cell(cell))
            .collect();
        info
    }

    pub(crate) const fn axis(&self) -> Axis {
        self.axis
    }

    pub(crate) const fn gap(&self) -> i32 {
        self.gap
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.stretches.len()
    }

    pub(crate) fn component_count(&self) -> usize {
        self.cells.len()
    }

    /// Original first cell of element `i`.
    pub(crate) fn cell(&self, i: usize) -> usize {
        self.cells[i]
    }

    /// Original span of element `i`.
    pub(crate) fn span(&self, i: usize) -> usize {
        self.spans[i]
    }

    pub(crate) fn size_policy(&self, i: usize) -> SizePolicy {
        self.policies[i]
    }

    pub(crate) fn stretches(&self) -> &[u32] {
        &self.stretches
    }

    pub(crate) fn cell_size_policy(&self, cell: usize) -> SizePolicy {
        self.cell_size_policies[cell]
    }

    pub(crate) fn cell_size_policies(&self) -> &[SizePolicy] {
        &self.cell_size_policies
    }

    pub(crate) fn preferred_extent<E: LayoutElement>(
        &self,
        i: usize,
        state: &LayoutState,
        children: &[GridChild<E>],
    ) -> i32 {
        self.axis.extent(state.measured_preferred(i, children))
    }

    pub(crate) fn minimum_extent<E: LayoutElement>(
        &self,
        i: usize,
        state: &LayoutState,
        children: &[GridChild<E>],
    ) -> i32 {
        self.axis.extent(state.measured_minimum(i, children))
    }

    pub(crate) fn component_belongs_cell(&self, i: usize, cell: usize) -> bool {
        self.cells[i] <= cell && cell < self.cells[i] + self.spans[i]
    }

    /// A cell is empty when no non-filler element starts in it.
    pub(crate) fn is_cell_empty(&self, cell: usize) -> bool {
        !(0..self.component_count()).any(|i| self.cells[i] == cell && !self.fillers[i])
    }

    /// Whether a gap separates `cell` from the next cell.
    pub(crate) fn gap_after(&self, cell: usize) -> bool {
        self.gap_after[cell]
    }

    /// Total gap inside a span of cells.
    pub(crate) fn count_gap(&self, start: usize, span: usize) -> i32 {
        let gaps = (start..start + span.saturating_sub(1))
            .filter(|&cell| self.gap_after[cell])
            .count() as i32;
        gaps.saturating_mul(self.gap)
    }

    /// Total gap across the whole axis.
    pub(crate) fn total_gap(&self) -> i32 {
        self.count_gap(0, self.cell_count())
    }

    fn aggregate_cell_policy(&self, cell: usize, eliminated: &[usize]) -> SizePolicy {
        if eliminated.contains(&cell) {
            return SizePolicy::CAN_SHRINK;
        }

        let mut can_shrink = true;
        let mut can_grow = false;
        let mut want_grow = false;

        let mut weak_can_grow = true;
        let mut weak_want_grow = true;

        let mut belonging = 0;

        for i in 0..self.component_count() {
            if !self.component_belongs_cell(i, cell) {
                continue;
            }
            belonging += 1;

            let policy = self.policies[i];
            let this_can_shrink = policy.contains(SizePolicy::CAN_SHRINK);
            let this_can_grow = policy.contains(SizePolicy::CAN_GROW);
            let this_want_grow = policy.contains(SizePolicy::WANT_GROW);

            if self.cells[i] == cell && self.spans_after_elimination[i] == 1 {
                can_shrink &= this_can_shrink;
                can_grow |= this_can_grow;
                want_grow |= this_want_grow;
            }

            weak_can_grow &= this_can_grow;
            weak_want_grow &= this_want_grow;
        }

        let mut result = SizePolicy::empty();
        if can_shrink {
            result |= SizePolicy::CAN_SHRINK;
        }
        if can_grow || (belonging > 0 && weak_can_grow) {
            result |= SizePolicy::CAN_GROW;
        }
        if want_grow || (belonging > 0 && weak_want_grow) {
            result |= SizePolicy::WANT_GROW;
        }
        result
    }

    fn should_add_gap_after_cell(&self, cell: usize) -> bool {
        let next_not_empty = (cell + 1..self.cell_count()).find(|&c| !self.is_cell_empty(c));

        let mut ends_in_this = false;
        let mut starts_in_next = false;

        for i in 0..self.component_count() {
            if self.fillers[i] {
                continue;
            }
            if Some(self.cells[i]) == next_not_empty {
                starts_in_next = true;
            }
            if self.cells[i] + self.spans[i] - 1 == cell {
                ends_in_this = true;
            }
        }

        starts_in_next && ends_in_this
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::FixedElement;

    fn build(
        placements: &[(usize, usize, SizePolicy)],
        fillers: &[bool],
        columns: usize,
        gap: i32,
    ) -> DimensionInfo {
        let children: Vec<GridChild<FixedElement>> = placements
            .iter()
            .zip(fillers.iter().chain(std::iter::repeat(&false)))
            .map(|(&(column, span, policy), &filler)| GridChild {
                element: FixedElement::sized(10, 10).with_filler(filler),
                constraints: GridConstraints::at(0, column)
                    .with_span(1, span)
                    .with_policies(policy, SizePolicy::default()),
            })
            .collect();
        let state = LayoutState::new(&children, 1, columns, true);
        DimensionInfo::new(&state, gap, Axis::Horizontal)
    }

    // =========================================================================
    // Axis Tests
    // =========================================================================

    #[test]
    fn test_axis_projection() {
        let c = GridConstraints::at(1, 2)
            .with_span(3, 4)
            .with_policies(SizePolicy::WANT_GROW, SizePolicy::FIXED);

        assert_eq!(Axis::Horizontal.cell(&c), 2);
        assert_eq!(Axis::Vertical.cell(&c), 1);
        assert_eq!(Axis::Horizontal.span(&c), 4);
        assert_eq!(Axis::Vertical.span(&c), 3);
        assert_eq!(Axis::Horizontal.size_policy(&c), SizePolicy::WANT_GROW);
        assert_eq!(Axis::Vertical.size_policy(&c), SizePolicy::FIXED);
        assert_eq!(Axis::Horizontal.extent(Size::new(7, 9)), 7);
        assert_eq!(Axis::Vertical.extent(Size::new(7, 9)), 9);
        assert_eq!(Axis::Horizontal.cell_count(2, 5), 5);
        assert_eq!(Axis::Vertical.cell_count(2, 5), 2);
    }

    #[test]
    fn test_axis_fill_and_anchor() {
        assert!(Axis::Horizontal.fills(Fill::Horizontal));
        assert!(!Axis::Vertical.fills(Fill::Horizontal));
        assert!(Axis::Vertical.fills(Fill::Both));
        assert_eq!(Axis::Horizontal.far_anchor(), Anchor::EAST);
        assert_eq!(Axis::Vertical.near_anchor(), Anchor::NORTH);
    }

    // =========================================================================
    // Cell Policy Aggregation Tests
    // =========================================================================

    #[test]
    fn test_single_occupant_policy_is_preserved() {
        for bits in 0..8 {
            let policy = SizePolicy::from_bits_truncate(bits);
            let info = build(&[(0, 1, policy)], &[], 1, 0);
            assert_eq!(info.cell_size_policy(0), policy);
        }
    }

    #[test]
    fn test_empty_cell_can_only_shrink() {
        let info = build(&[(0, 1, SizePolicy::all())], &[], 3, 0);
        assert_eq!(info.cell_size_policy(1), SizePolicy::CAN_SHRINK);
        assert_eq!(info.cell_size_policy(2), SizePolicy::CAN_SHRINK);
    }

    #[test]
    fn test_eliminated_cell_can_only_shrink() {
        let info = build(
            &[(0, 2, SizePolicy::all()), (2, 1, SizePolicy::default())],
            &[],
            3,
            0,
        );
        assert_eq!(info.cell_size_policy(1), SizePolicy::CAN_SHRINK);
    }

    #[test]
    fn test_strict_merge_of_single_span_occupants() {
        let info = build(
            &[
                (0, 1, SizePolicy::CAN_SHRINK | SizePolicy::CAN_GROW),
                (0, 1, SizePolicy::WANT_GROW),
            ],
            &[],
            1,
            0,
        );
        // Shrink needs all occupants, grow needs any.
        assert_eq!(
            info.cell_size_policy(0),
            SizePolicy::CAN_GROW | SizePolicy::WANT_GROW
        );
    }

    #[test]
    fn test_weak_merge_from_spanning_elements() {
        // Column 1 is only covered by the spanning element, but a boundary
        // at column 1 is defined by the third element.
        let info = build(
            &[
                (0, 2, SizePolicy::CAN_GROW | SizePolicy::WANT_GROW),
                (0, 1, SizePolicy::FIXED),
                (1, 1, SizePolicy::CAN_GROW),
            ],
            &[],
            2,
            0,
        );
        // Cell 0: single-span occupant is FIXED, weak AND over both fails.
        assert_eq!(info.cell_size_policy(0), SizePolicy::empty());
        // Cell 1: strict gives CAN_GROW; weak WANT_GROW fails because of
        // the third element.
        assert_eq!(info.cell_size_policy(1), SizePolicy::CAN_GROW);
    }

    #[test]
    fn test_weak_merge_grants_growth_to_span_only_cell() {
        // Column 1 has no single-span occupant.
        let info = build(
            &[
                (0, 2, SizePolicy::WANT_GROW | SizePolicy::CAN_GROW),
                (0, 1, SizePolicy::default()),
                (1, 2, SizePolicy::WANT_GROW | SizePolicy::CAN_GROW),
                (2, 1, SizePolicy::default()),
            ],
            &[],
            3,
            0,
        );
        // Cell 1 is touched by both spanning elements only.
        assert_eq!(
            info.cell_size_policy(1),
            SizePolicy::CAN_SHRINK | SizePolicy::CAN_GROW | SizePolicy::WANT_GROW
        );
    }

    // =========================================================================
    // Gap Tests
    // =========================================================================

    #[test]
    fn test_gaps_between_adjacent_content() {
        let info = build(
            &[(0, 1, SizePolicy::default()), (1, 1, SizePolicy::default())],
            &[],
            2,
            5,
        );
        assert!(info.gap_after(0));
        assert!(!info.gap_after(1));
        assert_eq!(info.total_gap(), 5);
    }

    #[test]
    fn test_gap_collapses_around_empty_cell() {
        let info = build(
            &[(0, 1, SizePolicy::default()), (2, 1, SizePolicy::default())],
            &[],
            3,
            5,
        );
        assert!(info.gap_after(0));
        assert!(!info.gap_after(1));
        assert_eq!(info.total_gap(), 5);
    }

    #[test]
    fn test_gap_collapses_around_filler() {
        let info = build(
            &[
                (0, 1, SizePolicy::default()),
                (1, 1, SizePolicy::default()),
                (2, 1, SizePolicy::default()),
            ],
            &[false, true, false],
            3,
            5,
        );
        assert!(info.gap_after(0));
        assert!(!info.gap_after(1));
        assert!(info.is_cell_empty(1));
        assert_eq!(info.total_gap(), 5);
    }

    #[test]
    fn test_gap_inside_span_is_counted() {
        let info = build(
            &[
                (0, 1, SizePolicy::default()),
                (1, 1, SizePolicy::default()),
                (0, 2, SizePolicy::default()),
            ],
            &[],
            2,
            4,
        );
        assert_eq!(info.count_gap(0, 2), 4);
        assert_eq!(info.count_gap(1, 1), 0);
    }

    #[test]
    fn test_stretches_default_to_one() {
        let info = build(&[(0, 1, SizePolicy::default())], &[], 4, 0);
        assert_eq!(info.cell_count(), 4);
        assert!(info.stretches().iter().all(|&s| s == 1));
        assert_eq!(info.stretches()[3], 1);
    }
}
