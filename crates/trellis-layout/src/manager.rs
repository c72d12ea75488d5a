//! Grid layout manager: measurement, space distribution, coordinate
//! assignment and element placement.
//!
//! The manager owns its children and a lazily built layout cache. Every
//! measuring or placing call builds the cache on first use; topology changes
//! (adding, removing, reconfiguring) drop it again. A new available size
//! never does.

use crate::cache::MeasureStats;
use crate::constraints::{Anchor, GridConstraints, SizePolicy};
use crate::dimension::{Axis, DimensionInfo};
use crate::distribute::{distribute, first_matching_tier};
use crate::error::LayoutError;
use crate::measure::{clamp_to_element, indent_width};
use crate::state::LayoutState;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use trellis_core::{Insets, LayoutElement, Rect, Size};

/// Default per-cell size floor in pixels.
pub const DEFAULT_MIN_CELL_SIZE: i32 = 7;

/// An element attached to a grid together with its constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridChild<E> {
    pub(crate) element: E,
    pub(crate) constraints: GridConstraints,
}

impl<E> GridChild<E> {
    /// The attached element.
    pub const fn element(&self) -> &E {
        &self.element
    }

    /// The constraints the element was attached with.
    pub const fn constraints(&self) -> &GridConstraints {
        &self.constraints
    }

    /// Split into element and constraints.
    pub fn into_parts(self) -> (E, GridConstraints) {
        (self.element, self.constraints)
    }
}

/// Grid-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Border inside the host insets
    pub margin: Insets,
    /// Gap between adjacent columns
    pub h_gap: i32,
    /// Gap between adjacent rows
    pub v_gap: i32,
    /// Give every column the same width
    pub same_size_horizontally: bool,
    /// Give every row the same height
    pub same_size_vertically: bool,
    /// Leave invisible elements out of the layout
    pub ignore_invisible: bool,
    /// Size floor of every cell
    pub min_cell_size: i32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            margin: Insets::ZERO,
            h_gap: 0,
            v_gap: 0,
            same_size_horizontally: false,
            same_size_vertically: false,
            ignore_invisible: true,
            min_cell_size: DEFAULT_MIN_CELL_SIZE,
        }
    }
}

impl GridOptions {
    /// Set the margin.
    #[must_use]
    pub const fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    /// Set the horizontal and vertical gaps.
    #[must_use]
    pub const fn with_gaps(mut self, h_gap: i32, v_gap: i32) -> Self {
        self.h_gap = h_gap;
        self.v_gap = v_gap;
        self
    }

    /// Enable uniform cell sizes per axis.
    #[must_use]
    pub const fn with_same_size(mut self, horizontally: bool, vertically: bool) -> Self {
        self.same_size_horizontally = horizontally;
        self.same_size_vertically = vertically;
        self
    }

    /// Check gaps, margin and cell floor.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.h_gap < 0 {
            return Err(LayoutError::NegativeGap {
                axis: "horizontal",
                value: self.h_gap,
            });
        }
        if self.v_gap < 0 {
            return Err(LayoutError::NegativeGap {
                axis: "vertical",
                value: self.v_gap,
            });
        }
        if !self.margin.is_non_negative() {
            return Err(LayoutError::NegativeMargin);
        }
        if self.min_cell_size < 0 {
            return Err(LayoutError::NegativeSize {
                field: "min_cell_size",
                axis: "cell",
                value: self.min_cell_size,
            });
        }
        Ok(())
    }

    const fn gap(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.h_gap,
            Axis::Vertical => self.v_gap,
        }
    }

    const fn same_size(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.same_size_horizontally,
            Axis::Vertical => self.same_size_vertically,
        }
    }
}

/// Cell origins and extents from the last layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Left edge of every column
    pub xs: Vec<i32>,
    /// Width of every column
    pub widths: Vec<i32>,
    /// Top edge of every row
    pub ys: Vec<i32>,
    /// Height of every row
    pub heights: Vec<i32>,
}

/// Snapshot plus both axis engines, valid until the next invalidation.
#[derive(Debug)]
struct LayoutCache {
    state: LayoutState,
    horizontal: DimensionInfo,
    vertical: DimensionInfo,
}

impl LayoutCache {
    fn build<E: LayoutElement>(
        children: &[GridChild<E>],
        row_count: usize,
        column_count: usize,
        options: &GridOptions,
    ) -> Self {
        let state = LayoutState::new(children, row_count, column_count, options.ignore_invisible);
        let [horizontal, vertical] = [Axis::Horizontal, Axis::Vertical]
            .map(|axis| DimensionInfo::new(&state, options.gap(axis), axis));
        debug!(
            elements = state.count(),
            rows = row_count,
            columns = column_count,
            "built layout snapshot"
        );
        Self {
            state,
            horizontal,
            vertical,
        }
    }

    fn ensure<'a, E: LayoutElement>(
        slot: &'a mut Option<Self>,
        children: &[GridChild<E>],
        row_count: usize,
        column_count: usize,
        options: &GridOptions,
    ) -> &'a Self {
        slot.get_or_insert_with(|| Self::build(children, row_count, column_count, options))
    }

    const fn info(&self, axis: Axis) -> &DimensionInfo {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    fn pass<'a, E: LayoutElement>(
        &'a self,
        axis: Axis,
        children: &'a [GridChild<E>],
        options: &GridOptions,
    ) -> AxisPass<'a, E> {
        AxisPass {
            info: self.info(axis),
            state: &self.state,
            children,
            min_cell_size: options.min_cell_size,
            same_size: options.same_size(axis),
        }
    }
}

/// One axis of one measuring or placing call.
struct AxisPass<'a, E> {
    info: &'a DimensionInfo,
    state: &'a LayoutState,
    children: &'a [GridChild<E>],
    min_cell_size: i32,
    same_size: bool,
}

impl<E: LayoutElement> AxisPass<'_, E> {
    /// Insets, margin and gaps along this axis.
    fn overhead(&self, insets: Insets, margin: Insets) -> i32 {
        let edges = match self.info.axis() {
            Axis::Horizontal => insets.horizontal().saturating_add(margin.horizontal()),
            Axis::Vertical => insets.vertical().saturating_add(margin.vertical()),
        };
        edges.saturating_add(self.info.total_gap())
    }

    /// Where the first cell starts.
    const fn leading_edge(&self, insets: Insets, margin: Insets) -> i32 {
        match self.info.axis() {
            Axis::Horizontal => insets.left.saturating_add(margin.left),
            Axis::Vertical => insets.top.saturating_add(margin.top),
        }
    }

    /// Extent an element asks for in minimum or preferred mode.
    fn target_extent(&self, i: usize, minimum_mode: bool) -> i32 {
        let minimum = self.info.minimum_extent(i, self.state, self.children);
        if minimum_mode && self.info.size_policy(i).contains(SizePolicy::CAN_SHRINK) {
            return minimum;
        }
        let preferred = self.info.preferred_extent(i, self.state, self.children);
        minimum.max(preferred)
    }

    /// Per-cell sizes in minimum or preferred mode.
    fn min_or_pref_sizes(&self, minimum_mode: bool) -> Vec<i32> {
        let mut sizes = vec![self.min_cell_size; self.info.cell_count()];

        for i in 0..self.info.component_count() {
            if self.info.span(i) != 1 {
                continue;
            }
            let cell = self.info.cell(i);
            let size = (self.target_extent(i, minimum_mode) - self.info.count_gap(cell, 1)).max(0);
            sizes[cell] = sizes[cell].max(size);
        }

        for i in 0..self.info.component_count() {
            let span = self.info.span(i);
            if span == 1 {
                continue;
            }
            let cell = self.info.cell(i);
            let size =
                (self.target_extent(i, minimum_mode) - self.info.count_gap(cell, span)).max(0);
            let current = saturating_sum(&sizes[cell..cell + span]);
            if current >= size {
                continue;
            }

            let allowed: Vec<bool> = (0..sizes.len())
                .map(|c| cell <= c && c < cell + span)
                .collect();
            let selected = self.cells_with_higher_priorities(&allowed, None);
            distribute(&selected, self.info.stretches(), size - current, &mut sizes);
        }

        sizes
    }

    /// Total extent in minimum or preferred mode, overhead excluded.
    fn content_extent(&self, minimum_mode: bool) -> i32 {
        let sizes = self.min_or_pref_sizes(minimum_mode);
        if self.same_size {
            let largest = sizes.iter().copied().max().unwrap_or(0);
            largest.saturating_mul(sizes.len() as i32)
        } else {
            saturating_sum(&sizes)
        }
    }

    /// Subset of `allowed` that should receive extra space first.
    ///
    /// `growth` carries the current and preferred sizes while growing from
    /// minimum sizes; it enables the below-preferred tier.
    fn cells_with_higher_priorities(
        &self,
        allowed: &[bool],
        growth: Option<(&[i32], &[i32])>,
    ) -> Vec<bool> {
        let below_preferred = |cell: usize| {
            growth.is_some_and(|(current, preferred)| preferred[cell] > current[cell])
        };
        let want_grow = |cell: usize| {
            self.info
                .cell_size_policy(cell)
                .contains(SizePolicy::WANT_GROW)
        };
        let can_grow = |cell: usize| {
            self.info
                .cell_size_policy(cell)
                .contains(SizePolicy::CAN_GROW)
        };
        let occupied = |cell: usize| !self.info.is_cell_empty(cell);

        let tiers: [&dyn Fn(usize) -> bool; 4] =
            [&below_preferred, &want_grow, &can_grow, &occupied];
        first_matching_tier(allowed, &tiers)
    }

    /// Grow `sizes` until they sum to `target`.
    fn grow(&self, sizes: &mut [i32], target: i32, preferred: Option<&[i32]>) {
        let delta = target - saturating_sum(sizes);
        if delta <= 0 {
            return;
        }
        let allowed = vec![true; sizes.len()];
        let selected =
            self.cells_with_higher_priorities(&allowed, preferred.map(|p| (&*sizes, p)));
        distribute(&selected, self.info.stretches(), delta, sizes);
    }

    /// Final cell sizes for `content` pixels of usable extent.
    fn cell_sizes(&self, content: i32) -> Vec<i32> {
        if self.same_size {
            return same_sizes(self.info.cell_count(), content.max(0));
        }

        let preferred = self.min_or_pref_sizes(false);
        if content < saturating_sum(&preferred) {
            let mut sizes = self.min_or_pref_sizes(true);
            self.grow(&mut sizes, content, Some(&preferred));
            sizes
        } else {
            let mut sizes = preferred;
            self.grow(&mut sizes, content, None);
            sizes
        }
    }

    /// Prefix sums of cell sizes and gaps, starting at `start`.
    fn origins(&self, sizes: &[i32], start: i32) -> Vec<i32> {
        let mut origins = Vec::with_capacity(sizes.len());
        let mut position = start;
        for (cell, size) in sizes.iter().enumerate() {
            origins.push(position);
            position = position.saturating_add(*size);
            if self.info.gap_after(cell) {
                position = position.saturating_add(self.info.gap());
            }
        }
        origins
    }

    /// Origin and extent of the cell rectangle of element `i`.
    fn cell_span(&self, i: usize, origins: &[i32], sizes: &[i32]) -> (i32, i32) {
        let start = self.info.cell(i);
        let end = start + self.info.span(i) - 1;
        let far_edge = origins[end].saturating_add(sizes[end]);
        (origins[start], far_edge - origins[start])
    }
}

/// Sum of cell sizes, pinned at `i32::MAX`.
fn saturating_sum(sizes: &[i32]) -> i32 {
    sizes.iter().fold(0, |total, &size| total.saturating_add(size))
}

/// Split `extent` evenly over `count` cells, remainder to the first cells.
fn same_sizes(count: usize, extent: i32) -> Vec<i32> {
    if count == 0 {
        return Vec::new();
    }
    let count_i32 = count as i32;
    let average = extent / count_i32;
    let rest = (extent % count_i32) as usize;
    (0..count)
        .map(|cell| average + i32::from(cell < rest))
        .collect()
}

/// Offset of an element inside its cell along one axis.
fn anchor_offset(axis: Axis, anchor: Anchor, cell_extent: i32, extent: i32) -> i32 {
    if anchor.contains(axis.far_anchor()) {
        cell_extent - extent
    } else if anchor.contains(axis.near_anchor()) {
        0
    } else {
        (cell_extent - extent) / 2
    }
}

fn hit(origins: &[i32], extents: &[i32], coordinate: i32) -> Option<usize> {
    origins
        .iter()
        .zip(extents)
        .position(|(&origin, &extent)| origin <= coordinate && coordinate <= origin + extent)
}

fn grid_lines(origins: &[i32], extents: &[i32]) -> Vec<i32> {
    let (Some(&first), Some(&last_origin), Some(&last_extent)) =
        (origins.first(), origins.last(), extents.last())
    else {
        return Vec::new();
    };

    let mut lines = Vec::with_capacity(origins.len() + 1);
    lines.push(first);
    for i in 0..origins.len() - 1 {
        lines.push((origins[i] + extents[i] + origins[i + 1]) / 2);
    }
    lines.push(last_origin + last_extent);
    lines
}

/// Constraint-based grid layout manager.
///
/// # Example
///
/// ```
/// use trellis_core::{FixedElement, Insets, LayoutElement, Rect, Size};
/// use trellis_layout::{Fill, GridConstraints, GridLayoutManager};
///
/// let mut grid = GridLayoutManager::new(1, 1).unwrap();
/// let index = grid
///     .add(
///         FixedElement::sized(20, 10),
///         GridConstraints::at(0, 0).with_fill(Fill::Both),
///     )
///     .unwrap();
///
/// grid.layout(Size::new(200, 100), Insets::ZERO);
/// assert_eq!(grid.element(index).unwrap().bounds(), Rect::new(0, 0, 200, 100));
/// ```
#[derive(Debug)]
pub struct GridLayoutManager<E> {
    row_count: usize,
    column_count: usize,
    options: GridOptions,
    children: Vec<GridChild<E>>,
    cache: Option<LayoutCache>,
    coordinates: Coordinates,
}

impl<E: LayoutElement> GridLayoutManager<E> {
    /// Create an empty grid with default options.
    pub fn new(row_count: usize, column_count: usize) -> Result<Self, LayoutError> {
        Self::with_options(row_count, column_count, GridOptions::default())
    }

    /// Create an empty grid.
    pub fn with_options(
        row_count: usize,
        column_count: usize,
        options: GridOptions,
    ) -> Result<Self, LayoutError> {
        if row_count == 0 || column_count == 0 {
            return Err(LayoutError::InvalidGridSize {
                rows: row_count,
                columns: column_count,
            });
        }
        options.validate()?;
        Ok(Self {
            row_count,
            column_count,
            options,
            children: Vec::new(),
            cache: None,
            coordinates: Coordinates::default(),
        })
    }

    // =========================================================================
    // Topology
    // =========================================================================

    /// Number of rows.
    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    pub const fn column_count(&self) -> usize {
        self.column_count
    }

    /// Current options.
    pub const fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Replace the options.
    pub fn set_options(&mut self, options: GridOptions) -> Result<(), LayoutError> {
        options.validate()?;
        self.options = options;
        self.invalidate_layout();
        Ok(())
    }

    /// Change the grid dimensions.
    ///
    /// Fails without change if an attached element would fall outside.
    pub fn resize(&mut self, row_count: usize, column_count: usize) -> Result<(), LayoutError> {
        if row_count == 0 || column_count == 0 {
            return Err(LayoutError::InvalidGridSize {
                rows: row_count,
                columns: column_count,
            });
        }
        if let Some(index) = self
            .children
            .iter()
            .position(|child| child.constraints.validate_for_grid(row_count, column_count).is_err())
        {
            return Err(LayoutError::ElementOutsideGrid {
                index,
                rows: row_count,
                columns: column_count,
            });
        }
        self.row_count = row_count;
        self.column_count = column_count;
        self.invalidate_layout();
        Ok(())
    }

    /// Attach an element. Returns its index.
    pub fn add(&mut self, element: E, constraints: GridConstraints) -> Result<usize, LayoutError> {
        constraints.validate_for_grid(self.row_count, self.column_count)?;
        self.children.push(GridChild {
            element,
            constraints,
        });
        self.invalidate_layout();
        Ok(self.children.len() - 1)
    }

    /// Detach the element at `index`. Later indices shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<GridChild<E>, LayoutError> {
        if index >= self.children.len() {
            return Err(LayoutError::ElementNotFound(index));
        }
        let child = self.children.remove(index);
        self.invalidate_layout();
        Ok(child)
    }

    /// Replace the constraints of the element at `index`.
    pub fn set_constraints(
        &mut self,
        index: usize,
        constraints: GridConstraints,
    ) -> Result<(), LayoutError> {
        constraints.validate_for_grid(self.row_count, self.column_count)?;
        let child = self
            .children
            .get_mut(index)
            .ok_or(LayoutError::ElementNotFound(index))?;
        child.constraints = constraints;
        self.invalidate_layout();
        Ok(())
    }

    /// Attached children in insertion order.
    pub fn children(&self) -> &[GridChild<E>] {
        &self.children
    }

    /// Number of attached elements.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if no element is attached.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Element at `index`.
    pub fn element(&self, index: usize) -> Option<&E> {
        self.children.get(index).map(|child| &child.element)
    }

    /// Mutable element at `index`.
    ///
    /// Invalidates the layout, since intrinsic sizes may change.
    pub fn element_mut(&mut self, index: usize) -> Option<&mut E> {
        self.invalidate_layout();
        self.children.get_mut(index).map(|child| &mut child.element)
    }

    /// Constraints of the element at `index`.
    pub fn constraints(&self, index: usize) -> Option<&GridConstraints> {
        self.children.get(index).map(|child| &child.constraints)
    }

    /// Drop the layout snapshot. The next measuring call rebuilds it.
    pub fn invalidate_layout(&mut self) {
        if self.cache.take().is_some() {
            trace!("layout snapshot invalidated");
        }
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Smallest size that fits every element at its minimum.
    pub fn minimum_size(&mut self, insets: Insets) -> Size {
        self.measure(insets, true)
    }

    /// Size that fits every element at its preferred size.
    pub fn preferred_size(&mut self, insets: Insets) -> Size {
        self.measure(insets, false)
    }

    /// The grid never limits its own growth.
    pub const fn maximum_size(&self) -> Size {
        Size::UNBOUNDED
    }

    fn measure(&mut self, insets: Insets, minimum_mode: bool) -> Size {
        let options = &self.options;
        let cache = LayoutCache::ensure(
            &mut self.cache,
            &self.children,
            self.row_count,
            self.column_count,
            options,
        );
        let horizontal = cache.pass(Axis::Horizontal, &self.children, options);
        let vertical = cache.pass(Axis::Vertical, &self.children, options);

        Size::new(
            horizontal
                .content_extent(minimum_mode)
                .saturating_add(horizontal.overhead(insets, options.margin)),
            vertical
                .content_extent(minimum_mode)
                .saturating_add(vertical.overhead(insets, options.margin)),
        )
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Size the cells for `size` and assign bounds to every element.
    pub fn layout(&mut self, size: Size, insets: Insets) {
        let options = &self.options;
        let cache = LayoutCache::ensure(
            &mut self.cache,
            &self.children,
            self.row_count,
            self.column_count,
            options,
        );
        let horizontal = cache.pass(Axis::Horizontal, &self.children, options);
        let vertical = cache.pass(Axis::Vertical, &self.children, options);

        let widths = horizontal
            .cell_sizes(size.width.saturating_sub(horizontal.overhead(insets, options.margin)));
        let heights = vertical
            .cell_sizes(size.height.saturating_sub(vertical.overhead(insets, options.margin)));
        let coordinates = Coordinates {
            xs: horizontal.origins(&widths, horizontal.leading_edge(insets, options.margin)),
            ys: vertical.origins(&heights, vertical.leading_edge(insets, options.margin)),
            widths,
            heights,
        };

        let placements: Vec<(usize, Rect)> = (0..cache.state.count())
            .map(|i| {
                let bounds = place(i, &horizontal, &vertical, &coordinates);
                (cache.state.child_index(i), bounds)
            })
            .collect();

        debug!(
            width = size.width,
            height = size.height,
            elements = placements.len(),
            "laid out grid"
        );

        for (index, bounds) in placements {
            trace!(index, ?bounds, "placed element");
            self.children[index].element.set_bounds(bounds);
        }
        self.coordinates = coordinates;
    }

    /// Cell coordinates of the last layout pass.
    pub const fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// Row containing `y`, boundaries inclusive.
    ///
    /// A coordinate on a shared boundary belongs to the upper row.
    pub fn row_at(&self, y: i32) -> Option<usize> {
        hit(&self.coordinates.ys, &self.coordinates.heights, y)
    }

    /// Column containing `x`, boundaries inclusive.
    ///
    /// A coordinate on a shared boundary belongs to the left column.
    pub fn column_at(&self, x: i32) -> Option<usize> {
        hit(&self.coordinates.xs, &self.coordinates.widths, x)
    }

    /// Y positions of the lines separating rows, outer edges included.
    pub fn horizontal_grid_lines(&self) -> Vec<i32> {
        grid_lines(&self.coordinates.ys, &self.coordinates.heights)
    }

    /// X positions of the lines separating columns, outer edges included.
    pub fn vertical_grid_lines(&self) -> Vec<i32> {
        grid_lines(&self.coordinates.xs, &self.coordinates.widths)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Aggregated size policy of every cell along `axis`.
    pub fn cell_size_policies(&mut self, axis: Axis) -> Vec<SizePolicy> {
        let cache = LayoutCache::ensure(
            &mut self.cache,
            &self.children,
            self.row_count,
            self.column_count,
            &self.options,
        );
        cache.info(axis).cell_size_policies().to_vec()
    }

    /// Measurement cache counters of the current snapshot, if one exists.
    pub fn measurement_stats(&self) -> Option<MeasureStats> {
        self.cache.as_ref().map(|cache| cache.state.stats())
    }
}

/// Bounds of pass element `i` inside its cell rectangle.
fn place<E: LayoutElement>(
    i: usize,
    horizontal: &AxisPass<'_, E>,
    vertical: &AxisPass<'_, E>,
    coordinates: &Coordinates,
) -> Rect {
    let state = horizontal.state;
    let children = horizontal.children;
    let constraints = state.constraints(i);
    let element = state.element(i, children);

    let (x, cell_width) = horizontal.cell_span(i, &coordinates.xs, &coordinates.widths);
    let (y, cell_height) = vertical.cell_span(i, &coordinates.ys, &coordinates.heights);

    let preferred = state.measured_preferred(i, children);
    let mut size = Size::new(cell_width, cell_height);
    if !Axis::Horizontal.fills(constraints.fill()) {
        size.width = size.width.min(preferred.width);
    }
    if !Axis::Vertical.fills(constraints.fill()) {
        size.height = size.height.min(preferred.height);
    }
    let size = clamp_to_element(element, constraints, size);

    let anchor = constraints.anchor();
    let dx = anchor_offset(Axis::Horizontal, anchor, cell_width, size.width);
    let dy = anchor_offset(Axis::Vertical, anchor, cell_height, size.height);

    let indent = indent_width(constraints);
    Rect::new(
        x.saturating_add(dx).saturating_add(indent),
        y.saturating_add(dy),
        (size.width - indent).max(0),
        size.height,
    )
}
