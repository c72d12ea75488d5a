//! Error types for grid configuration.

use thiserror::Error;

/// Rejected grid or constraint configuration.
///
/// Every variant is raised when a value is attached or assigned, never during
/// measurement or layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Grid must have at least one row and one column.
    #[error("invalid grid dimensions: {rows} rows x {columns} columns")]
    InvalidGridSize {
        /// Requested row count
        rows: usize,
        /// Requested column count
        columns: usize,
    },

    /// Row index outside the grid.
    #[error("wrong row: {row}; row count={row_count}")]
    RowOutOfRange {
        /// Offending row
        row: usize,
        /// Grid row count
        row_count: usize,
    },

    /// Row span runs past the last row.
    #[error("wrong row span: {row_span}; row={row} row count={row_count}")]
    RowSpanOutOfRange {
        /// Start row
        row: usize,
        /// Offending span
        row_span: usize,
        /// Grid row count
        row_count: usize,
    },

    /// Column index outside the grid.
    #[error("wrong column: {column}; column count={column_count}")]
    ColumnOutOfRange {
        /// Offending column
        column: usize,
        /// Grid column count
        column_count: usize,
    },

    /// Column span runs past the last column.
    #[error("wrong column span: {col_span}; column={column} column count={column_count}")]
    ColumnSpanOutOfRange {
        /// Start column
        column: usize,
        /// Offending span
        col_span: usize,
        /// Grid column count
        column_count: usize,
    },

    /// Spans must be at least one cell.
    #[error("{field} must be positive")]
    ZeroSpan {
        /// `row_span` or `col_span`
        field: &'static str,
    },

    /// Size policy bits outside `CAN_SHRINK | CAN_GROW | WANT_GROW`.
    #[error("invalid size policy: {0}")]
    InvalidSizePolicy(u32),

    /// Anchor bits outside `NORTH | SOUTH | EAST | WEST`.
    #[error("invalid anchor: {0}")]
    InvalidAnchor(u32),

    /// Fill value other than none, horizontal, vertical or both.
    #[error("invalid fill: {0}")]
    InvalidFill(u32),

    /// An explicit size override component was negative.
    #[error("{field} {axis} must be non-negative, got {value}")]
    NegativeSize {
        /// `minimum_size`, `preferred_size` or `maximum_size`
        field: &'static str,
        /// `width` or `height`
        axis: &'static str,
        /// Offending value
        value: i32,
    },

    /// Gaps must be non-negative.
    #[error("{axis} gap must be non-negative, got {value}")]
    NegativeGap {
        /// `horizontal` or `vertical`
        axis: &'static str,
        /// Offending value
        value: i32,
    },

    /// Margins must be non-negative.
    #[error("margin must be non-negative")]
    NegativeMargin,

    /// Shrinking the grid would orphan an attached element.
    #[error("cannot resize grid to {rows}x{columns}: element {index} lies outside")]
    ElementOutsideGrid {
        /// Index of the first offending element
        index: usize,
        /// Requested row count
        rows: usize,
        /// Requested column count
        columns: usize,
    },

    /// No child at this index.
    #[error("no element at index {0}")]
    ElementNotFound(usize),
}
