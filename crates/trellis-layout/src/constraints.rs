//! Per-element placement and sizing directives.
//!
//! A [`GridConstraints`] record tells the grid where an element sits (row,
//! column, spans), how its cells may grow or shrink ([`SizePolicy`]), how the
//! element fills its cell rectangle ([`Fill`]) and where it sits when it does
//! not fill it ([`Anchor`]).

use crate::error::LayoutError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use trellis_core::Size;

bitflags! {
    /// Growth and shrink permissions of an element along one axis.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SizePolicy: u32 {
        /// The element may be made smaller than its preferred size.
        const CAN_SHRINK = 1;
        /// The element may be made larger than its preferred size.
        const CAN_GROW = 2;
        /// The element should receive extra space before `CAN_GROW` elements.
        const WANT_GROW = 4;
    }
}

impl SizePolicy {
    /// Fixed size: never shrinks nor grows.
    pub const FIXED: Self = Self::empty();

    /// Parse raw bits, rejecting anything outside the three known flags.
    pub const fn try_from_bits(bits: u32) -> Result<Self, LayoutError> {
        match Self::from_bits(bits) {
            Some(policy) => Ok(policy),
            None => Err(LayoutError::InvalidSizePolicy(bits)),
        }
    }
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self::CAN_SHRINK | Self::CAN_GROW
    }
}

bitflags! {
    /// Placement of an under-sized element inside its cell rectangle.
    ///
    /// The empty set is [`Anchor::CENTER`]; corners combine one vertical and one
    /// horizontal edge.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Anchor: u32 {
        /// Top edge
        const NORTH = 1;
        /// Bottom edge
        const SOUTH = 2;
        /// Right edge
        const EAST = 4;
        /// Left edge
        const WEST = 8;
        /// Top-right corner
        const NORTH_EAST = Self::NORTH.bits() | Self::EAST.bits();
        /// Bottom-right corner
        const SOUTH_EAST = Self::SOUTH.bits() | Self::EAST.bits();
        /// Bottom-left corner
        const SOUTH_WEST = Self::SOUTH.bits() | Self::WEST.bits();
        /// Top-left corner
        const NORTH_WEST = Self::NORTH.bits() | Self::WEST.bits();
    }
}

impl Anchor {
    /// Centered on both axes.
    pub const CENTER: Self = Self::empty();

    /// Parse raw bits, rejecting anything above `NORTH | SOUTH | EAST | WEST`.
    pub const fn try_from_bits(bits: u32) -> Result<Self, LayoutError> {
        match Self::from_bits(bits) {
            Some(anchor) => Ok(anchor),
            None => Err(LayoutError::InvalidAnchor(bits)),
        }
    }
}

/// Axis-wise instruction to stretch an element over its cell rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fill {
    /// Keep the element at most at its preferred size on both axes
    #[default]
    None,
    /// Stretch horizontally
    Horizontal,
    /// Stretch vertically
    Vertical,
    /// Stretch on both axes
    Both,
}

impl Fill {
    /// Parse a raw fill value (0 = none, 1 = horizontal, 2 = vertical, 3 = both).
    pub const fn try_from_bits(bits: u32) -> Result<Self, LayoutError> {
        match bits {
            0 => Ok(Self::None),
            1 => Ok(Self::Horizontal),
            2 => Ok(Self::Vertical),
            3 => Ok(Self::Both),
            _ => Err(LayoutError::InvalidFill(bits)),
        }
    }

    /// Raw fill value.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Horizontal => 1,
            Self::Vertical => 2,
            Self::Both => 3,
        }
    }

    /// Whether the horizontal fill bit is set.
    #[must_use]
    pub const fn horizontal(self) -> bool {
        self.bits() & 1 != 0
    }

    /// Whether the vertical fill bit is set.
    #[must_use]
    pub const fn vertical(self) -> bool {
        self.bits() & 2 != 0
    }
}

/// Optional per-component size override.
///
/// An unset component falls back to the element's own intrinsic measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeOverride {
    /// Width override
    #[serde(default)]
    pub width: Option<i32>,
    /// Height override
    #[serde(default)]
    pub height: Option<i32>,
}

impl SizeOverride {
    /// No override on either axis.
    pub const UNSET: Self = Self {
        width: None,
        height: None,
    };

    /// Override both components.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Override only the width.
    #[must_use]
    pub const fn width(width: i32) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    /// Override only the height.
    #[must_use]
    pub const fn height(height: i32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }

    /// Whether neither component is set.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// Apply the override on top of an intrinsic size.
    #[must_use]
    pub fn resolve(&self, own: Size) -> Size {
        Size::new(
            self.width.unwrap_or(own.width),
            self.height.unwrap_or(own.height),
        )
    }

    fn validate(&self, field: &'static str) -> Result<(), LayoutError> {
        if let Some(value) = self.width.filter(|w| *w < 0) {
            return Err(LayoutError::NegativeSize {
                field,
                axis: "width",
                value,
            });
        }
        if let Some(value) = self.height.filter(|h| *h < 0) {
            return Err(LayoutError::NegativeSize {
                field,
                axis: "height",
                value,
            });
        }
        Ok(())
    }
}

/// Placement and sizing directives of one grid element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConstraints {
    row: usize,
    column: usize,
    row_span: usize,
    col_span: usize,
    h_size_policy: SizePolicy,
    v_size_policy: SizePolicy,
    fill: Fill,
    anchor: Anchor,
    indent: u32,
    minimum_size: SizeOverride,
    preferred_size: SizeOverride,
    maximum_size: SizeOverride,
    use_parent_layout: bool,
}

impl Default for GridConstraints {
    fn default() -> Self {
        Self {
            row: 0,
            column: 0,
            row_span: 1,
            col_span: 1,
            h_size_policy: SizePolicy::default(),
            v_size_policy: SizePolicy::default(),
            fill: Fill::None,
            anchor: Anchor::CENTER,
            indent: 0,
            minimum_size: SizeOverride::UNSET,
            preferred_size: SizeOverride::UNSET,
            maximum_size: SizeOverride::UNSET,
            use_parent_layout: false,
        }
    }
}

impl GridConstraints {
    /// Single-cell constraints at the given position with default policies.
    #[must_use]
    pub fn at(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            ..Self::default()
        }
    }

    // =========================================================================
    // Builders (validated when attached to a grid)
    // =========================================================================

    /// Span multiple rows and columns.
    #[must_use]
    pub const fn with_span(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = row_span;
        self.col_span = col_span;
        self
    }

    /// Set both size policies.
    #[must_use]
    pub const fn with_policies(mut self, horizontal: SizePolicy, vertical: SizePolicy) -> Self {
        self.h_size_policy = horizontal;
        self.v_size_policy = vertical;
        self
    }

    /// Set the fill mode.
    #[must_use]
    pub const fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    /// Set the anchor.
    #[must_use]
    pub const fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the indent level.
    #[must_use]
    pub const fn with_indent(mut self, indent: u32) -> Self {
        self.indent = indent;
        self
    }

    /// Set all three size overrides.
    #[must_use]
    pub const fn with_sizes(
        mut self,
        minimum: SizeOverride,
        preferred: SizeOverride,
        maximum: SizeOverride,
    ) -> Self {
        self.minimum_size = minimum;
        self.preferred_size = preferred;
        self.maximum_size = maximum;
        self
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// First row.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// First column.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Number of rows covered.
    #[must_use]
    pub const fn row_span(&self) -> usize {
        self.row_span
    }

    /// Number of columns covered.
    #[must_use]
    pub const fn col_span(&self) -> usize {
        self.col_span
    }

    /// Horizontal size policy.
    #[must_use]
    pub const fn h_size_policy(&self) -> SizePolicy {
        self.h_size_policy
    }

    /// Vertical size policy.
    #[must_use]
    pub const fn v_size_policy(&self) -> SizePolicy {
        self.v_size_policy
    }

    /// Fill mode.
    #[must_use]
    pub const fn fill(&self) -> Fill {
        self.fill
    }

    /// Anchor.
    #[must_use]
    pub const fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Indent level, in units of [`crate::DEFAULT_INDENT`] pixels.
    #[must_use]
    pub const fn indent(&self) -> u32 {
        self.indent
    }

    /// Minimum size override.
    #[must_use]
    pub const fn minimum_size(&self) -> SizeOverride {
        self.minimum_size
    }

    /// Preferred size override.
    #[must_use]
    pub const fn preferred_size(&self) -> SizeOverride {
        self.preferred_size
    }

    /// Maximum size override.
    #[must_use]
    pub const fn maximum_size(&self) -> SizeOverride {
        self.maximum_size
    }

    /// Whether the element aligns with the enclosing grid's cells.
    #[must_use]
    pub const fn use_parent_layout(&self) -> bool {
        self.use_parent_layout
    }

    // =========================================================================
    // Validating setters
    // =========================================================================

    /// Set the first row.
    pub fn set_row(&mut self, row: usize) {
        self.row = row;
    }

    /// Set the first column.
    pub fn set_column(&mut self, column: usize) {
        self.column = column;
    }

    /// Set the row span. Rejects zero.
    pub fn set_row_span(&mut self, row_span: usize) -> Result<(), LayoutError> {
        if row_span == 0 {
            return Err(LayoutError::ZeroSpan { field: "row_span" });
        }
        self.row_span = row_span;
        Ok(())
    }

    /// Set the column span. Rejects zero.
    pub fn set_col_span(&mut self, col_span: usize) -> Result<(), LayoutError> {
        if col_span == 0 {
            return Err(LayoutError::ZeroSpan { field: "col_span" });
        }
        self.col_span = col_span;
        Ok(())
    }

    /// Set the horizontal size policy.
    pub fn set_h_size_policy(&mut self, policy: SizePolicy) {
        self.h_size_policy = policy;
    }

    /// Set the vertical size policy.
    pub fn set_v_size_policy(&mut self, policy: SizePolicy) {
        self.v_size_policy = policy;
    }

    /// Set the horizontal size policy from raw bits.
    pub fn set_h_size_policy_bits(&mut self, bits: u32) -> Result<(), LayoutError> {
        self.h_size_policy = SizePolicy::try_from_bits(bits)?;
        Ok(())
    }

    /// Set the vertical size policy from raw bits.
    pub fn set_v_size_policy_bits(&mut self, bits: u32) -> Result<(), LayoutError> {
        self.v_size_policy = SizePolicy::try_from_bits(bits)?;
        Ok(())
    }

    /// Set the fill mode.
    pub fn set_fill(&mut self, fill: Fill) {
        self.fill = fill;
    }

    /// Set the fill mode from a raw value.
    pub fn set_fill_bits(&mut self, bits: u32) -> Result<(), LayoutError> {
        self.fill = Fill::try_from_bits(bits)?;
        Ok(())
    }

    /// Set the anchor.
    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
    }

    /// Set the anchor from raw bits.
    pub fn set_anchor_bits(&mut self, bits: u32) -> Result<(), LayoutError> {
        self.anchor = Anchor::try_from_bits(bits)?;
        Ok(())
    }

    /// Set the indent level.
    pub fn set_indent(&mut self, indent: u32) {
        self.indent = indent;
    }

    /// Set the minimum size override.
    pub fn set_minimum_size(&mut self, size: SizeOverride) -> Result<(), LayoutError> {
        size.validate("minimum_size")?;
        self.minimum_size = size;
        Ok(())
    }

    /// Set the preferred size override.
    pub fn set_preferred_size(&mut self, size: SizeOverride) -> Result<(), LayoutError> {
        size.validate("preferred_size")?;
        self.preferred_size = size;
        Ok(())
    }

    /// Set the maximum size override.
    pub fn set_maximum_size(&mut self, size: SizeOverride) -> Result<(), LayoutError> {
        size.validate("maximum_size")?;
        self.maximum_size = size;
        Ok(())
    }

    /// Set whether the element aligns with the enclosing grid's cells.
    pub fn set_use_parent_layout(&mut self, use_parent_layout: bool) {
        self.use_parent_layout = use_parent_layout;
    }

    /// Check the grid-independent invariants.
    ///
    /// Records built through builders or deserialization skip the setters, so
    /// the grid runs this again when the record is attached.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.row_span == 0 {
            return Err(LayoutError::ZeroSpan { field: "row_span" });
        }
        if self.col_span == 0 {
            return Err(LayoutError::ZeroSpan { field: "col_span" });
        }
        self.minimum_size.validate("minimum_size")?;
        self.preferred_size.validate("preferred_size")?;
        self.maximum_size.validate("maximum_size")
    }

    /// Check that the record fits a grid of the given dimensions.
    pub fn validate_for_grid(
        &self,
        row_count: usize,
        column_count: usize,
    ) -> Result<(), LayoutError> {
        self.validate()?;
        if self.row >= row_count {
            return Err(LayoutError::RowOutOfRange {
                row: self.row,
                row_count,
            });
        }
        if self.row_span > row_count - self.row {
            return Err(LayoutError::RowSpanOutOfRange {
                row: self.row,
                row_span: self.row_span,
                row_count,
            });
        }
        if self.column >= column_count {
            return Err(LayoutError::ColumnOutOfRange {
                column: self.column,
                column_count,
            });
        }
        if self.col_span > column_count - self.column {
            return Err(LayoutError::ColumnSpanOutOfRange {
                column: self.column,
                col_span: self.col_span,
                column_count,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Snapshot / rollback
    // =========================================================================

    /// Take an independent copy for a later [`GridConstraints::restore`].
    #[must_use]
    pub fn store(&self) -> Self {
        self.clone()
    }

    /// Overwrite every field with a previously stored copy.
    pub fn restore(&mut self, saved: &Self) {
        self.clone_from(saved);
    }
}
