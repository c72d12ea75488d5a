#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::similar_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
//! Constraint-based grid layout engine for Trellis.
//!
//! Elements are attached to a [`GridLayoutManager`] at a row and column,
//! optionally spanning several cells, with [`GridConstraints`] describing
//! how they size and align:
//!
//! - **Size policies**: [`SizePolicy`] bits decide which cells shrink first
//!   and which grow first when the container differs from the preferred size
//! - **Fill and anchor**: [`Fill`] stretches an element to its cell, [`Anchor`]
//!   pins an under-sized element to an edge or corner
//! - **Spans and elimination**: cells no span starts and ends at are
//!   compacted away before policies are aggregated, see [`eliminate`]
//! - **Gaps**: inserted only between adjacent occupied cells; fillers and
//!   empty cells collapse them
//!
//! Each measuring call works on a snapshot of the visible children that
//! measures every element at most once and lives until the next
//! [`GridLayoutManager::invalidate_layout`].

mod cache;
mod constraints;
mod dimension;
mod distribute;
mod eliminate;
mod error;
mod manager;
mod measure;
mod state;

pub use cache::MeasureStats;
pub use constraints::{Anchor, Fill, GridConstraints, SizeOverride, SizePolicy};
pub use dimension::Axis;
pub use distribute::distribute;
pub use eliminate::eliminate;
pub use error::LayoutError;
pub use manager::{
    Coordinates, GridChild, GridLayoutManager, GridOptions, DEFAULT_MIN_CELL_SIZE,
};
pub use measure::{
    clamp_to_element, effective_maximum_size, effective_minimum_size, effective_preferred_size,
    DEFAULT_INDENT,
};
