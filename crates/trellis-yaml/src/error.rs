//! Error types for grid documents.

use thiserror::Error;
use trellis_layout::LayoutError;

/// Error raised while reading or building a grid document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Malformed YAML or a field of the wrong shape.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Grid dimensions or options were rejected.
    #[error("invalid grid: {0}")]
    Grid(#[from] LayoutError),

    /// An element's constraints were rejected.
    #[error("element '{id}': {source}")]
    Element {
        /// Id of the offending element
        id: String,
        /// What the layout engine rejected
        #[source]
        source: LayoutError,
    },

    /// Two elements share an id.
    #[error("duplicate element id: {0}")]
    DuplicateId(String),

    /// An element has an empty id.
    #[error("element {0} has an empty id")]
    EmptyId(usize),

    /// Intrinsic sizes must be non-negative.
    #[error("element '{id}': {field} must be non-negative, got [{width}, {height}]")]
    NegativeSize {
        /// Id of the offending element
        id: String,
        /// `minimum`, `preferred` or `maximum`
        field: &'static str,
        /// Width component
        width: i32,
        /// Height component
        height: i32,
    },
}
