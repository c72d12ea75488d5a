//! YAML grid documents for Trellis.
//!
//! A [`GridDocument`] describes a grid, its options and its elements with
//! fixed intrinsic sizes. [`GridDocument::build`] validates the document and
//! turns it into a ready-to-measure [`DocumentGrid`].

mod document;
mod error;

pub use document::{DocumentGrid, ElementSpec, GridDocument, Placement};
pub use error::DocumentError;
