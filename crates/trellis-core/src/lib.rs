//! Core types and traits for the Trellis grid layout engine.
//!
//! This crate provides the foundation the layout engine is built on:
//! - Integer pixel geometry: [`Point`], [`Size`], [`Rect`], [`Insets`]
//! - The host element abstraction: [`LayoutElement`]
//! - Ready-made elements: [`Filler`] (the gap-collapsing filler marker) and
//!   [`FixedElement`] (fixed intrinsic sizes)

mod element;
mod geometry;

pub use element::{Filler, FixedElement, LayoutElement};
pub use geometry::{Insets, Point, Rect, Size};
