//! Host element abstraction consumed by the layout engine.

use crate::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};

/// A visual element that can be placed by a layout manager.
///
/// The layout engine never inspects an element beyond this trait:
///
/// 1. `minimum_size` / `preferred_size`: intrinsic measurement
/// 2. `maximum_size`: upper clamp applied at placement
/// 3. `set_bounds`: receives the final rectangle of a layout pass
pub trait LayoutElement {
    /// Smallest size the element can render at.
    fn minimum_size(&self) -> Size;

    /// Size the element would like to have.
    fn preferred_size(&self) -> Size;

    /// Largest useful size.
    fn maximum_size(&self) -> Size {
        Size::UNBOUNDED
    }

    /// Invisible elements may be skipped by a layout pass.
    fn is_visible(&self) -> bool {
        true
    }

    /// Filler elements are decorative spacing. They never count as cell content,
    /// so gaps collapse around cells holding only fillers.
    fn is_filler(&self) -> bool {
        false
    }

    /// Current bounds, as last assigned by a layout pass.
    fn bounds(&self) -> Rect;

    /// Assign new bounds.
    fn set_bounds(&mut self, bounds: Rect);
}

impl<T: LayoutElement + ?Sized> LayoutElement for Box<T> {
    fn minimum_size(&self) -> Size {
        (**self).minimum_size()
    }

    fn preferred_size(&self) -> Size {
        (**self).preferred_size()
    }

    fn maximum_size(&self) -> Size {
        (**self).maximum_size()
    }

    fn is_visible(&self) -> bool {
        (**self).is_visible()
    }

    fn is_filler(&self) -> bool {
        (**self).is_filler()
    }

    fn bounds(&self) -> Rect {
        (**self).bounds()
    }

    fn set_bounds(&mut self, bounds: Rect) {
        (**self).set_bounds(bounds);
    }
}

/// Zero-sized filler marker.
///
/// Its minimum and preferred sizes come from the constraints it is attached with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filler {
    bounds: Rect,
}

impl Filler {
    /// Create a new filler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bounds: Rect::new(0, 0, 0, 0),
        }
    }
}

impl LayoutElement for Filler {
    fn minimum_size(&self) -> Size {
        Size::ZERO
    }

    fn preferred_size(&self) -> Size {
        Size::ZERO
    }

    fn is_filler(&self) -> bool {
        true
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }
}

/// Element with fixed intrinsic sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedElement {
    /// Intrinsic minimum size
    pub minimum: Size,
    /// Intrinsic preferred size
    pub preferred: Size,
    /// Intrinsic maximum size
    pub maximum: Size,
    /// Visibility flag
    pub visible: bool,
    /// Whether this element is a filler
    pub filler: bool,
    /// Last assigned bounds
    #[serde(skip)]
    pub bounds: Rect,
}

impl Default for FixedElement {
    fn default() -> Self {
        Self {
            minimum: Size::ZERO,
            preferred: Size::ZERO,
            maximum: Size::UNBOUNDED,
            visible: true,
            filler: false,
            bounds: Rect::default(),
        }
    }
}

impl FixedElement {
    /// Create an element with the given minimum and preferred size.
    #[must_use]
    pub fn new(minimum: Size, preferred: Size) -> Self {
        Self {
            minimum,
            preferred,
            ..Self::default()
        }
    }

    /// Create an element whose minimum equals its preferred size.
    #[must_use]
    pub fn sized(width: i32, height: i32) -> Self {
        Self::new(Size::new(width, height), Size::new(width, height))
    }

    /// Set the maximum size.
    #[must_use]
    pub const fn with_maximum(mut self, maximum: Size) -> Self {
        self.maximum = maximum;
        self
    }

    /// Set visibility.
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Mark as filler.
    #[must_use]
    pub const fn with_filler(mut self, filler: bool) -> Self {
        self.filler = filler;
        self
    }
}

impl LayoutElement for FixedElement {
    fn minimum_size(&self) -> Size {
        self.minimum
    }

    fn preferred_size(&self) -> Size {
        self.preferred
    }

    fn maximum_size(&self) -> Size {
        self.maximum
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_filler(&self) -> bool {
        self.filler
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }
}
