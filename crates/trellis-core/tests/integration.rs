//! Integration tests for trellis-core.
//!
//! These tests verify the public API works correctly end-to-end.

use proptest::prelude::*;
use trellis_core::{Filler, FixedElement, Insets, LayoutElement, Rect, Size};

/// A host element that records every bounds assignment.
#[derive(Default)]
struct Recorder {
    history: Vec<Rect>,
}

impl LayoutElement for Recorder {
    fn minimum_size(&self) -> Size {
        Size::new(10, 10)
    }

    fn preferred_size(&self) -> Size {
        Size::new(30, 12)
    }

    fn bounds(&self) -> Rect {
        self.history.last().copied().unwrap_or_default()
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.history.push(bounds);
    }
}

// =============================================================================
// Element Integration Tests
// =============================================================================

#[test]
fn test_custom_element_defaults() {
    let mut recorder = Recorder::default();
    assert_eq!(recorder.maximum_size(), Size::UNBOUNDED);
    assert!(recorder.is_visible());
    assert!(!recorder.is_filler());
    assert_eq!(recorder.bounds(), Rect::default());

    recorder.set_bounds(Rect::new(1, 2, 3, 4));
    recorder.set_bounds(Rect::new(5, 6, 7, 8));
    assert_eq!(recorder.history.len(), 2);
    assert_eq!(recorder.bounds(), Rect::new(5, 6, 7, 8));
}

#[test]
fn test_heterogeneous_elements_behind_trait_objects() {
    let mut elements: Vec<Box<dyn LayoutElement>> = vec![
        Box::new(Recorder::default()),
        Box::new(Filler::new()),
        Box::new(FixedElement::sized(4, 4).with_visible(false)),
    ];

    let preferred: Vec<Size> = elements.iter().map(|e| e.preferred_size()).collect();
    assert_eq!(preferred, vec![Size::new(30, 12), Size::ZERO, Size::new(4, 4)]);
    assert!(elements[1].is_filler());
    assert!(!elements[2].is_visible());

    for (index, element) in elements.iter_mut().enumerate() {
        element.set_bounds(Rect::new(index as i32 * 10, 0, 10, 10));
    }
    assert_eq!(elements[2].bounds(), Rect::new(20, 0, 10, 10));
}

// =============================================================================
// Serialization Integration Tests
// =============================================================================

#[test]
fn test_insets_sides_default_to_zero() {
    let insets: Insets = serde_json::from_str(r#"{"left": 4}"#).unwrap();
    assert_eq!(insets, Insets::new(0, 4, 0, 0));
}

#[test]
fn test_fixed_element_skips_bounds() {
    let mut element = FixedElement::sized(20, 10);
    element.set_bounds(Rect::new(1, 1, 20, 10));

    let json = serde_json::to_string(&element).unwrap();
    assert!(!json.contains("bounds"));
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn prop_rect_contains_its_origin_unless_empty(
        x in -100i32..100,
        y in -100i32..100,
        width in 0i32..50,
        height in 0i32..50,
    ) {
        let rect = Rect::new(x, y, width, height);
        prop_assert_eq!(rect.contains(x, y), width > 0 && height > 0);
        prop_assert!(!rect.contains(rect.right(), y));
        prop_assert!(!rect.contains(x, rect.bottom()));
    }

    #[test]
    fn prop_insets_expand_size(
        top in 0i32..20,
        left in 0i32..20,
        bottom in 0i32..20,
        right in 0i32..20,
    ) {
        let insets = Insets::new(top, left, bottom, right);
        let size = Size::new(10, 10).expand(insets.horizontal(), insets.vertical());
        prop_assert_eq!(size, Size::new(10 + left + right, 10 + top + bottom));
    }
}
