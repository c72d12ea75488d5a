//! Effective element sizes: constraint overrides layered over intrinsic sizes.

use crate::constraints::GridConstraints;
use trellis_core::{LayoutElement, Size};

/// Width in pixels of one indent level.
pub const DEFAULT_INDENT: i32 = 10;

pub(crate) fn indent_width(constraints: &GridConstraints) -> i32 {
    let levels = i32::try_from(constraints.indent()).unwrap_or(i32::MAX);
    DEFAULT_INDENT.saturating_mul(levels)
}

/// Minimum size of an element under its constraints.
///
/// With `add_indent` the width includes the element's indent.
pub fn effective_minimum_size<E: LayoutElement + ?Sized>(
    element: &E,
    constraints: &GridConstraints,
    add_indent: bool,
) -> Size {
    let size = constraints.minimum_size().resolve(element.minimum_size());
    if add_indent {
        size.expand(indent_width(constraints), 0)
    } else {
        size
    }
}

/// Preferred size of an element under its constraints.
///
/// With `add_indent` the width includes the element's indent.
pub fn effective_preferred_size<E: LayoutElement + ?Sized>(
    element: &E,
    constraints: &GridConstraints,
    add_indent: bool,
) -> Size {
    let size = constraints
        .preferred_size()
        .resolve(element.preferred_size());
    if add_indent {
        size.expand(indent_width(constraints), 0)
    } else {
        size
    }
}

/// Maximum size of an element under its constraints.
pub fn effective_maximum_size<E: LayoutElement + ?Sized>(
    element: &E,
    constraints: &GridConstraints,
) -> Size {
    constraints.maximum_size().resolve(element.maximum_size())
}

/// Clamp a rendered size to the element's effective minimum and maximum.
///
/// The maximum wins when the two conflict.
pub fn clamp_to_element<E: LayoutElement + ?Sized>(
    element: &E,
    constraints: &GridConstraints,
    size: Size,
) -> Size {
    let minimum = effective_minimum_size(element, constraints, false);
    let maximum = effective_maximum_size(element, constraints);
    size.max(minimum).min(maximum).max(Size::ZERO)
}
