//! Cell elimination: compacts sparse cell indices into a dense local index.
//!
//! A cell survives only if some element starts there and some element ends
//! there. Every other cell is removed: spans covering it shrink by one and
//! indices above it shift down by one.

/// Eliminate cells that are not real boundaries.
///
/// `cells[i]` and `spans[i]` describe element `i` along one axis and are
/// rewritten in place to the compacted values. The original index of every
/// removed cell is appended to `eliminated`, highest first. Returns the
/// compacted cell count.
///
/// # Panics
///
/// Panics if `cells` and `spans` differ in length.
pub fn eliminate(cells: &mut [usize], spans: &mut [usize], eliminated: &mut Vec<usize>) -> usize {
    assert_eq!(
        cells.len(),
        spans.len(),
        "cell and span arrays must be parallel"
    );

    let mut cell_count = cells
        .iter()
        .zip(spans.iter())
        .map(|(cell, span)| cell + span)
        .max()
        .unwrap_or(0);

    // Highest first: removing a cell never changes the start/end status of a
    // lower one, so decisions made here stay valid.
    for cell in (0..cell_count).rev() {
        let starts = cells.iter().any(|&c| c == cell);
        let ends = cells
            .iter()
            .zip(spans.iter())
            .any(|(&c, &s)| s > 0 && c + s - 1 == cell);

        if starts && ends {
            continue;
        }

        eliminated.push(cell);

        for (c, s) in cells.iter_mut().zip(spans.iter_mut()) {
            if *c <= cell && cell < *c + *s {
                *s -= 1;
            }
            if *c > cell {
                *c -= 1;
            }
        }

        cell_count -= 1;
    }

    cell_count
}
