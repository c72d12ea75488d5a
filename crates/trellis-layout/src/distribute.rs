//! Space distribution across a selected set of cells.

/// Grow `sizes` by exactly `delta`, split across the `selected` cells.
///
/// Each selected cell first receives `floor(delta * stretch / total)`; the
/// rounding remainder then goes out one unit at a time in ascending cell
/// order. A non-positive `delta` leaves `sizes` unchanged.
///
/// # Panics
///
/// Panics if the slices differ in length, or if `delta` is positive and no
/// selected cell has a positive stretch.
pub fn distribute(selected: &[bool], stretches: &[u32], delta: i32, sizes: &mut [i32]) {
    assert_eq!(selected.len(), sizes.len(), "selection must cover every cell");
    assert_eq!(stretches.len(), sizes.len(), "stretch must cover every cell");

    if delta <= 0 {
        return;
    }

    let total: i64 = selected
        .iter()
        .zip(stretches)
        .filter(|(&s, _)| s)
        .map(|(_, &w)| i64::from(w))
        .sum();
    assert!(total > 0, "no selected cell can take space");

    let mut left = delta;
    for ((size, &chosen), &stretch) in sizes.iter_mut().zip(selected).zip(stretches) {
        if !chosen {
            continue;
        }
        let addon = (i64::from(delta) * i64::from(stretch) / total) as i32;
        *size += addon;
        left -= addon;
    }

    while left > 0 {
        for ((size, &chosen), &stretch) in sizes.iter_mut().zip(selected).zip(stretches) {
            if left == 0 {
                break;
            }
            if chosen && stretch > 0 {
                *size += 1;
                left -= 1;
            }
        }
    }
}

/// Pick the highest-priority subset of `allowed`.
///
/// Tiers are tried in order; the first one selecting at least one allowed
/// cell wins. When none does, every allowed cell is returned.
pub(crate) fn first_matching_tier(
    allowed: &[bool],
    tiers: &[&dyn Fn(usize) -> bool],
) -> Vec<bool> {
    for tier in tiers {
        let selected: Vec<bool> = allowed
            .iter()
            .enumerate()
            .map(|(cell, &ok)| ok && tier(cell))
            .collect();
        if selected.contains(&true) {
            return selected;
        }
    }
    allowed.to_vec()
}
