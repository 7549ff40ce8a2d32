// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weighted distribution of equally sized items along a unit interval.
//!
//! All items receive `size_factor / count` of the unit interval; the remaining
//! `1 - size_factor` becomes gaps, placed according to [`Justify`]. Offsets and widths are
//! rounded to 6 decimals so neighbouring items line up exactly.

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// How leftover space is spread between items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Justify {
    /// First item starts at 0, last item ends at 1.
    SpaceBetween,
    /// Every item gets half a gap on each side.
    SpaceAround,
    /// Equal gaps between items and at both ends.
    SpaceEvenly,
}

/// Distributes `count` items over `[0, 1]`, calling `each(index, offset, width)`.
///
/// With `only = Some(i)` just that item is reported. A single space-between item starts at 0
/// and is `size_factor` wide.
pub fn distribute(
    count: usize,
    size_factor: f64,
    justify: Justify,
    only: Option<usize>,
    mut each: impl FnMut(usize, f64, f64),
) {
    if count == 0 {
        return;
    }

    let n = count as f64;
    let space = 1.0 - size_factor;
    let mut gap = match justify {
        Justify::SpaceBetween => space / (n - 1.0),
        Justify::SpaceAround => space / n,
        Justify::SpaceEvenly => space / (n + 1.0),
    };
    if !gap.is_finite() {
        gap = 0.0;
    }

    let start = match justify {
        Justify::SpaceBetween => 0.0,
        Justify::SpaceAround => gap / 2.0,
        Justify::SpaceEvenly => gap,
    };

    let width = size_factor / n;
    let rounded_width = round_dec(width, 6);
    let coord = |i: usize| round_dec(start + i as f64 * (width + gap), 6);

    match only {
        Some(i) => each(i, coord(i), rounded_width),
        None => {
            for i in 0..count {
                each(i, coord(i), rounded_width);
            }
        }
    }
}

/// Rounds `v` to `decimals` decimal places.
pub(crate) fn round_dec(v: f64, decimals: i32) -> f64 {
    let mut scale = 1.0;
    for _ in 0..decimals {
        scale *= 10.0;
    }
    (v * scale).round() / scale
}
