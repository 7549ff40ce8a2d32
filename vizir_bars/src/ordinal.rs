// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordinal x-axis support: tick selection and range expansion.
//!
//! The x scale of a bar chart maps data indices, not x values. Ticks are therefore indices
//! into the x column, and the scale range has to be widened so the outermost groups are not
//! cut in half at the plot edges.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::distribute::{Justify, distribute};
use crate::options::{ScaleDirection, ScaleOrientation};

/// Selects which x indices get a tick.
///
/// `dim` is the plotting-area extent along the x axis in device pixels and `spacing` the
/// desired minimum distance between ticks in CSS pixels. A positive spacing keeps the first
/// index, a negative one the last; `0` keeps every index. The result is reversed when the axis
/// runs against screen order.
pub fn x_splits(
    data_len: usize,
    dim: f64,
    pixel_ratio: f64,
    spacing: f64,
    orientation: ScaleOrientation,
    direction: ScaleDirection,
) -> Vec<usize> {
    let flip = if orientation.is_horizontal() { 1 } else { -1 };
    let dir = direction.sign() * flip;

    let mut skip_mod = 0_usize;
    if spacing != 0.0 && data_len > 0 {
        let css_dim = dim / pixel_ratio.max(f64::EPSILON);
        let max_ticks = (css_dim / spacing).floor().abs().max(1.0);
        let len = data_len as f64;
        if len >= max_ticks {
            let m = (len / max_ticks).ceil().min(len);
            #[allow(clippy::cast_possible_truncation, reason = "bounded by data_len")]
            {
                skip_mod = m as usize;
            }
        }
    }

    let last = data_len.saturating_sub(1);
    let mut splits: Vec<usize> = (0..data_len)
        .filter(|&i| {
            if skip_mod == 0 {
                return true;
            }
            let anchored = if spacing > 0.0 { i } else { last - i };
            anchored % skip_mod == 0
        })
        .collect();

    if dir == -1 {
        splits.reverse();
    }
    splits
}

/// Center of the first group as a fraction of the plotting area.
pub fn first_group_center(group_count: usize, group_width: f64) -> f64 {
    let mut center = 0.0;
    distribute(
        group_count,
        group_width,
        Justify::SpaceBetween,
        Some(0),
        |_, off, width| {
            center = off + width / 2.0;
        },
    );
    center
}

/// Returns the expanded `(min, max)` of the index scale.
///
/// The raw domain is `[0, max(1, len - 1)]`. It grows by equal amounts on both ends so that
/// index `0` lands on the first group's center. A first center at exactly `0.5` (a single
/// group as wide as the plot) only extends the minimum by one domain width.
pub fn x_range(data_len: usize, group_width: f64) -> (f64, f64) {
    let mut min = 0.0;
    let mut max = (data_len.saturating_sub(1) as f64).max(1.0);

    let center = first_group_center(data_len, group_width);
    let range = max - min;

    if center == 0.5 {
        min -= range;
    } else {
        let up_scale = 1.0 / (1.0 - center * 2.0);
        let offset = (up_scale * range - range) / 2.0;
        min -= offset;
        max += offset;
    }

    (min, max)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    const H: ScaleOrientation = ScaleOrientation::Horizontal;
    const V: ScaleOrientation = ScaleOrientation::Vertical;
    const FWD: ScaleDirection = ScaleDirection::Forward;

    #[test]
    fn zero_spacing_keeps_every_index() {
        assert_eq!(x_splits(5, 500.0, 1.0, 0.0, H, FWD), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn positive_spacing_anchors_first_index() {
        // 100 css px / 30 px => 3 ticks fit; 10 points => every 4th index.
        assert_eq!(x_splits(10, 200.0, 2.0, 30.0, H, FWD), [0, 4, 8]);
    }

    #[test]
    fn negative_spacing_anchors_last_index() {
        // floor(100 / -30) = -4 => 4 ticks fit => every 3rd index counted from the end.
        assert_eq!(x_splits(10, 100.0, 1.0, -30.0, H, FWD), [0, 3, 6, 9]);
    }

    #[test]
    fn sparse_data_is_not_skipped() {
        assert_eq!(x_splits(3, 1000.0, 1.0, 50.0, H, FWD), [0, 1, 2]);
    }

    #[test]
    fn vertical_forward_axis_reverses_ticks() {
        assert_eq!(x_splits(3, 300.0, 1.0, 0.0, V, FWD), [2, 1, 0]);
        assert_eq!(
            x_splits(3, 300.0, 1.0, 0.0, V, ScaleDirection::Reverse),
            [0, 1, 2]
        );
    }

    #[test]
    fn tiny_plots_keep_only_the_anchor() {
        assert_eq!(x_splits(4, 10.0, 1.0, 30.0, H, FWD), [0]);
    }

    #[test]
    fn range_expands_symmetrically() {
        let (min, max) = x_range(3, 0.7);
        assert!(min < 0.0 && max > 2.0, "expanded: {min}..{max}");
        assert!((-min - (max - 2.0)).abs() < 1e-9, "symmetric: {min}..{max}");
    }

    #[test]
    fn first_index_lands_on_first_group_center() {
        let (min, max) = x_range(4, 0.6);
        let center = first_group_center(4, 0.6);
        let pos = (0.0 - min) / (max - min);
        assert!((pos - center).abs() < 1e-6, "{pos} vs {center}");
    }

    #[test]
    fn full_width_single_group_extends_left_only() {
        assert_eq!(x_range(1, 1.0), (-1.0, 1.0));
    }
}
