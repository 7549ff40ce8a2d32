// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-datapoint bar colors.

extern crate alloc;

use alloc::vec::Vec;

use peniko::Color;

use crate::options::ColorFn;

/// Resolved colors of one series, indexed by datapoint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesColors {
    /// Fill colors, with the fill opacity applied.
    pub fill: Vec<Option<Color>>,
    /// Stroke colors as returned by the color function.
    pub stroke: Vec<Option<Color>>,
}

/// Resolves per-datapoint colors for every value series.
///
/// The result is indexed like `data`; index `0` (the x column) is always `None`. Null values
/// map to `None`. Fills only have their alpha replaced when `fill_opacity < 1`.
pub fn map_colors(
    data: &[Vec<Option<f64>>],
    color: &ColorFn,
    fill_opacity: f64,
) -> Vec<Option<SeriesColors>> {
    let mut out = Vec::with_capacity(data.len());
    if data.is_empty() {
        return out;
    }
    out.push(None);

    for (series, values) in data.iter().enumerate().skip(1) {
        let stroke: Vec<Option<Color>> = values
            .iter()
            .enumerate()
            .map(|(i, v)| v.and_then(|v| color(series, i, v)))
            .collect();
        let fill = if fill_opacity < 1.0 {
            #[allow(clippy::cast_possible_truncation, reason = "opacity is in [0, 1]")]
            let alpha = fill_opacity as f32;
            stroke
                .iter()
                .map(|c| c.map(|c| c.with_alpha(alpha)))
                .collect()
        } else {
            stroke.clone()
        };
        out.push(Some(SeriesColors { fill, stroke }));
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::sync::Arc;
    use alloc::vec;

    use super::*;

    fn palette() -> ColorFn {
        Arc::new(|series, _, v| {
            if v > 100.0 {
                None
            } else if series == 1 {
                Some(Color::from_rgb8(0xd6, 0x27, 0x28))
            } else {
                Some(Color::from_rgb8(0x1f, 0x77, 0xb4))
            }
        })
    }

    fn data() -> Vec<Vec<Option<f64>>> {
        vec![
            vec![Some(0.0), Some(1.0), Some(2.0)],
            vec![Some(1.0), None, Some(3.0)],
            vec![Some(4.0), Some(500.0), Some(2.0)],
        ]
    }

    #[test]
    fn nulls_and_x_column_map_to_none() {
        let colors = map_colors(&data(), &palette(), 1.0);
        assert_eq!(colors.len(), 3);
        assert!(colors[0].is_none(), "x column has no colors");
        let s1 = colors[1].as_ref().unwrap();
        assert_eq!(s1.fill[1], None);
        assert_eq!(s1.fill[0], Some(Color::from_rgb8(0xd6, 0x27, 0x28)));
        let s2 = colors[2].as_ref().unwrap();
        assert_eq!(s2.stroke[1], None, "color fn may decline");
    }

    #[test]
    fn opacity_applies_to_fill_only() {
        let colors = map_colors(&data(), &palette(), 0.5);
        let s2 = colors[2].as_ref().unwrap();
        let fill = s2.fill[0].unwrap();
        let stroke = s2.stroke[0].unwrap();
        assert!((fill.components[3] - 0.5).abs() < 1e-6, "{fill:?}");
        assert_eq!(stroke.components[3], 1.0);
    }

    #[test]
    fn full_opacity_keeps_colors() {
        let colors = map_colors(&data(), &palette(), 1.0);
        let s1 = colors[1].as_ref().unwrap();
        assert_eq!(s1.fill, s1.stroke);
    }

    #[test]
    fn empty_data_maps_to_nothing() {
        assert!(map_colors(&[], &palette(), 1.0).is_empty(), "no series");
    }
}
