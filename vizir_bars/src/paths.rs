// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A reference bar path builder.
//!
//! Plot hosts usually bring their own bar primitive and only call [`BarsHooks::each_bar`]
//! from it. This one turns slot fractions and values into rounded rectangles so headless hosts
//! and tests can drive a full redraw cycle.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{Point, Rect, RoundedRect, RoundedRectRadii};
use peniko::Color;

use crate::geometry::BarInstance;
use crate::plugin::{BarsHooks, BarsPlugin, PlotView};

/// One drawable bar.
#[derive(Clone, Debug, PartialEq)]
pub struct BarShape {
    /// Series index (`>= 1`).
    pub series: usize,
    /// Datapoint index.
    pub datapoint: usize,
    /// Bar outline in canvas device pixels.
    pub shape: RoundedRect,
    /// Per-datapoint fill override.
    pub fill: Option<Color>,
    /// Per-datapoint stroke override.
    pub stroke: Option<Color>,
}

// Headroom past the largest magnitude, as a share of the data span. Keeps room for value
// labels beyond the tallest bar.
const VALUE_PADDING: f64 = 0.1;

/// Value range covering every plotted value and zero, padded away from zero.
///
/// Degenerate ranges are widened to one unit above their minimum.
pub fn value_extent(data: &[Vec<Option<f64>>]) -> (f64, f64) {
    let mut min = 0.0_f64;
    let mut max = 0.0_f64;
    for v in data.iter().skip(1).flatten().flatten() {
        if v.is_finite() {
            min = min.min(*v);
            max = max.max(*v);
        }
    }
    if max <= min {
        return (min, min + 1.0);
    }
    let pad = (max - min) * VALUE_PADDING;
    if max > 0.0 {
        max += pad;
    }
    if min < 0.0 {
        min -= pad;
    }
    (min, max)
}

/// Builds every bar of `view` and reports each one to `plugin`.
///
/// `value_range` is the `(min, max)` of the value scale. Must be called between
/// [`BarsHooks::clear`] and [`BarsHooks::draw`].
pub fn build_bar_paths(
    plugin: &mut BarsPlugin,
    view: &PlotView<'_>,
    value_range: (f64, f64),
) -> Vec<BarShape> {
    let opts = plugin.options();
    let horizontal = opts.orientation.is_horizontal();
    let sign = opts.direction.sign() * if horizontal { 1 } else { -1 };
    let radius = opts.bar_radius;
    let bbox = view.bbox;

    let (group_lo, group_dim) = if horizontal {
        (bbox.x0, bbox.width())
    } else {
        (bbox.y0, bbox.height())
    };
    let (vmin, vmax) = value_range;
    let span = if vmax > vmin { vmax - vmin } else { 1.0 };
    let value_pos = |v: f64| {
        let t = (v - vmin) / span;
        if horizontal {
            bbox.y1 - t * bbox.height()
        } else {
            bbox.x0 + t * bbox.width()
        }
    };

    let mut shapes = Vec::new();
    for series in 1..view.data.len() {
        let Some(slot) = plugin.bar_layout(series).cloned() else {
            continue;
        };
        let colors = plugin.bar_colors(series).cloned();

        for (datapoint, value) in view.data[series].iter().enumerate() {
            let Some(value) = *value else {
                continue;
            };
            let Some((off, size)) = slot.get(datapoint) else {
                continue;
            };

            let start = if sign == 1 {
                group_lo + off * group_dim
            } else {
                group_lo + group_dim - (off + size) * group_dim
            };
            let end = start + size * group_dim;

            let base = stack_base(plugin, view, series, datapoint);
            let (b, v) = (value_pos(base), value_pos(value));
            let rect = if horizontal {
                Rect::from_points(Point::new(start, b), Point::new(end, v))
            } else {
                Rect::from_points(Point::new(b, start), Point::new(v, end))
            };

            let r = radius * size * group_dim;
            let grows_up = value >= base;
            let radii = match (horizontal, grows_up) {
                (true, true) => RoundedRectRadii::new(r, r, 0.0, 0.0),
                (true, false) => RoundedRectRadii::new(0.0, 0.0, r, r),
                (false, true) => RoundedRectRadii::new(0.0, r, r, 0.0),
                (false, false) => RoundedRectRadii::new(r, 0.0, 0.0, r),
            };

            let (fill, stroke) = match &colors {
                Some(c) => (
                    c.fill.get(datapoint).copied().flatten(),
                    c.stroke.get(datapoint).copied().flatten(),
                ),
                None => (None, None),
            };

            plugin.each_bar(
                view,
                BarInstance {
                    series,
                    datapoint,
                    rect,
                },
            );
            shapes.push(BarShape {
                series,
                datapoint,
                shape: RoundedRect::from_rect(rect, radii),
                fill,
                stroke,
            });
        }
    }
    shapes
}

/// Plotted value of the nearest non-null series below `series` in its stack, or `0`.
fn stack_base(plugin: &BarsPlugin, view: &PlotView<'_>, series: usize, datapoint: usize) -> f64 {
    let Some(prepared) = plugin.prepared() else {
        return 0.0;
    };
    let mut below = prepared.stacked_on.get(series).copied().flatten();
    while let Some(s) = below {
        if let Some(v) = view.value(s, datapoint) {
            return v;
        }
        below = prepared.stacked_on.get(s).copied().flatten();
    }
    0.0
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::boxed::Box;
    use alloc::vec;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;
    use crate::options::{BarsOptions, ScaleDirection, ScaleOrientation, StackingMode};
    use crate::prepare::{DataFrame, Field};

    fn bbox() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 300.0)
    }

    #[test]
    fn extent_includes_zero() {
        let d = vec![vec![Some(0.0), Some(1.0)], vec![Some(3.0), Some(-2.0)]];
        assert_eq!(value_extent(&d), (-2.5, 3.5));
        let d = vec![vec![Some(0.0)], vec![Some(5.0)]];
        assert_eq!(value_extent(&d), (0.0, 5.5));
        let d = vec![vec![Some(0.0)], vec![None]];
        assert_eq!(value_extent(&d), (0.0, 1.0));
    }

    #[test]
    fn vertical_bars_grow_up_from_zero() {
        let d = vec![vec![Some(0.0), Some(1.0)], vec![Some(3.0), Some(-1.0)]];
        let mut p = BarsPlugin::new(BarsOptions::new(), Box::new(HeuristicTextMeasurer)).unwrap();
        let view = PlotView {
            data: &d,
            bbox: bbox(),
            pixel_ratio: 1.0,
        };
        p.clear(&view);
        let shapes = build_bar_paths(&mut p, &view, (-1.0, 3.0));
        assert_eq!(shapes.len(), 2);

        let zero_y = 300.0 - 0.25 * 300.0;
        let pos = shapes[0].shape.rect();
        assert!((pos.y1 - zero_y).abs() < 1e-9, "{pos:?}");
        assert!((pos.y0 - 0.0).abs() < 1e-9, "{pos:?}");
        let neg = shapes[1].shape.rect();
        assert!((neg.y0 - zero_y).abs() < 1e-9, "{neg:?}");
        assert!((neg.y1 - 300.0).abs() < 1e-9, "{neg:?}");
        assert!(pos.x1 < neg.x0, "index order left to right");
        assert_eq!(p.cycle().index().len(), 2);
    }

    #[test]
    fn reverse_direction_mirrors_groups() {
        let d = vec![vec![Some(0.0), Some(1.0)], vec![Some(1.0), Some(1.0)]];
        let mut p = BarsPlugin::new(
            BarsOptions::new().with_direction(ScaleDirection::Reverse),
            Box::new(HeuristicTextMeasurer),
        )
        .unwrap();
        let view = PlotView {
            data: &d,
            bbox: bbox(),
            pixel_ratio: 1.0,
        };
        p.clear(&view);
        let shapes = build_bar_paths(&mut p, &view, (0.0, 1.0));
        assert!(
            shapes[0].shape.rect().x0 > shapes[1].shape.rect().x1,
            "index 0 on the right"
        );
    }

    #[test]
    fn horizontal_bars_start_at_the_left_edge() {
        let d = vec![vec![Some(0.0), Some(1.0)], vec![Some(2.0), Some(4.0)]];
        let mut p = BarsPlugin::new(
            BarsOptions::new()
                .with_orientation(ScaleOrientation::Vertical)
                .with_bar_radius(0.5),
            Box::new(HeuristicTextMeasurer),
        )
        .unwrap();
        let view = PlotView {
            data: &d,
            bbox: bbox(),
            pixel_ratio: 1.0,
        };
        p.clear(&view);
        let shapes = build_bar_paths(&mut p, &view, (0.0, 4.0));
        let first = shapes[0].shape.rect();
        assert_eq!(first.x0, 0.0);
        assert!((first.x1 - 200.0).abs() < 1e-9, "{first:?}");
        // Index 0 sits at the bottom of a forward vertical axis.
        assert!(first.y0 > shapes[1].shape.rect().y1, "bottom to top");
        let radii = shapes[0].shape.radii();
        assert_eq!(radii.top_left, 0.0);
        assert!(radii.top_right > 0.0, "value end rounded");
    }

    #[test]
    fn stacked_segments_sit_on_each_other() {
        let frame = DataFrame::new(vec![0.0])
            .with_field(Field::new("a", vec![Some(1.0)]))
            .with_field(Field::new("b", vec![Some(2.0)]));
        let mut p = BarsPlugin::new(
            BarsOptions::new().with_stacking(StackingMode::Normal),
            Box::new(HeuristicTextMeasurer),
        )
        .unwrap();
        let data = p.prepare_data(&[frame]).unwrap();
        let view = PlotView {
            data: &data,
            bbox: bbox(),
            pixel_ratio: 1.0,
        };
        p.clear(&view);
        let shapes = build_bar_paths(&mut p, &view, (0.0, 3.0));
        let lower = shapes[0].shape.rect();
        let upper = shapes[1].shape.rect();
        assert!((lower.y0 - upper.y1).abs() < 1e-9, "{lower:?} / {upper:?}");
        assert!((upper.y0 - 0.0).abs() < 1e-9, "top of the stack at max");
        assert_eq!(lower.x0, upper.x0);
    }
}
