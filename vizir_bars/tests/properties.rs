// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for layout, label fitting and hit-testing.

use std::collections::BTreeSet;

use kurbo::{Point, Rect};
use proptest::prelude::*;
use vizir_bars::{
    BarInstance, BarRect, BarsHooks, BarsOptions, BarsPlugin, HeuristicTextMeasurer, Justify,
    LabelPainter, LabelStyle, PlotView, Quadtree, TextOptions, VALUE_MAX_FONT_SIZE,
    VisibilityMode, distribute, distribute_one_level, distribute_two_level, fit_font_size,
    intersects, x_range,
};

const EPS: f64 = 1e-5;

#[derive(Debug, Default)]
struct NullPainter;

impl LabelPainter for NullPainter {
    fn fill_text(&mut self, _: &str, _: Point, _: LabelStyle) {}
}

fn group_footprint(group_count: usize, group_width: f64, group: usize) -> (f64, f64) {
    let mut out = (0.0, 0.0);
    distribute(
        group_count,
        group_width,
        Justify::SpaceBetween,
        Some(group),
        |_, off, dim| out = (off, dim),
    );
    out
}

fn width_fraction() -> impl Strategy<Value = f64> {
    (1_u32..=100).prop_map(|p| f64::from(p) / 100.0)
}

proptest! {
    #[test]
    fn two_level_bars_fill_their_group_without_overlap(
        groups in 1_usize..20,
        bars in 1_usize..8,
        gw in width_fraction(),
        bw in width_fraction(),
    ) {
        let slots = distribute_two_level(groups, bars, gw, bw);
        prop_assert_eq!(slots.len(), bars);
        for g in 0..groups {
            let (_, dim) = group_footprint(groups, gw, g);
            let total: f64 = slots.iter().map(|s| s.sizes[g]).sum();
            prop_assert!((total - dim * bw).abs() < EPS, "group {}: {} vs {}", g, total, dim * bw);
            for pair in slots.windows(2) {
                let end = pair[0].offsets[g] + pair[0].sizes[g];
                prop_assert!(end <= pair[1].offsets[g] + EPS, "group {} overlaps", g);
            }
        }
    }

    #[test]
    fn one_level_bars_share_the_group_footprint(
        groups in 1_usize..20,
        bars in 1_usize..8,
        gw in width_fraction(),
    ) {
        let slots = distribute_one_level(groups, bars, gw);
        for g in 0..groups {
            let footprint = group_footprint(groups, gw, g);
            for slot in &slots {
                prop_assert_eq!(slot.get(g), Some(footprint));
            }
        }
    }

    #[test]
    fn range_expansion_never_shrinks(len in 2_usize..200, gw in width_fraction()) {
        let (min, max) = x_range(len, gw);
        let raw = (len - 1) as f64;
        prop_assert!(max - min > raw, "{}..{} does not expand {}", min, max, raw);
        prop_assert!((-min - (max - raw)).abs() < 1e-6, "asymmetric {}..{}", min, max);
    }

    #[test]
    fn fitted_size_shrinks_with_room(
        text in "[0-9]{1,6}",
        w in 1.0_f64..500.0,
        h in 1.0_f64..200.0,
        dw in 0.0_f64..100.0,
        dh in 0.0_f64..100.0,
    ) {
        let m = HeuristicTextMeasurer;
        let small = fit_font_size(&m, &text, w, h, 1.0, None).font_size;
        let large = fit_font_size(&m, &text, w + dw, h + dh, 1.0, None).font_size;
        prop_assert!(small <= large + 1e-9, "{} > {}", small, large);
    }

    #[test]
    fn labels_never_exceed_the_configured_maximum(
        heights in prop::collection::vec(1.0_f64..290.0, 1..12),
        width in 2.0_f64..120.0,
        max in prop::option::of(8.0_f64..60.0),
    ) {
        let opts = BarsOptions::new().with_text(TextOptions {
            value_size: None,
            max_value_size: max,
        });
        let mut plugin = BarsPlugin::new(opts, Box::new(HeuristicTextMeasurer)).unwrap();
        let data = vec![
            heights.iter().enumerate().map(|(i, _)| Some(i as f64)).collect(),
            heights.iter().map(|h| Some(*h)).collect::<Vec<_>>(),
        ];
        let view = PlotView { data: &data, bbox: Rect::new(0.0, 0.0, 2000.0, 300.0), pixel_ratio: 1.0 };
        plugin.clear(&view);
        for (i, h) in heights.iter().enumerate() {
            let x = i as f64 * (width + 4.0);
            plugin.each_bar(&view, BarInstance {
                series: 1,
                datapoint: i,
                rect: Rect::new(x, 300.0 - h, x + width, 300.0),
            });
        }
        let cap = max.unwrap_or(VALUE_MAX_FONT_SIZE).min(VALUE_MAX_FONT_SIZE);
        prop_assert!(plugin.labels().font_size() <= cap, "{} > {}", plugin.labels().font_size(), cap);
    }

    #[test]
    fn auto_visibility_leaves_no_visible_overlaps(
        tops in prop::collection::vec(20.0_f64..250.0, 2..6),
        xs in prop::collection::vec(0.0_f64..60.0, 2..6),
        values in prop::collection::vec(1_u32..100_000, 2..6),
    ) {
        let n = tops.len().min(xs.len()).min(values.len());
        let mut data = vec![vec![Some(0.0)]];
        for v in &values[..n] {
            data.push(vec![Some(f64::from(*v))]);
        }
        let opts = BarsOptions::new()
            .with_show_value(VisibilityMode::Auto)
            .with_text(TextOptions { value_size: Some(12.0), max_value_size: None });
        let mut plugin = BarsPlugin::new(opts, Box::new(HeuristicTextMeasurer)).unwrap();
        let view = PlotView { data: &data, bbox: Rect::new(0.0, 0.0, 400.0, 300.0), pixel_ratio: 1.0 };
        plugin.clear(&view);
        for s in 0..n {
            plugin.each_bar(&view, BarInstance {
                series: s + 1,
                datapoint: 0,
                rect: Rect::new(xs[s], tops[s], xs[s] + 30.0, 300.0),
            });
        }
        let painted = plugin.draw(&view, &mut NullPainter);

        let labels: Vec<_> = plugin.labels().iter().map(|(_, _, l)| l.clone()).collect();
        let visible: Vec<Rect> = labels.iter().filter(|l| !l.hidden).filter_map(|l| l.bbox).collect();
        prop_assert_eq!(painted, visible.len());
        for (i, a) in visible.iter().enumerate() {
            for b in &visible[i + 1..] {
                prop_assert!(!intersects(*a, *b), "{:?} overlaps {:?}", a, b);
            }
        }
        for hidden in labels.iter().filter(|l| l.hidden) {
            let bbox = hidden.bbox.unwrap();
            prop_assert!(visible.iter().any(|v| intersects(*v, bbox)), "hidden without a collision");
        }
    }

    #[test]
    fn hover_hits_only_inside_bars(
        heights in prop::collection::vec(10.0_f64..280.0, 1..30),
        fx in 0.05_f64..0.95,
        fy in 0.05_f64..0.95,
        pick in any::<prop::sample::Index>(),
    ) {
        let mut qt = Quadtree::new(Rect::new(0.0, 0.0, 600.0, 300.0));
        for (i, h) in heights.iter().enumerate() {
            let x = i as f64 * 20.0;
            qt.add(BarRect { rect: Rect::new(x, 300.0 - h, x + 15.0, 300.0), series: 1, datapoint: i });
        }
        let k = pick.index(heights.len());
        let bar = qt.item(k).unwrap().rect;
        let inside = Point::new(bar.x0 + fx * bar.width(), bar.y0 + fy * bar.height());
        prop_assert_eq!(qt.hit(inside).and_then(|i| qt.item(i)).map(|b| b.datapoint), Some(k));

        // The 5px gutter after each bar is empty.
        let gutter = Point::new(bar.x1 + 1.0 + fx * 3.0, bar.y0 + fy * bar.height());
        prop_assert_eq!(qt.hit(gutter), None);
    }

    #[test]
    fn queries_see_every_overlapping_rect(
        rects in prop::collection::vec((0.0_f64..380.0, 0.0_f64..280.0, 1.0_f64..20.0, 1.0_f64..20.0), 1..80),
        q in (0.0_f64..350.0, 0.0_f64..250.0, 1.0_f64..50.0, 1.0_f64..50.0),
    ) {
        let mut qt = Quadtree::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        for (i, (x, y, w, h)) in rects.iter().enumerate() {
            qt.add(BarRect { rect: Rect::new(*x, *y, x + w, y + h), series: 1, datapoint: i });
        }
        let region = Rect::new(q.0, q.1, q.0 + q.2, q.1 + q.3);
        let mut seen = BTreeSet::new();
        qt.query(region, |i, _| {
            seen.insert(i);
        });
        for i in 0..qt.len() {
            let r = qt.item(i).unwrap().rect;
            if intersects(r, region) {
                prop_assert!(seen.contains(&i), "rect {} missed", i);
            }
        }
    }
}
