// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar chart demos for `vizir_bars`.
//!
//! Each scenario runs one redraw cycle (prepare, init, clear, bars, draw), probes the hover
//! index at the center of one bar and writes the result as an SVG file. Set `RUST_LOG=debug`
//! (or `trace`) to follow the cycle.

mod svg;

use kurbo::{Point, Rect};
use peniko::Color;
use peniko::color::palette::css;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vizir_bars::{
    BarsError, BarsHooks, BarsOptions, BarsPlugin, DataFrame, Field, HeuristicTextMeasurer,
    PlotView, ScaleDirection, ScaleOrientation, StackingMode, TextAlign, TooltipHost,
    VisibilityMode, build_bar_paths, value_extent,
};

const CANVAS: Rect = Rect::new(0.0, 0.0, 520.0, 340.0);
const PLOT: Rect = Rect::new(40.0, 20.0, 500.0, 300.0);
const TICK_FONT_SIZE: f64 = 11.0;

const PALETTE: [Color; 4] = [
    css::STEEL_BLUE,
    css::DARK_ORANGE,
    css::SEA_GREEN,
    css::SLATE_GRAY,
];

/// Logs tooltip state instead of showing one.
#[derive(Debug, Default)]
struct LogTooltip {
    series: Option<usize>,
    datapoint: Option<usize>,
}

impl TooltipHost for LogTooltip {
    fn set_active_series(&mut self, series: Option<usize>) {
        self.series = series;
    }

    fn set_active_datapoint(&mut self, datapoint: Option<usize>) {
        self.datapoint = datapoint;
    }

    fn reposition_tooltip(&mut self, follow_cursor: bool) {
        info!(
            series = ?self.series,
            datapoint = ?self.datapoint,
            follow_cursor,
            "tooltip"
        );
    }
}

struct Scenario {
    name: &'static str,
    options: BarsOptions,
    frames: Vec<DataFrame>,
}

fn quarterly() -> DataFrame {
    DataFrame::new(vec![2021.0, 2022.0, 2023.0, 2024.0])
        .with_field(Field::new(
            "north",
            vec![Some(12.0), Some(18.5), Some(9.0), Some(21.0)],
        ))
        .with_field(Field::new(
            "south",
            vec![Some(7.0), Some(-4.0), Some(14.0), None],
        ))
        .with_field(Field::new(
            "west",
            vec![Some(3.5), Some(6.0), Some(11.0), Some(8.0)],
        ))
}

fn hourly() -> DataFrame {
    // 2024-03-05T06:00:00Z, hourly.
    let t0 = 1_709_618_400_000.0;
    DataFrame::new((0..8).map(|i| t0 + f64::from(i) * 3_600_000.0).collect())
        .with_field(Field::new(
            "requests",
            [120.0, 340.0, 410.0, 380.0, 290.0, 510.0, 470.0, 200.0]
                .into_iter()
                .map(Some)
                .collect(),
        ))
}

fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "grouped",
            options: BarsOptions::new()
                .with_widths(0.8, 0.9)
                .with_bar_radius(0.15)
                .with_show_value(VisibilityMode::Auto),
            frames: vec![quarterly()],
        },
        Scenario {
            name: "stacked",
            options: BarsOptions::new()
                .with_stacking(StackingMode::Normal)
                .with_show_value(VisibilityMode::Always),
            frames: vec![quarterly()],
        },
        Scenario {
            name: "percent",
            options: BarsOptions::new()
                .with_stacking(StackingMode::Percent)
                .with_show_value(VisibilityMode::Always)
                .with_formatter(|series, v| {
                    if series == 0 {
                        format!("{v}")
                    } else {
                        format!("{:.0}%", v * 100.0)
                    }
                }),
            frames: vec![quarterly()],
        },
        Scenario {
            name: "horizontal_bars",
            options: BarsOptions::new()
                .with_orientation(ScaleOrientation::Vertical)
                .with_direction(ScaleDirection::Reverse)
                .with_color(|_, _, v| (v < 0.0).then_some(css::CRIMSON))
                .with_fill_opacity(0.6)
                .with_show_value(VisibilityMode::Always),
            frames: vec![quarterly()],
        },
        Scenario {
            name: "hourly",
            options: BarsOptions::new()
                .with_x_time_auto(true)
                .with_x_spacing(60.0),
            frames: vec![hourly()],
        },
    ]
}

fn render(scenario: Scenario) -> Result<String, BarsError> {
    let mut plugin = BarsPlugin::new(scenario.options, Box::new(HeuristicTextMeasurer))?;
    let data = plugin.prepare_data(&scenario.frames)?;
    let view = PlotView {
        data: &data,
        bbox: PLOT,
        pixel_ratio: 1.0,
    };

    plugin.init(&view);
    plugin.clear(&view);
    let shapes = build_bar_paths(&mut plugin, &view, value_extent(&data));

    let mut scene = svg::SvgScene::new(CANVAS, css::BLACK);
    scene.fill_rect(PLOT, css::WHITE_SMOKE);
    for shape in &shapes {
        scene.bar(shape, PALETTE[(shape.series - 1) % PALETTE.len()]);
    }
    draw_x_ticks(&mut scene, &plugin, &view);
    let painted = plugin.draw(&view, &mut scene);

    if let Some(target) = shapes.last() {
        let cursor = target.shape.rect().center() - PLOT.origin().to_vec2();
        let mut tooltip = LogTooltip::default();
        let change = plugin.interpolate_hover(&view, cursor, &mut tooltip);
        info!(scenario = scenario.name, ?change, "hover probe");
        if let Some(overlay) = plugin.hover_overlay().filter(|o| o.is_visible()) {
            let rect = overlay.rect() + PLOT.origin().to_vec2();
            scene.fill_rect(rect, css::BLACK.with_alpha(0.1));
        }
    }

    info!(
        scenario = scenario.name,
        bars = shapes.len(),
        labels = painted,
        font_size = plugin.labels().font_size(),
        "rendered"
    );
    Ok(scene.to_svg_string())
}

/// Tick labels along the group axis, centered on their group.
fn draw_x_ticks(scene: &mut svg::SvgScene, plugin: &BarsPlugin, view: &PlotView<'_>) {
    let opts = plugin.options();
    let horizontal = opts.orientation.is_horizontal();
    let (min, max) = plugin.x_range(view);
    let span = max - min;
    let splits = plugin.x_splits(view);
    let labels = plugin.x_values(view, &splits);

    for (&i, label) in splits.iter().zip(&labels) {
        let mut t = (i as f64 - min) / span;
        if opts.direction == ScaleDirection::Reverse {
            t = 1.0 - t;
        }
        let (pos, align) = if horizontal {
            (Point::new(PLOT.x0 + t * PLOT.width(), PLOT.y1 + 6.0), TextAlign::Center)
        } else {
            let y = PLOT.y1 - t * PLOT.height() - TICK_FONT_SIZE / 2.0;
            (Point::new(PLOT.x0 - 6.0, y), TextAlign::Right)
        };
        scene.text(label, pos, TICK_FONT_SIZE, align);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    for scenario in scenarios() {
        let path = format!("vizir_bars_demo_{}.svg", scenario.name);
        let svg = render(scenario)?;
        std::fs::write(&path, svg)?;
        println!("wrote {path}");
    }
    Ok(())
}
