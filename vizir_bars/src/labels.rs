// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value labels: formatting, font fitting, placement and collision-based visibility.
//!
//! All labels of a chart share one font size. While bars are reported, every label shrinks
//! the shared size to what fits its own bar, so the tightest bar decides. Bounding boxes are
//! frozen when the label is placed; the draw pass only flips `hidden`.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::geometry::LabelSpace;
use crate::measure::{TextMeasurer, TextMetrics};
use crate::options::{BarsOptions, ScaleOrientation, VisibilityMode};
use crate::quadtree::intersects;

/// Fitted sizes below this hide every label of the chart.
pub const VALUE_MIN_FONT_SIZE: f64 = 8.0;
/// Fitted sizes never exceed this.
pub const VALUE_MAX_FONT_SIZE: f64 = 30.0;

const REFERENCE_FONT_SIZE: f64 = 14.0;
// Share of the bar thickness a label may span.
const BAR_FONT_SIZE_RATIO: f64 = 0.65;
// Gap between bar end and label, as a share of bar thickness, and its cap (px).
const LABEL_OFFSET_FACTOR_VT: f64 = 0.1;
const LABEL_OFFSET_FACTOR_HZ: f64 = 0.15;
const LABEL_OFFSET_MAX_VT: f64 = 5.0;
const LABEL_OFFSET_MAX_HZ: f64 = 10.0;
// A "middle" baseline centers lowercase glyphs; values are digits, so nudge toward cap
// height instead of measuring.
const MIDDLE_BASELINE_SHIFT: f64 = 0.1;

/// Horizontal text alignment relative to the anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Text starts at the anchor.
    Left,
    /// Text is centered on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

/// Vertical text baseline relative to the anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// Anchor is the top of the glyphs.
    Top,
    /// Anchor is the alphabetic baseline.
    Alphabetic,
    /// Anchor is the vertical middle of the glyphs.
    Middle,
}

/// How a label is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelStyle {
    /// Shared font size in device pixels.
    pub font_size: f64,
    /// Alignment.
    pub align: TextAlign,
    /// Baseline.
    pub baseline: TextBaseline,
}

/// Receives the labels that survive visibility resolution.
pub trait LabelPainter {
    /// Paints `text` at `at` (canvas device pixels).
    fn fill_text(&mut self, text: &str, at: Point, style: LabelStyle);
}

/// A value label for one `(datapoint, series)` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueLabel {
    /// Formatted text.
    pub text: String,
    /// Raw (unstacked) value.
    pub value: Option<f64>,
    /// Set by the draw pass when the label collides with an earlier one.
    pub hidden: bool,
    /// Ink bounds in canvas device pixels.
    pub bbox: Option<Rect>,
    /// Text metrics used for `bbox`.
    pub metrics: Option<TextMetrics>,
    /// Paint anchor in canvas device pixels.
    pub anchor: Option<Point>,
}

impl ValueLabel {
    fn is_negative(&self) -> bool {
        self.value.is_some_and(|v| v < 0.0)
    }

    /// Alignment used for this label.
    pub fn align(&self, orientation: ScaleOrientation) -> TextAlign {
        match orientation {
            ScaleOrientation::Horizontal => TextAlign::Center,
            ScaleOrientation::Vertical if self.is_negative() => TextAlign::Right,
            ScaleOrientation::Vertical => TextAlign::Left,
        }
    }

    /// Baseline used for this label.
    pub fn baseline(&self, orientation: ScaleOrientation) -> TextBaseline {
        match orientation {
            ScaleOrientation::Horizontal if self.is_negative() => TextBaseline::Top,
            ScaleOrientation::Horizontal => TextBaseline::Alphabetic,
            ScaleOrientation::Vertical => TextBaseline::Middle,
        }
    }
}

/// Result of [`fit_font_size`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontFit {
    /// Largest size that fits.
    pub font_size: f64,
    /// Metrics of the text at the 14px reference size.
    pub metrics: TextMetrics,
}

/// Finds the largest font size for `text` within `width` × `height`.
///
/// The text is measured once at 14px and scaled linearly; two pixels of horizontal slack are
/// kept. `max` optionally caps the result.
pub fn fit_font_size(
    measurer: &dyn TextMeasurer,
    text: &str,
    width: f64,
    height: f64,
    line_height: f64,
    max: Option<f64>,
) -> FontFit {
    let metrics = measurer.measure(text, REFERENCE_FONT_SIZE);
    let by_width = width / (metrics.width + 2.0) * REFERENCE_FONT_SIZE;
    let by_height = height / line_height;
    let optimal = by_width.min(by_height);
    FontFit {
        font_size: max.map_or(optimal, |m| optimal.min(m)),
        metrics,
    }
}

/// Bounds of a label drawn at `anchor`, with `metrics` scaled by `scale`.
fn text_bbox(
    anchor: Point,
    metrics: TextMetrics,
    scale: f64,
    align: TextAlign,
    baseline: TextBaseline,
) -> Rect {
    let w = metrics.width * scale;
    let h = metrics.height() * scale;
    let x0 = match align {
        TextAlign::Left => anchor.x,
        TextAlign::Center => anchor.x - w / 2.0,
        TextAlign::Right => anchor.x - w,
    };
    let y0 = match baseline {
        TextBaseline::Top => anchor.y,
        TextBaseline::Middle => anchor.y - h / 2.0,
        TextBaseline::Alphabetic => anchor.y - h,
    };
    Rect::new(x0, y0, x0 + w, y0 + h)
}

/// Label settings derived from [`BarsOptions`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LabelConfig {
    pub(crate) orientation: ScaleOrientation,
    pub(crate) show: VisibilityMode,
    pub(crate) fixed_size: Option<f64>,
    pub(crate) start_size: f64,
}

impl LabelConfig {
    pub(crate) fn from_options(opts: &BarsOptions) -> Self {
        Self {
            orientation: opts.orientation,
            show: opts.show_value,
            fixed_size: opts.text.value_size,
            start_size: opts
                .text
                .value_size
                .or(opts.text.max_value_size)
                .unwrap_or(VALUE_MAX_FONT_SIZE),
        }
    }

    fn offset_factor_and_max(&self) -> (f64, f64) {
        if self.orientation.is_horizontal() {
            (LABEL_OFFSET_FACTOR_VT, LABEL_OFFSET_MAX_VT)
        } else {
            (LABEL_OFFSET_FACTOR_HZ, LABEL_OFFSET_MAX_HZ)
        }
    }
}

/// One bar's worth of label input.
#[derive(Clone, Debug)]
pub(crate) struct LabelInput {
    pub(crate) series: usize,
    pub(crate) datapoint: usize,
    pub(crate) text: String,
    pub(crate) value: f64,
    /// Bar in plotting-area coordinates.
    pub(crate) bar: Rect,
    /// Plotting-area origin on the canvas.
    pub(crate) origin: Point,
    pub(crate) space: LabelSpace,
}

/// Labels of one draw cycle plus the running size/offset state.
#[derive(Clone, Debug)]
pub struct LabelLayout {
    labels: BTreeMap<usize, BTreeMap<usize, ValueLabel>>,
    font_size: f64,
    scale_factor: f64,
    offset: f64,
}

impl LabelLayout {
    pub(crate) fn new(cfg: &LabelConfig) -> Self {
        let mut layout = Self {
            labels: BTreeMap::new(),
            font_size: 0.0,
            scale_factor: 1.0,
            offset: 0.0,
        };
        layout.reset(cfg);
        layout
    }

    pub(crate) fn reset(&mut self, cfg: &LabelConfig) {
        self.labels.clear();
        self.font_size = cfg.start_size;
        self.scale_factor = 1.0;
        self.offset = cfg.offset_factor_and_max().1;
    }

    /// Shared font size resolved so far.
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Shared bar-to-label distance resolved so far.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if no label has been placed this cycle.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up the label of `(datapoint, series)`.
    pub fn get(&self, datapoint: usize, series: usize) -> Option<&ValueLabel> {
        self.labels.get(&datapoint)?.get(&series)
    }

    /// Iterates labels in draw order as `(datapoint, series, label)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &ValueLabel)> + '_ {
        self.labels
            .iter()
            .flat_map(|(&d, row)| row.iter().map(move |(&s, l)| (d, s, l)))
    }

    /// Computes text metrics, anchor and bounds for one bar's label.
    pub(crate) fn place(
        &mut self,
        cfg: &LabelConfig,
        measurer: &dyn TextMeasurer,
        input: LabelInput,
    ) {
        let horizontal = cfg.orientation.is_horizontal();
        let bar = input.bar;

        let (factor, _) = cfg.offset_factor_and_max();
        let thickness = if horizontal {
            bar.width()
        } else {
            bar.height()
        };
        self.offset = self.offset.min((factor * thickness).round());

        let mut label = ValueLabel {
            text: input.text,
            value: Some(input.value),
            hidden: false,
            bbox: None,
            metrics: None,
            anchor: None,
        };

        let metrics = match cfg.fixed_size {
            Some(size) => measurer.measure(&label.text, size),
            None => {
                let (width, height) = if horizontal {
                    (
                        input.space.h_space * BAR_FONT_SIZE_RATIO,
                        input.space.v_space - self.offset,
                    )
                } else {
                    (
                        input.space.h_space - self.offset,
                        input.space.v_space * BAR_FONT_SIZE_RATIO,
                    )
                };
                let fit = fit_font_size(measurer, &label.text, width, height, 1.0, None);

                let size = self
                    .font_size
                    .min(VALUE_MAX_FONT_SIZE)
                    .min(fit.font_size)
                    .round()
                    .clamp(0.0, self.font_size.max(0.0));
                // Metrics are at 14px and the running size only ever shrinks.
                self.scale_factor = if self.font_size > 0.0 {
                    (size / self.font_size) * (size / REFERENCE_FONT_SIZE)
                } else {
                    0.0
                };
                self.font_size = size;
                fit.metrics
            }
        };
        label.metrics = Some(metrics);

        let value = input.value;
        let origin = input.origin;
        let anchor = if horizontal {
            let y = if value < 0.0 {
                bar.y1 + self.offset
            } else {
                bar.y0 - self.offset
            };
            Point::new(origin.x + bar.x0 + bar.width() / 2.0, origin.y + y)
        } else {
            let x = if value < 0.0 {
                bar.x0 - self.offset
            } else {
                bar.x1 + self.offset
            };
            let shift = (MIDDLE_BASELINE_SHIFT * self.font_size).round();
            Point::new(origin.x + x, origin.y + bar.y0 + bar.height() / 2.0 + shift)
        };

        let align = label.align(cfg.orientation);
        let baseline = label.baseline(cfg.orientation);
        label.anchor = Some(anchor);
        label.bbox = Some(text_bbox(anchor, metrics, self.scale_factor, align, baseline));

        self.labels
            .entry(input.datapoint)
            .or_default()
            .insert(input.series, label);
    }

    /// Resolves visibility and paints labels. Returns the number of painted labels.
    pub(crate) fn draw(&mut self, cfg: &LabelConfig, painter: &mut dyn LabelPainter) -> usize {
        if cfg.show == VisibilityMode::Never {
            return 0;
        }
        if self.font_size < VALUE_MIN_FONT_SIZE {
            tracing::debug!(
                font_size = self.font_size,
                "value labels suppressed, font too small"
            );
            return 0;
        }

        let font_size = self.font_size;
        let mut painted = 0;
        let mut hidden = 0;
        for row in self.labels.values_mut() {
            let mut shown: SmallVec<[Rect; 8]> = SmallVec::new();
            for label in row.values_mut() {
                let (Some(anchor), Some(bbox)) = (label.anchor, label.bbox) else {
                    continue;
                };
                if cfg.show == VisibilityMode::Auto {
                    label.hidden = shown.iter().any(|r| intersects(*r, bbox));
                    if label.hidden {
                        hidden += 1;
                        continue;
                    }
                    shown.push(bbox);
                }
                let style = LabelStyle {
                    font_size,
                    align: label.align(cfg.orientation),
                    baseline: label.baseline(cfg.orientation),
                };
                painter.fill_text(&label.text, anchor, style);
                painted += 1;
            }
        }

        tracing::debug!(painted, hidden, font_size, "value labels drawn");
        painted
    }
}
