// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar chart configuration.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;

use peniko::Color;

use crate::error::BarsError;

/// Orientation of the x (group) axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScaleOrientation {
    /// Groups run left to right; bars grow vertically.
    #[default]
    Horizontal,
    /// Groups run top to bottom; bars grow horizontally.
    Vertical,
}

impl ScaleOrientation {
    /// Returns `true` for [`ScaleOrientation::Horizontal`].
    pub fn is_horizontal(self) -> bool {
        self == Self::Horizontal
    }
}

/// Direction of the x axis relative to its orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScaleDirection {
    /// Increasing index runs with the axis (`+1`).
    #[default]
    Forward,
    /// Increasing index runs against the axis (`-1`).
    Reverse,
}

impl ScaleDirection {
    /// Returns `1` or `-1`.
    pub fn sign(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

/// When value labels are shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisibilityMode {
    /// Never draw value labels.
    Never,
    /// Draw every label.
    Always,
    /// Draw labels that do not collide with another label of the same datapoint.
    #[default]
    Auto,
}

/// How series at the same x index are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StackingMode {
    /// Bars sit side by side within a group.
    #[default]
    None,
    /// Bars are stacked on top of each other.
    Normal,
    /// Bars are stacked and normalized to the datapoint total.
    Percent,
}

impl StackingMode {
    /// Returns `true` for any stacking mode.
    pub fn is_stacked(self) -> bool {
        self != Self::None
    }
}

/// Value label sizing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextOptions {
    /// Fixed label font size; `None` fits the size to the bars.
    pub value_size: Option<f64>,
    /// Upper bound for fitted sizes (always capped at 30px as well).
    pub max_value_size: Option<f64>,
}

/// Returns the unstacked value of `(series, datapoint)`.
pub type RawValueFn = Arc<dyn Fn(usize, usize) -> Option<f64>>;
/// Returns the color of `(series, datapoint, value)`.
pub type ColorFn = Arc<dyn Fn(usize, usize, f64) -> Option<Color>>;
/// Formats the value of a series.
pub type FormatFn = Arc<dyn Fn(usize, f64) -> String>;

/// Options for a bar chart, fixed for the lifetime of a [`crate::BarsPlugin`].
#[derive(Clone)]
pub struct BarsOptions {
    /// Orientation of the x axis.
    pub orientation: ScaleOrientation,
    /// Direction of the x axis.
    pub direction: ScaleDirection,
    /// Fraction of the plotting area covered by groups.
    pub group_width: f64,
    /// Fraction of a group covered by its bars.
    pub bar_width: f64,
    /// Corner radius of the bar's value end, as a fraction of bar thickness.
    pub bar_radius: f64,
    /// Value label visibility.
    pub show_value: VisibilityMode,
    /// Stacking mode.
    pub stacking: StackingMode,
    /// Optional raw value accessor; defaults to the unstacked prepared data.
    pub raw_value: Option<RawValueFn>,
    /// Optional per-datapoint colors.
    pub color: Option<ColorFn>,
    /// Opacity applied to mapped fill colors.
    pub fill_opacity: f64,
    /// Value formatter used by labels and non-time x ticks.
    pub format_value: FormatFn,
    /// Label sizing.
    pub text: TextOptions,
    /// Minimum x tick spacing in CSS pixels; the sign picks the anchored end, `0` disables.
    pub x_spacing: f64,
    /// Format x ticks as Unix-millisecond timestamps.
    pub x_time_auto: bool,
}

impl core::fmt::Debug for BarsOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BarsOptions")
            .field("orientation", &self.orientation)
            .field("direction", &self.direction)
            .field("group_width", &self.group_width)
            .field("bar_width", &self.bar_width)
            .field("bar_radius", &self.bar_radius)
            .field("show_value", &self.show_value)
            .field("stacking", &self.stacking)
            .field("raw_value", &self.raw_value.as_ref().map(|_| "<fn>"))
            .field("color", &self.color.as_ref().map(|_| "<fn>"))
            .field("fill_opacity", &self.fill_opacity)
            .field("format_value", &"<fn>")
            .field("text", &self.text)
            .field("x_spacing", &self.x_spacing)
            .field("x_time_auto", &self.x_time_auto)
            .finish()
    }
}

impl Default for BarsOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl BarsOptions {
    /// Creates options with Grafana-like defaults: 70% groups, 97% bars, auto labels.
    pub fn new() -> Self {
        Self {
            orientation: ScaleOrientation::Horizontal,
            direction: ScaleDirection::Forward,
            group_width: 0.7,
            bar_width: 0.97,
            bar_radius: 0.0,
            show_value: VisibilityMode::Auto,
            stacking: StackingMode::None,
            raw_value: None,
            color: None,
            fill_opacity: 1.0,
            format_value: Arc::new(|_, v| format_value(v)),
            text: TextOptions::default(),
            x_spacing: 0.0,
            x_time_auto: false,
        }
    }

    /// Sets the x axis orientation.
    pub fn with_orientation(mut self, orientation: ScaleOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the x axis direction.
    pub fn with_direction(mut self, direction: ScaleDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the group and bar width fractions.
    pub fn with_widths(mut self, group_width: f64, bar_width: f64) -> Self {
        self.group_width = group_width;
        self.bar_width = bar_width;
        self
    }

    /// Sets the corner radius fraction.
    pub fn with_bar_radius(mut self, radius: f64) -> Self {
        self.bar_radius = radius;
        self
    }

    /// Sets value label visibility.
    pub fn with_show_value(mut self, mode: VisibilityMode) -> Self {
        self.show_value = mode;
        self
    }

    /// Sets the stacking mode.
    pub fn with_stacking(mut self, stacking: StackingMode) -> Self {
        self.stacking = stacking;
        self
    }

    /// Sets the raw value accessor.
    pub fn with_raw_value(mut self, f: impl Fn(usize, usize) -> Option<f64> + 'static) -> Self {
        self.raw_value = Some(Arc::new(f));
        self
    }

    /// Sets per-datapoint colors.
    pub fn with_color(mut self, f: impl Fn(usize, usize, f64) -> Option<Color> + 'static) -> Self {
        self.color = Some(Arc::new(f));
        self
    }

    /// Sets the fill opacity applied to mapped colors.
    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = opacity;
        self
    }

    /// Sets the value formatter.
    pub fn with_formatter(mut self, f: impl Fn(usize, f64) -> String + 'static) -> Self {
        self.format_value = Arc::new(f);
        self
    }

    /// Sets label sizing.
    pub fn with_text(mut self, text: TextOptions) -> Self {
        self.text = text;
        self
    }

    /// Sets the minimum x tick spacing (CSS px, signed).
    pub fn with_x_spacing(mut self, spacing: f64) -> Self {
        self.x_spacing = spacing;
        self
    }

    /// Treats x values as Unix-millisecond timestamps for tick labels.
    pub fn with_x_time_auto(mut self, enabled: bool) -> Self {
        self.x_time_auto = enabled;
        self
    }

    /// Checks ranges of the numeric options.
    pub fn validate(&self) -> Result<(), BarsError> {
        for (name, value) in [
            ("group_width", self.group_width),
            ("bar_width", self.bar_width),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(BarsError::InvalidFraction { name, value });
            }
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(BarsError::InvalidFraction {
                name: "fill_opacity",
                value: self.fill_opacity,
            });
        }
        if !(0.0..=0.5).contains(&self.bar_radius) {
            return Err(BarsError::InvalidRadius(self.bar_radius));
        }
        for size in [self.text.value_size, self.text.max_value_size]
            .into_iter()
            .flatten()
        {
            if !(size.is_finite() && size > 0.0) {
                return Err(BarsError::InvalidFontSize(size));
            }
        }
        Ok(())
    }

    /// Group and bar fractions actually used for layout.
    ///
    /// A stack is drawn as a single bar per group, so stacked layouts use `bar_width` as the
    /// group footprint and `group_width` for the (unused) inner level.
    pub fn effective_widths(&self) -> (f64, f64) {
        if self.stacking.is_stacked() {
            (self.bar_width, self.group_width)
        } else {
            (self.group_width, self.bar_width)
        }
    }
}

/// Default value formatting: integers without decimals, other values with up to two.
pub fn format_value(v: f64) -> String {
    if !v.is_finite() {
        return alloc::format!("{v}");
    }
    let mut s = alloc::format!("{v:.2}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = String::from("0");
    }
    s
}
