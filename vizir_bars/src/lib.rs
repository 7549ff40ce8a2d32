// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped and stacked bar charts for immediate-mode plot hosts.
//!
//! The host owns scales, axes, data binding and the redraw loop. This crate plugs into it:
//! - **Layout**: groups (one per x index) and the bars within them are placed as fractions of
//!   the plotting area, see [`distribute_two_level`] and [`distribute_one_level`].
//! - **Ordinal x axis**: tick selection, tick labels (including timestamps) and range
//!   expansion so every index lands on its group's center.
//! - **Value labels**: one shared font size fitted to the tightest bar, anchors beside the
//!   bar ends, and collision-based hiding.
//! - **Hover**: a quadtree over the bars of the latest cycle drives a highlight overlay and
//!   the host's tooltip.
//!
//! [`BarsPlugin`] implements [`BarsHooks`]; a host calls `clear`, reports every bar it draws
//! through `each_bar`, then calls `draw`. [`build_bar_paths`] is a reference bar builder for
//! hosts without one.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod color;
mod distribute;
mod distribution;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod geometry;
mod hover;
mod labels;
mod measure;
mod options;
mod ordinal;
mod paths;
mod plugin;
mod prepare;
mod quadtree;
mod time;

pub use color::{SeriesColors, map_colors};
pub use distribute::{Justify, distribute};
pub use distribution::{Slot, distribute_one_level, distribute_two_level};
pub use error::BarsError;
pub use geometry::{BarInstance, LabelSpace, to_plot_space};
pub use hover::{HoverChange, HoverOverlay, HoverProber, TooltipHost};
pub use labels::{
    FontFit, LabelLayout, LabelPainter, LabelStyle, TextAlign, TextBaseline, VALUE_MAX_FONT_SIZE,
    VALUE_MIN_FONT_SIZE, ValueLabel, fit_font_size,
};
pub use measure::{HeuristicTextMeasurer, TextMeasurer, TextMetrics};
pub use options::{
    BarsOptions, ColorFn, FormatFn, RawValueFn, ScaleDirection, ScaleOrientation, StackingMode,
    TextOptions, VisibilityMode, format_value,
};
pub use ordinal::{first_group_center, x_range, x_splits};
pub use paths::{BarShape, build_bar_paths, value_extent};
pub use plugin::{BarsHooks, BarsPlugin, CycleContext, PlotView};
pub use prepare::{
    AlignedData, DEFAULT_STACKING_GROUP, DataFrame, Field, PreparedData, prepare_plot_data,
};
pub use quadtree::{BarRect, Quadtree, intersects, point_within};
pub use time::{TimeFormat, format_time_ticks};
