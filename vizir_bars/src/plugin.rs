// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bar chart plugin and the hooks a plot host drives it through.
//!
//! A redraw cycle is `clear`, then `each_bar` for every rendered bar, then `draw`. Hover probing
//! may happen at any point and always reads the index built by the latest cycle.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::color::{SeriesColors, map_colors};
use crate::distribution::{Slot, distribute_one_level, distribute_two_level};
use crate::error::BarsError;
use crate::geometry::{BarInstance, LabelSpace, to_plot_space};
use crate::hover::{HoverChange, HoverOverlay, HoverProber, TooltipHost};
use crate::labels::{LabelConfig, LabelInput, LabelLayout, LabelPainter};
use crate::measure::TextMeasurer;
use crate::options::{BarsOptions, StackingMode, VisibilityMode};
use crate::ordinal;
use crate::prepare::{AlignedData, DataFrame, PreparedData, prepare_plot_data};
use crate::quadtree::{BarRect, Quadtree};
use crate::time::format_time_ticks;

/// What the host currently shows.
#[derive(Clone, Copy, Debug)]
pub struct PlotView<'a> {
    /// Plotted data; column `0` is the x column.
    pub data: &'a [Vec<Option<f64>>],
    /// Plotting area in canvas device pixels.
    pub bbox: Rect,
    /// Device pixels per CSS pixel.
    pub pixel_ratio: f64,
}

impl PlotView<'_> {
    /// Number of x indices.
    pub fn group_count(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// Number of value series.
    pub fn series_count(&self) -> usize {
        self.data.len().saturating_sub(1)
    }

    pub(crate) fn value(&self, series: usize, datapoint: usize) -> Option<f64> {
        self.data.get(series)?.get(datapoint).copied().flatten()
    }
}

/// Lifecycle hooks called by the plot host.
pub trait BarsHooks {
    /// Called once before the first cycle.
    fn init(&mut self, view: &PlotView<'_>);
    /// Starts a cycle: rebuilds layout and drops per-cycle state.
    fn clear(&mut self, view: &PlotView<'_>);
    /// Reports one rendered bar.
    fn each_bar(&mut self, view: &PlotView<'_>, bar: BarInstance);
    /// Paints value labels; returns how many were painted.
    fn draw(&mut self, view: &PlotView<'_>, painter: &mut dyn LabelPainter) -> usize;
    /// Handles a pointer move (`cursor` in CSS px relative to the plotting area).
    fn interpolate_hover(
        &mut self,
        view: &PlotView<'_>,
        cursor: Point,
        host: &mut dyn TooltipHost,
    ) -> HoverChange;
    /// Joins and stacks host frames, returning the data to plot.
    fn prepare_data(&mut self, frames: &[DataFrame]) -> Result<AlignedData, BarsError>;
}

/// Everything rebuilt by `clear`.
#[derive(Clone, Debug)]
pub struct CycleContext {
    cycle: u64,
    slots: Vec<Slot>,
    colors: Vec<Option<SeriesColors>>,
    labels: LabelLayout,
    space: LabelSpace,
    index: Quadtree,
}

impl CycleContext {
    fn new(cfg: &LabelConfig) -> Self {
        Self {
            cycle: 0,
            slots: Vec::new(),
            colors: Vec::new(),
            labels: LabelLayout::new(cfg),
            space: LabelSpace::UNBOUNDED,
            index: Quadtree::new(Rect::ZERO),
        }
    }

    /// Number of `clear` calls so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Label space accumulated over the bars seen this cycle.
    pub fn label_space(&self) -> LabelSpace {
        self.space
    }

    /// Spatial index of this cycle's bars.
    pub fn index(&self) -> &Quadtree {
        &self.index
    }
}

/// A grouped/stacked bar chart plugin.
pub struct BarsPlugin {
    options: BarsOptions,
    label_cfg: LabelConfig,
    measurer: Box<dyn TextMeasurer>,
    prepared: Option<PreparedData>,
    ctx: CycleContext,
    overlay: Option<HoverOverlay>,
    prober: HoverProber,
}

impl core::fmt::Debug for BarsPlugin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BarsPlugin")
            .field("options", &self.options)
            .field("measurer", &"<dyn TextMeasurer>")
            .field("prepared", &self.prepared)
            .field("ctx", &self.ctx)
            .field("overlay", &self.overlay)
            .field("prober", &self.prober)
            .finish_non_exhaustive()
    }
}

impl BarsPlugin {
    /// Creates a plugin after validating `options`.
    pub fn new(options: BarsOptions, measurer: Box<dyn TextMeasurer>) -> Result<Self, BarsError> {
        options.validate()?;
        let label_cfg = LabelConfig::from_options(&options);
        Ok(Self {
            ctx: CycleContext::new(&label_cfg),
            options,
            label_cfg,
            measurer,
            prepared: None,
            overlay: None,
            prober: HoverProber::new(),
        })
    }

    /// Options the plugin was built with.
    pub fn options(&self) -> &BarsOptions {
        &self.options
    }

    /// Output of the last `prepare_data`.
    pub fn prepared(&self) -> Option<&PreparedData> {
        self.prepared.as_ref()
    }

    /// Tick indices for the x axis.
    pub fn x_splits(&self, view: &PlotView<'_>) -> Vec<usize> {
        let dim = if self.options.orientation.is_horizontal() {
            view.bbox.width()
        } else {
            view.bbox.height()
        };
        ordinal::x_splits(
            view.group_count(),
            dim,
            view.pixel_ratio,
            self.options.x_spacing,
            self.options.orientation,
            self.options.direction,
        )
    }

    /// Tick labels for `splits` (indices into the x column).
    pub fn x_values(&self, view: &PlotView<'_>, splits: &[usize]) -> Vec<String> {
        let xs: &[Option<f64>] = view.data.first().map(Vec::as_slice).unwrap_or(&[]);
        if self.options.x_time_auto {
            return format_time_ticks(xs, splits);
        }
        splits
            .iter()
            .map(|&i| match xs.get(i).copied().flatten() {
                Some(v) => (self.options.format_value)(0, v),
                None => String::new(),
            })
            .collect()
    }

    /// Expanded `(min, max)` of the index scale.
    pub fn x_range(&self, view: &PlotView<'_>) -> (f64, f64) {
        let (group_width, _) = self.options.effective_widths();
        ordinal::x_range(view.group_count(), group_width)
    }

    /// Slot fractions of `series` (`>= 1`) for this cycle.
    pub fn bar_layout(&self, series: usize) -> Option<&Slot> {
        self.ctx.slots.get(series.checked_sub(1)?)
    }

    /// Mapped colors of `series`, when a color function is configured.
    pub fn bar_colors(&self, series: usize) -> Option<&SeriesColors> {
        self.ctx.colors.get(series)?.as_ref()
    }

    /// The hover highlight, once `init` has run.
    pub fn hover_overlay(&self) -> Option<&HoverOverlay> {
        self.overlay.as_ref()
    }

    /// Currently hovered bar.
    pub fn hovered(&self) -> Option<&BarRect> {
        self.prober.hovered()
    }

    /// Per-cycle state.
    pub fn cycle(&self) -> &CycleContext {
        &self.ctx
    }

    /// Value labels of this cycle.
    pub fn labels(&self) -> &LabelLayout {
        &self.ctx.labels
    }

    fn raw_value(&self, view: &PlotView<'_>, series: usize, datapoint: usize) -> Option<f64> {
        if let Some(f) = &self.options.raw_value {
            return f(series, datapoint);
        }
        match &self.prepared {
            Some(p) => p.raw.get(series)?.get(datapoint).copied().flatten(),
            None => view.value(series, datapoint),
        }
    }

    fn label_value(&self, series: usize, datapoint: usize, raw: f64) -> f64 {
        if self.options.stacking != StackingMode::Percent {
            return raw;
        }
        let Some(prepared) = &self.prepared else {
            tracing::debug!(series, datapoint, "percent label without prepared totals");
            return 0.0;
        };
        match prepared.total(series, datapoint) {
            Some(total) if total != 0.0 => raw / total,
            _ => 0.0,
        }
    }
}

impl BarsHooks for BarsPlugin {
    fn init(&mut self, view: &PlotView<'_>) {
        self.overlay = Some(HoverOverlay::new());
        let bounds = Rect::from_origin_size(Point::ZERO, view.bbox.size());
        self.ctx.index.reset(bounds);
        tracing::debug!(
            orientation = ?self.options.orientation,
            stacking = ?self.options.stacking,
            "bars plugin initialized"
        );
    }

    fn clear(&mut self, view: &PlotView<'_>) {
        let _span = tracing::debug_span!("bars.clear", cycle = self.ctx.cycle + 1).entered();

        let ctx = &mut self.ctx;
        ctx.cycle += 1;

        let groups = view.group_count();
        let bars = view.series_count();
        let (group_width, bar_width) = self.options.effective_widths();
        ctx.slots = if self.options.stacking.is_stacked() {
            distribute_one_level(groups, bars, group_width)
        } else {
            distribute_two_level(groups, bars, group_width, bar_width)
        };

        ctx.colors = match &self.options.color {
            Some(color) => map_colors(view.data, color, self.options.fill_opacity),
            None => Vec::new(),
        };

        ctx.labels.reset(&self.label_cfg);
        ctx.space = LabelSpace::UNBOUNDED;
        ctx.index.reset(Rect::from_origin_size(Point::ZERO, view.bbox.size()));

        tracing::debug!(
            groups,
            bars,
            mapped_colors = !ctx.colors.is_empty(),
            "bar layout rebuilt"
        );
    }

    fn each_bar(&mut self, view: &PlotView<'_>, bar: BarInstance) {
        let Some(plotted) = view.value(bar.series, bar.datapoint) else {
            return;
        };
        let rect = to_plot_space(bar.rect, view.bbox);

        self.ctx
            .space
            .accumulate(self.options.orientation, plotted, rect, view.bbox.size());
        self.ctx.index.add(BarRect {
            rect,
            series: bar.series,
            datapoint: bar.datapoint,
        });

        if self.label_cfg.show == VisibilityMode::Never {
            return;
        }
        let Some(raw) = self.raw_value(view, bar.series, bar.datapoint) else {
            return;
        };
        let shown = self.label_value(bar.series, bar.datapoint, raw);
        let text = (self.options.format_value)(bar.series, shown);
        let input = LabelInput {
            series: bar.series,
            datapoint: bar.datapoint,
            text,
            value: raw,
            bar: rect,
            origin: view.bbox.origin(),
            space: self.ctx.space,
        };
        self.ctx
            .labels
            .place(&self.label_cfg, self.measurer.as_ref(), input);
        tracing::trace!(
            series = bar.series,
            datapoint = bar.datapoint,
            font_size = self.ctx.labels.font_size(),
            "bar label placed"
        );
    }

    fn draw(&mut self, _view: &PlotView<'_>, painter: &mut dyn LabelPainter) -> usize {
        let _span = tracing::debug_span!("bars.draw", cycle = self.ctx.cycle).entered();
        self.ctx.labels.draw(&self.label_cfg, painter)
    }

    fn interpolate_hover(
        &mut self,
        view: &PlotView<'_>,
        cursor: Point,
        host: &mut dyn TooltipHost,
    ) -> HoverChange {
        let overlay = self.overlay.get_or_insert_with(HoverOverlay::new);
        self.prober.probe(
            &self.ctx.index,
            self.ctx.cycle,
            cursor,
            view.pixel_ratio,
            overlay,
            host,
        )
    }

    fn prepare_data(&mut self, frames: &[DataFrame]) -> Result<AlignedData, BarsError> {
        self.prepared = None;
        let prepared = prepare_plot_data(frames, self.options.stacking)?;
        let aligned = prepared.aligned.clone();
        self.prepared = Some(prepared);
        Ok(aligned)
    }
}
