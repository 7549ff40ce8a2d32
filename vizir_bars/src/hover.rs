// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer hover: hit-testing bars and keeping a single highlight overlay in sync.

use kurbo::{Point, Rect};

use crate::quadtree::{BarRect, Quadtree};

/// The highlight rectangle drawn over the hovered bar.
///
/// Coordinates are CSS pixels relative to the plotting area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoverOverlay {
    rect: Rect,
    visible: bool,
}

impl HoverOverlay {
    /// Creates a hidden overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the overlay onto `rect` and shows it.
    pub fn show_at(&mut self, rect: Rect) {
        self.rect = rect;
        self.visible = true;
    }

    /// Hides the overlay, keeping its last position.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Last position.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Whether the overlay is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Tooltip surface owned by the host.
pub trait TooltipHost {
    /// Sets (or clears) the highlighted series.
    fn set_active_series(&mut self, series: Option<usize>);
    /// Sets (or clears) the highlighted datapoint.
    fn set_active_datapoint(&mut self, datapoint: Option<usize>);
    /// Asks the host to reposition its tooltip; `follow_cursor` when no bar is hovered.
    fn reposition_tooltip(&mut self, follow_cursor: bool);
}

/// What a probe did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverChange {
    /// A different bar is now hovered.
    Entered,
    /// The same bar is still hovered.
    Unchanged,
    /// The previously hovered bar was left.
    Left,
    /// Nothing was or is hovered.
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Hovered {
    cycle: u64,
    index: usize,
    bar: BarRect,
}

/// Hover state that survives redraws.
#[derive(Clone, Debug, Default)]
pub struct HoverProber {
    hovered: Option<Hovered>,
}

impl HoverProber {
    /// Creates a prober with nothing hovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently hovered bar.
    pub fn hovered(&self) -> Option<&BarRect> {
        self.hovered.as_ref().map(|h| &h.bar)
    }

    /// Probes `index` (built in `cycle`) at `cursor` (CSS px, plotting-area relative).
    ///
    /// A bar counts as the same bar only if it is the same entry of the same cycle's index;
    /// after a redraw the overlay and host are refreshed even when the geometry is unchanged.
    pub fn probe(
        &mut self,
        index: &Quadtree,
        cycle: u64,
        cursor: Point,
        pixel_ratio: f64,
        overlay: &mut HoverOverlay,
        host: &mut dyn TooltipHost,
    ) -> HoverChange {
        let device = Point::new(cursor.x * pixel_ratio, cursor.y * pixel_ratio);
        let found = index
            .hit(device)
            .and_then(|i| index.item(i).map(|bar| (i, *bar)));

        match (found, self.hovered) {
            (Some((i, _)), Some(prev)) if prev.cycle == cycle && prev.index == i => {
                HoverChange::Unchanged
            }
            (Some((i, bar)), _) => {
                let r = bar.rect;
                overlay.show_at(Rect::new(
                    r.x0 / pixel_ratio,
                    r.y0 / pixel_ratio,
                    r.x1 / pixel_ratio,
                    r.y1 / pixel_ratio,
                ));
                self.hovered = Some(Hovered {
                    cycle,
                    index: i,
                    bar,
                });
                host.set_active_series(Some(bar.series));
                host.set_active_datapoint(Some(bar.datapoint));
                host.reposition_tooltip(false);
                tracing::trace!(
                    series = bar.series,
                    datapoint = bar.datapoint,
                    "hover entered bar"
                );
                HoverChange::Entered
            }
            (None, Some(prev)) => {
                host.set_active_series(None);
                host.set_active_datapoint(None);
                host.reposition_tooltip(false);
                self.hovered = None;
                overlay.hide();
                tracing::trace!(
                    series = prev.bar.series,
                    datapoint = prev.bar.datapoint,
                    "hover left bar"
                );
                HoverChange::Left
            }
            (None, None) => {
                host.reposition_tooltip(true);
                HoverChange::Empty
            }
        }
    }
}
