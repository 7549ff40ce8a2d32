// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-bar geometry bookkeeping.

use kurbo::{Rect, Size};

use crate::options::ScaleOrientation;

/// A rendered bar as reported by the host's path builder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarInstance {
    /// Series index (`>= 1`).
    pub series: usize,
    /// Datapoint index.
    pub datapoint: usize,
    /// Bar rectangle in canvas device pixels (axes and padding included).
    pub rect: Rect,
}

/// Translates a canvas rectangle into plotting-area coordinates.
pub fn to_plot_space(rect: Rect, plot: Rect) -> Rect {
    rect - plot.origin().to_vec2()
}

/// Smallest room left for value labels, tracked over one draw cycle.
///
/// `v_space` is measured along y and `h_space` along x. Along the value axis the room is the
/// distance between the bar end and the plot edge; for negative bars that is the opposite
/// edge. Across the value axis the room is the bar thickness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelSpace {
    /// Vertical room in device pixels.
    pub v_space: f64,
    /// Horizontal room in device pixels.
    pub h_space: f64,
}

impl Default for LabelSpace {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl LabelSpace {
    /// No bar seen yet.
    pub const UNBOUNDED: Self = Self {
        v_space: f64::INFINITY,
        h_space: f64::INFINITY,
    };

    /// Folds in one bar (plotting-area coordinates) with plotted value `value`.
    pub fn accumulate(&mut self, orientation: ScaleOrientation, value: f64, bar: Rect, plot: Size) {
        if orientation.is_horizontal() {
            let room = if value < 0.0 {
                plot.height - bar.y1
            } else {
                bar.y0
            };
            self.v_space = self.v_space.min(room);
            self.h_space = bar.width();
        } else {
            let room = if value < 0.0 {
                bar.x0
            } else {
                plot.width - bar.x1
            };
            self.v_space = bar.height();
            self.h_space = self.h_space.min(room);
        }
    }
}
