// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for value labels.
//!
//! Labels are painted by the host, so the host also owns fonts. The label engine only needs
//! ink extents for a string at a given size, which it gets through [`TextMeasurer`].

/// Ink extents of a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f64,
    /// Distance from the alphabetic baseline to the top of the glyphs.
    pub ascent: f64,
    /// Distance from the alphabetic baseline to the bottom of the glyphs.
    pub descent: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent`.
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// A minimal text measurement interface used by the label engine.
///
/// Callers can plug in a real shaping backend (e.g. a canvas `measureText` bridge) or use
/// [`HeuristicTextMeasurer`].
pub trait TextMeasurer {
    /// Measures `text` rendered at `font_size`.
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, f64) -> TextMetrics,
{
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics {
        self(text, font_size)
    }
}

/// A tiny heuristic text measurer suitable for demos and tests.
///
/// It assumes digit-like glyphs: ~0.6em advance, 0.72em cap height and no descent.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics {
        TextMetrics {
            width: 0.6 * font_size * text.chars().count() as f64,
            ascent: 0.72 * font_size,
            descent: 0.0,
        }
    }
}
