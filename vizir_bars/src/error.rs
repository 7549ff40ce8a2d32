// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for option validation and data preparation.
//!
//! The per-cycle hooks never fail; only configuration and input frames are validated.

/// Errors returned by [`crate::BarsOptions::validate`] and [`crate::prepare_plot_data`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BarsError {
    /// A fractional option is outside its allowed range.
    #[error("`{name}` is out of range: {value}")]
    InvalidFraction {
        /// Option name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The corner radius is outside `[0, 0.5]`.
    #[error("bar radius must be within [0, 0.5], got {0}")]
    InvalidRadius(f64),
    /// A configured font size is not a positive finite number.
    #[error("value font size must be positive and finite, got {0}")]
    InvalidFontSize(f64),
    /// No frames were given to data preparation.
    #[error("no data frames to prepare")]
    NoFrames,
    /// Frames were given but none of them carries a value field.
    #[error("data frames carry no value fields")]
    NoValueFields,
    /// A value field does not line up with its frame's x column.
    #[error("field {field} of frame {frame} has {found} values, expected {expected}")]
    FieldLength {
        /// Frame index.
        frame: usize,
        /// Field index within the frame.
        field: usize,
        /// Length of the frame's x column.
        expected: usize,
        /// Length of the field.
        found: usize,
    },
    /// A frame's x column is not sorted ascending.
    #[error("x values of frame {frame} are not ascending")]
    UnsortedX {
        /// Frame index.
        frame: usize,
    },
}
