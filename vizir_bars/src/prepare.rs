// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host data preparation: joining frames on x and stacking series.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::error::BarsError;
use crate::options::StackingMode;

/// Column-major plot data; column `0` is the x column.
pub type AlignedData = Vec<Vec<Option<f64>>>;

/// Stacking group used for fields that do not name one.
pub const DEFAULT_STACKING_GROUP: &str = "A";

/// A named value column.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Display name.
    pub name: String,
    /// Values aligned with the frame's x column.
    pub values: Vec<Option<f64>>,
    /// Fields of the same group stack onto each other.
    pub stacking_group: Option<String>,
}

impl Field {
    /// Creates a field in the default stacking group.
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
            stacking_group: None,
        }
    }

    /// Puts the field into stacking group `group`.
    pub fn with_stacking_group(mut self, group: impl Into<String>) -> Self {
        self.stacking_group = Some(group.into());
        self
    }

    fn group(&self) -> &str {
        self.stacking_group
            .as_deref()
            .unwrap_or(DEFAULT_STACKING_GROUP)
    }
}

/// An x column with the value fields measured at those x values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataFrame {
    /// Strictly ascending x values.
    pub x: Vec<f64>,
    /// Value fields.
    pub fields: Vec<Field>,
}

impl DataFrame {
    /// Creates a frame without fields.
    pub fn new(x: Vec<f64>) -> Self {
        Self {
            x,
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

/// Output of [`prepare_plot_data`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreparedData {
    /// Data as plotted: cumulative within a stacking group when stacking.
    pub aligned: AlignedData,
    /// Joined, unstacked values.
    pub raw: AlignedData,
    /// Per-datapoint totals of each series' stacking group (stacked modes only).
    pub totals: Vec<Option<Vec<f64>>>,
    /// Series each series is stacked on, if any.
    pub stacked_on: Vec<Option<usize>>,
}

impl PreparedData {
    /// Total of `(series, datapoint)`'s stacking group.
    pub fn total(&self, series: usize, datapoint: usize) -> Option<f64> {
        self.totals.get(series)?.as_ref()?.get(datapoint).copied()
    }
}

/// Joins `frames` on x and applies `stacking`.
pub fn prepare_plot_data(
    frames: &[DataFrame],
    stacking: StackingMode,
) -> Result<PreparedData, BarsError> {
    let _span = tracing::debug_span!("bars.prepare_data", frames = frames.len()).entered();

    if frames.is_empty() {
        return Err(BarsError::NoFrames);
    }
    for (f, frame) in frames.iter().enumerate() {
        if frame
            .x
            .windows(2)
            .any(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Less))
        {
            return Err(BarsError::UnsortedX { frame: f });
        }
        for (i, field) in frame.fields.iter().enumerate() {
            if field.values.len() != frame.x.len() {
                return Err(BarsError::FieldLength {
                    frame: f,
                    field: i,
                    expected: frame.x.len(),
                    found: field.values.len(),
                });
            }
        }
    }
    let fields: Vec<&Field> = frames.iter().flat_map(|f| f.fields.iter()).collect();
    if fields.is_empty() {
        return Err(BarsError::NoValueFields);
    }

    let raw = outer_join(frames);
    let len = raw[0].len();
    tracing::debug!(series = fields.len(), datapoints = len, "frames joined");

    let series_count = raw.len();
    let mut totals = vec![None; series_count];
    let mut stacked_on = vec![None; series_count];

    if !stacking.is_stacked() {
        return Ok(PreparedData {
            aligned: raw.clone(),
            raw,
            totals,
            stacked_on,
        });
    }

    // Series indices per group, in field order.
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, field) in fields.iter().enumerate() {
        groups.entry(field.group()).or_default().push(i + 1);
    }

    let mut aligned = raw.clone();
    for members in groups.values() {
        let sums: Vec<f64> = (0..len)
            .map(|d| members.iter().filter_map(|&s| raw[s][d]).sum())
            .collect();

        let mut acc = vec![0.0; len];
        let mut below = None;
        for &s in members {
            for d in 0..len {
                let Some(v) = raw[s][d] else {
                    continue;
                };
                let contribution = match stacking {
                    StackingMode::Percent if sums[d] == 0.0 => 0.0,
                    StackingMode::Percent => v / sums[d],
                    _ => v,
                };
                acc[d] += contribution;
                aligned[s][d] = Some(acc[d]);
            }
            totals[s] = Some(sums.clone());
            stacked_on[s] = below;
            below = Some(s);
        }
    }

    Ok(PreparedData {
        aligned,
        raw,
        totals,
        stacked_on,
    })
}

fn outer_join(frames: &[DataFrame]) -> AlignedData {
    if let [frame] = frames {
        let mut out = Vec::with_capacity(frame.fields.len() + 1);
        out.push(frame.x.iter().copied().map(Some).collect());
        out.extend(frame.fields.iter().map(|f| f.values.clone()));
        return out;
    }

    let mut xs: Vec<f64> = frames.iter().flat_map(|f| f.x.iter().copied()).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();

    let mut out = Vec::new();
    out.push(xs.iter().copied().map(Some).collect());
    for frame in frames {
        // Position of each frame row in the joined x column.
        let mut rows = Vec::with_capacity(frame.x.len());
        let mut j = 0;
        for &x in &frame.x {
            while xs[j] < x {
                j += 1;
            }
            rows.push(j);
        }
        for field in &frame.fields {
            let mut column = vec![None; xs.len()];
            for (&row, &v) in rows.iter().zip(&field.values) {
                column[row] = v;
            }
            out.push(column);
        }
    }
    out
}
