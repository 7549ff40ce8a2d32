// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time labels for ordinal x axes.
//!
//! Bar charts place one group per x index, so the axis scale is ordinal. When the x values
//! are timestamps (Unix milliseconds) the tick labels still read best as dates. The format is
//! chosen from the smallest gap between labelled ticks and the span of the whole data set:
//! - sub-second gaps show milliseconds,
//! - sub-minute gaps show seconds,
//! - spans up to a day show `HH:MM`,
//! - day-or-finer gaps show `MM/DD HH:MM`,
//! - spans below a year show `MM/DD`,
//! - yearly gaps show the year, coarser ones `YYYY-MM`.
//!
//! Labels are rendered in UTC.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chrono::DateTime;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const YEAR: f64 = 365.0 * DAY;

/// Label granularity for time ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeFormat {
    /// `HH:MM:SS.mmm`
    Millisecond,
    /// `HH:MM:SS`
    Second,
    /// `HH:MM`
    Minute,
    /// `MM/DD HH:MM`
    Hour,
    /// `MM/DD`
    Day,
    /// `YYYY-MM`
    Month,
    /// `YYYY`
    Year,
}

impl TimeFormat {
    /// Picks a granularity from the tick increment and the data span (both in ms).
    pub fn choose(increment: f64, span: f64) -> Self {
        let year_in_days = (YEAR / DAY).round() * DAY;
        let increment_in_days = (increment / DAY).round() * DAY;

        if increment < SECOND {
            Self::Millisecond
        } else if increment < MINUTE {
            Self::Second
        } else if span <= DAY {
            Self::Minute
        } else if increment <= DAY {
            Self::Hour
        } else if span < YEAR {
            Self::Day
        } else if increment_in_days == year_in_days {
            Self::Year
        } else {
            Self::Month
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Self::Millisecond => "%H:%M:%S%.3f",
            Self::Second => "%H:%M:%S",
            Self::Minute => "%H:%M",
            Self::Hour => "%m/%d %H:%M",
            Self::Day => "%m/%d",
            Self::Month => "%Y-%m",
            Self::Year => "%Y",
        }
    }

    /// Formats a Unix-millisecond timestamp, or returns an empty string if it is out of range.
    pub fn format(self, millis: f64) -> String {
        let Some(ms) = to_millis(millis) else {
            return String::new();
        };
        match DateTime::from_timestamp_millis(ms) {
            Some(dt) => alloc::format!("{}", dt.format(self.pattern())),
            None => String::new(),
        }
    }
}

fn to_millis(v: f64) -> Option<i64> {
    if !v.is_finite() {
        return None;
    }
    let v = v.round();
    if v < i64::MIN as f64 || v > i64::MAX as f64 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, reason = "range checked above")]
    Some(v as i64)
}

/// Formats tick labels for an ordinal axis whose x values are timestamps.
///
/// `timestamps` is the x column (Unix ms, `None` for gaps) and `splits` the tick indices into
/// it. The data span is `last - first` timestamp; the increment is the smallest positive gap
/// between consecutive labelled ticks (the span itself when there is only one tick).
pub fn format_time_ticks(timestamps: &[Option<f64>], splits: &[usize]) -> Vec<String> {
    let first = timestamps.iter().flatten().next().copied();
    let last = timestamps.iter().rev().flatten().next().copied();
    let span = match (first, last) {
        (Some(a), Some(b)) => (b - a).abs(),
        _ => 0.0,
    };

    let ticks: Vec<Option<f64>> = splits
        .iter()
        .map(|&i| timestamps.get(i).copied().flatten())
        .collect();

    let mut increment = f64::INFINITY;
    let mut prev: Option<f64> = None;
    for v in ticks.iter().flatten().copied() {
        if let Some(p) = prev {
            let gap = (v - p).abs();
            if gap > 0.0 {
                increment = increment.min(gap);
            }
        }
        prev = Some(v);
    }
    if !increment.is_finite() {
        increment = span;
    }

    let format = TimeFormat::choose(increment, span);
    ticks
        .into_iter()
        .map(|v| v.map(|v| format.format(v)).unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;

    // 2024-03-05T06:07:08.009Z
    const T0: f64 = 1_709_618_828_009.0;

    #[test]
    fn granularity_follows_increment_and_span() {
        assert_eq!(TimeFormat::choose(500.0, 10_000.0), TimeFormat::Millisecond);
        assert_eq!(TimeFormat::choose(5_000.0, MINUTE), TimeFormat::Second);
        assert_eq!(TimeFormat::choose(HOUR, 12.0 * HOUR), TimeFormat::Minute);
        assert_eq!(TimeFormat::choose(6.0 * HOUR, 3.0 * DAY), TimeFormat::Hour);
        assert_eq!(TimeFormat::choose(7.0 * DAY, 60.0 * DAY), TimeFormat::Day);
        assert_eq!(TimeFormat::choose(YEAR, 5.0 * YEAR), TimeFormat::Year);
        let months = TimeFormat::choose(30.0 * DAY, 2.0 * YEAR);
        assert_eq!(months, TimeFormat::Month);
    }

    #[test]
    fn formats_in_utc() {
        assert_eq!(TimeFormat::Millisecond.format(T0), "06:07:08.009");
        assert_eq!(TimeFormat::Hour.format(T0), "03/05 06:07");
        assert_eq!(TimeFormat::Month.format(T0), "2024-03");
        assert_eq!(TimeFormat::Year.format(f64::NAN), "");
    }

    #[test]
    fn daily_bars_get_month_day_labels() {
        let xs: Vec<Option<f64>> = (0..10).map(|i| Some(T0 + i as f64 * DAY)).collect();
        let labels = format_time_ticks(&xs, &[0, 3, 6, 9]);
        assert_eq!(labels, ["03/05", "03/08", "03/11", "03/14"]);
    }

    #[test]
    fn hourly_bars_within_a_day_get_clock_labels() {
        let xs: Vec<Option<f64>> = (0..4).map(|i| Some(T0 + i as f64 * HOUR)).collect();
        let labels = format_time_ticks(&xs, &[0, 1, 2, 3]);
        assert_eq!(labels, ["06:07", "07:07", "08:07", "09:07"]);
    }

    #[test]
    fn gaps_format_as_empty_labels() {
        let xs = [Some(T0), None, Some(T0 + 2.0 * HOUR)];
        let labels = format_time_ticks(&xs, &[0, 1, 2]);
        assert_eq!(labels[1], "");
    }
}
