// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group/bar slot distribution along the group axis.
//!
//! Groups (one per x index) are spread over the plotting area with [`Justify::SpaceBetween`].
//! Side-by-side bars split their group's footprint the same way one level down; stacked bars
//! all take the whole group footprint since stacking moves along the value axis instead.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::distribute::{Justify, distribute};

const GROUP_DISTR: Justify = Justify::SpaceBetween;
const BAR_DISTR: Justify = Justify::SpaceBetween;

/// Offsets and sizes of one bar index across all groups, as plotting-area fractions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Slot {
    /// Start of the bar along the group axis, per group.
    pub offsets: Vec<f64>,
    /// Extent of the bar along the group axis, per group.
    pub sizes: Vec<f64>,
}

impl Slot {
    fn zeroed(group_count: usize) -> Self {
        Self {
            offsets: vec![0.0; group_count],
            sizes: vec![0.0; group_count],
        }
    }

    /// Returns `(offset, size)` for a group.
    pub fn get(&self, group: usize) -> Option<(f64, f64)> {
        Some((*self.offsets.get(group)?, *self.sizes.get(group)?))
    }
}

/// Side-by-side layout: every group is split among `bar_count` bars.
///
/// The returned vector has one [`Slot`] per bar index.
pub fn distribute_two_level(
    group_count: usize,
    bar_count: usize,
    group_width: f64,
    bar_width: f64,
) -> Vec<Slot> {
    let mut out: Vec<Slot> = (0..bar_count).map(|_| Slot::zeroed(group_count)).collect();

    distribute(
        group_count,
        group_width,
        GROUP_DISTR,
        None,
        |group, group_off, group_dim| {
            distribute(
                bar_count,
                bar_width,
                BAR_DISTR,
                None,
                |bar, bar_off, bar_dim| {
                    let slot = &mut out[bar];
                    slot.offsets[group] = group_off + group_dim * bar_off;
                    slot.sizes[group] = group_dim * bar_dim;
                },
            );
        },
    );

    out
}

/// Stacked layout: every bar takes its group's whole footprint.
pub fn distribute_one_level(group_count: usize, bar_count: usize, group_width: f64) -> Vec<Slot> {
    let mut out: Vec<Slot> = (0..bar_count).map(|_| Slot::zeroed(group_count)).collect();

    distribute(
        group_count,
        group_width,
        GROUP_DISTR,
        None,
        |group, group_off, group_dim| {
            for slot in &mut out {
                slot.offsets[group] = group_off;
                slot.sizes[group] = group_dim;
            }
        },
    );

    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;

    #[test]
    fn two_level_bars_stay_inside_their_group() {
        let slots = distribute_two_level(3, 2, 0.7, 0.8);
        assert_eq!(slots.len(), 2);

        let mut groups = Vec::new();
        distribute(3, 0.7, Justify::SpaceBetween, None, |_, o, w| {
            groups.push((o, w));
        });

        for (g, (g_off, g_w)) in groups.into_iter().enumerate() {
            let (a_off, a_w) = slots[0].get(g).unwrap();
            let (b_off, b_w) = slots[1].get(g).unwrap();
            assert!(a_off >= g_off - 1e-9, "bar 0 starts inside group {g}");
            let a_end = a_off + a_w;
            assert!(a_end <= b_off + 1e-9, "bars do not overlap in group {g}");
            let group_end = g_off + g_w + 1e-6;
            assert!(b_off + b_w <= group_end, "bar 1 ends inside group {g}");
        }
    }

    #[test]
    fn one_level_bars_share_group_footprint() {
        let slots = distribute_one_level(4, 3, 0.5);
        for g in 0..4 {
            let first = slots[0].get(g).unwrap();
            for slot in &slots[1..] {
                assert_eq!(slot.get(g).unwrap(), first, "group {g}");
            }
        }
        assert!((slots[0].sizes[0] - 0.125).abs() < 1e-9, "0.5 / 4 groups");
    }

    #[test]
    fn empty_inputs_yield_empty_slots() {
        assert!(distribute_two_level(3, 0, 0.7, 0.8).is_empty(), "no bars");
        let slots = distribute_two_level(0, 2, 0.7, 0.8);
        assert!(slots.iter().all(|s| s.offsets.is_empty()), "no groups");
    }
}
