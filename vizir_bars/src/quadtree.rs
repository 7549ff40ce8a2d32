// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small region quadtree over bar rectangles.
//!
//! Nodes live in an arena and hold indices into a flat item list. A leaf splits into four
//! quadrants once it holds more than [`MAX_OBJECTS`] items, down to [`MAX_LEVELS`]. Items
//! straddling a midline are stored in every quadrant they touch, so queries may report the
//! same item more than once.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

const MAX_OBJECTS: usize = 10;
const MAX_LEVELS: u8 = 4;

/// A bar rectangle in plotting-area device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarRect {
    /// Bar geometry.
    pub rect: Rect,
    /// Series index (`>= 1`, series 0 is the x column).
    pub series: usize,
    /// Datapoint index.
    pub datapoint: usize,
}

/// Returns `true` if `p` lies inside `r`, edges included.
pub fn point_within(p: Point, r: Rect) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

/// Returns `true` if the rectangles overlap or touch.
pub fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

#[derive(Clone, Debug)]
struct Node {
    bounds: Rect,
    level: u8,
    items: SmallVec<[usize; MAX_OBJECTS + 1]>,
    children: Option<[usize; 4]>,
}

impl Node {
    fn new(bounds: Rect, level: u8) -> Self {
        Self {
            bounds,
            level,
            items: SmallVec::new(),
            children: None,
        }
    }

    /// Child slots touched by `r`, in NE, NW, SW, SE order.
    fn quads(&self, r: Rect) -> [bool; 4] {
        let mid = self.bounds.center();
        // Inclusive so rects touching a midline land on both sides, matching `intersects`.
        let start_north = r.y0 <= mid.y;
        let start_west = r.x0 <= mid.x;
        let end_east = r.x1 >= mid.x;
        let end_south = r.y1 >= mid.y;
        [
            start_north && end_east,
            start_west && start_north,
            start_west && end_south,
            end_east && end_south,
        ]
    }
}

/// Region index over [`BarRect`]s, rebuilt every draw cycle.
#[derive(Clone, Debug)]
pub struct Quadtree {
    items: Vec<BarRect>,
    nodes: Vec<Node>,
}

impl Quadtree {
    /// Creates an empty tree covering `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            items: Vec::new(),
            nodes: alloc::vec![Node::new(bounds, 0)],
        }
    }

    /// Drops every item and resets the covered region.
    pub fn reset(&mut self, bounds: Rect) {
        self.items.clear();
        self.nodes.clear();
        self.nodes.push(Node::new(bounds, 0));
    }

    /// Number of inserted items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when nothing has been inserted since the last reset.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item stored under `index`.
    pub fn item(&self, index: usize) -> Option<&BarRect> {
        self.items.get(index)
    }

    /// Inserts a bar and returns its index.
    pub fn add(&mut self, bar: BarRect) -> usize {
        let index = self.items.len();
        self.items.push(bar);
        self.insert(0, index);
        index
    }

    fn insert(&mut self, node: usize, item: usize) {
        let rect = self.items[item].rect;
        if let Some(children) = self.nodes[node].children {
            let hit = self.nodes[node].quads(rect);
            for (child, hit) in children.into_iter().zip(hit) {
                if hit {
                    self.insert(child, item);
                }
            }
            return;
        }

        self.nodes[node].items.push(item);
        if self.nodes[node].items.len() > MAX_OBJECTS && self.nodes[node].level < MAX_LEVELS {
            self.split(node);
            let items = core::mem::take(&mut self.nodes[node].items);
            for item in items {
                self.insert(node, item);
            }
        }
    }

    fn split(&mut self, node: usize) {
        let Node { bounds, level, .. } = self.nodes[node];
        let w = bounds.width() / 2.0;
        let h = bounds.height() / 2.0;
        let (x, y) = (bounds.x0, bounds.y0);
        let quads = [
            Rect::new(x + w, y, x + 2.0 * w, y + h),
            Rect::new(x, y, x + w, y + h),
            Rect::new(x, y + h, x + w, y + 2.0 * h),
            Rect::new(x + w, y + h, x + 2.0 * w, y + 2.0 * h),
        ];
        let first = self.nodes.len();
        for q in quads {
            self.nodes.push(Node::new(q, level + 1));
        }
        self.nodes[node].children = Some([first, first + 1, first + 2, first + 3]);
    }

    /// Visits every item that may overlap `region`, possibly more than once.
    pub fn query(&self, region: Rect, mut visit: impl FnMut(usize, &BarRect)) {
        self.query_node(0, region, &mut visit);
    }

    fn query_node(&self, node: usize, region: Rect, visit: &mut impl FnMut(usize, &BarRect)) {
        let n = &self.nodes[node];
        for &item in &n.items {
            visit(item, &self.items[item]);
        }
        if let Some(children) = n.children {
            let hit = n.quads(region);
            for (child, hit) in children.into_iter().zip(hit) {
                if hit {
                    self.query_node(child, region, visit);
                }
            }
        }
    }

    /// Returns the last-found item containing `p`, probing a 1×1 region.
    pub fn hit(&self, p: Point) -> Option<usize> {
        let mut found = None;
        self.query(Rect::new(p.x, p.y, p.x + 1.0, p.y + 1.0), |index, bar| {
            if point_within(p, bar.rect) {
                found = Some(index);
            }
        });
        found
    }
}
