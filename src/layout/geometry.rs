// Pixel geometry: flex layout of leaves and the 9-zone drop hit test.

use serde::{Deserialize, Serialize};

use super::drop::DropDirection;
use super::{FlexDirection, LayoutNode, NodeId};
use crate::config::DropZoneConfig;

/// A rectangle in physical pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point (px, py) is inside this rectangle.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Center point of this rectangle.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Calculate rects for all visible leaves of `node` inside `bounds`.
///
/// Children split their parent's extent along its flex direction in
/// proportion to their sizes. Hidden nodes take no space.
pub fn compute_layout<T>(node: &LayoutNode<T>, bounds: Rect) -> Vec<(NodeId, Rect)> {
    let mut out = Vec::new();
    if node.visible {
        layout_into(node, bounds, &mut out);
    }
    out
}

fn layout_into<T>(node: &LayoutNode<T>, bounds: Rect, out: &mut Vec<(NodeId, Rect)>) {
    if node.is_leaf() {
        out.push((node.id, bounds));
        return;
    }
    let visible: Vec<&LayoutNode<T>> = node.children().iter().filter(|c| c.visible).collect();
    let total: f32 = visible.iter().map(|c| c.size.max(0.0)).sum();
    if visible.is_empty() {
        return;
    }

    let extent = match node.flex_direction {
        FlexDirection::Row => bounds.width,
        FlexDirection::Column => bounds.height,
    };
    let mut offset = 0.0;
    for (i, child) in visible.iter().enumerate() {
        let span = if i + 1 == visible.len() {
            // Last child takes the remainder so rounding never leaves a gap.
            extent - offset
        } else if total > 0.0 {
            extent * child.size.max(0.0) / total
        } else {
            extent / visible.len() as f32
        };
        let child_bounds = match node.flex_direction {
            FlexDirection::Row => Rect::new(bounds.x + offset, bounds.y, span, bounds.height),
            FlexDirection::Column => Rect::new(bounds.x, bounds.y + offset, bounds.width, span),
        };
        layout_into(child, child_bounds, out);
        offset += span;
    }
}

/// Classify a pointer position over a drop target into one of nine zones.
///
/// The middle box (sized by `center_fraction`) is Center. The rest of the rect
/// is cut along both diagonals into Top/Right/Bottom/Left; within
/// `outer_fraction` of an edge the Outer variant is returned. Points outside
/// the rect (with the same edge rules as `Rect::contains_point`) or exactly
/// on a diagonal yield None.
pub fn determine_drop_direction(rect: Rect, px: f32, py: f32, zones: &DropZoneConfig) -> Option<DropDirection> {
    let (w, h) = (rect.width, rect.height);
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let x = px - rect.x;
    let y = py - rect.y;
    if x < 0.0 || y < 0.0 || x >= w || y >= h {
        return None;
    }

    let lo = (1.0 - zones.center_fraction) / 2.0;
    let hi = 1.0 - lo;
    if x > w * lo && x < w * hi && y > h * lo && y < h * hi {
        return Some(DropDirection::Center);
    }

    // Signs against the main (top-left to bottom-right) and anti diagonals.
    let below_main = y * w - x * h;
    let below_anti = y * w + x * h - h * w;
    if below_main == 0.0 || below_anti == 0.0 {
        return None;
    }
    let edge = match (below_main > 0.0, below_anti > 0.0) {
        (false, false) => DropDirection::Top,
        (false, true) => DropDirection::Right,
        (true, true) => DropDirection::Bottom,
        (true, false) => DropDirection::Left,
    };

    let band = zones.outer_fraction;
    let in_outer_band = x < w * band || x > w * (1.0 - band) || y < h * band || y > h * (1.0 - band);
    if in_outer_band {
        Some(edge.to_outer())
    } else {
        Some(edge)
    }
}
