use std::collections::HashMap;

use crate::model::{FlowEdgeType, FlowNodeLayout, SceneType};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned box, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap; boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Position of every known scene, in insertion order.
///
/// Explicit entries come first in their stored order, then synthesized
/// entries in scene order, matching the list handed back to the document
/// after a drag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedLayout {
    entries: Vec<FlowNodeLayout>,
    index: HashMap<String, usize>,
}

impl ResolvedLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `entry.scene_id`, keeping its slot.
    pub fn insert(&mut self, entry: FlowNodeLayout) {
        match self.index.get(&entry.scene_id) {
            Some(&idx) => self.entries[idx] = entry,
            None => {
                self.index.insert(entry.scene_id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, scene_id: &str) -> Option<Point> {
        self.index
            .get(scene_id)
            .map(|&idx| Point::new(self.entries[idx].x, self.entries[idx].y))
    }

    pub fn contains(&self, scene_id: &str) -> bool {
        self.index.contains_key(scene_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FlowNodeLayout] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FlowNodeLayout> {
        self.entries
    }
}

impl FromIterator<FlowNodeLayout> for ResolvedLayout {
    fn from_iter<I: IntoIterator<Item = FlowNodeLayout>>(iter: I) -> Self {
        let mut layout = ResolvedLayout::new();
        for entry in iter {
            layout.insert(entry);
        }
        layout
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeBox {
    pub scene_id: String,
    pub title: String,
    pub kind: SceneType,
    pub chapter: Option<String>,
    pub rect: Rect,
}

/// Drawable edge: centre-to-centre segment between two resolved scenes.
#[derive(Debug, Clone)]
pub struct EdgeView {
    pub edge_id: String,
    pub from: Point,
    pub to: Point,
    pub kind: FlowEdgeType,
    pub label: Option<String>,
    pub label_anchor: Point,
}

/// Everything a renderer needs for one frame: node boxes in scene order
/// and the drawable edges with their label anchors.
#[derive(Debug, Clone)]
pub struct FlowView {
    pub nodes: Vec<NodeBox>,
    pub edges: Vec<EdgeView>,
    /// Smallest box holding every node and edge label, in model space.
    pub bounds: Rect,
    /// Chapter names in palette order.
    pub chapters: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(a.intersects(&Rect::new(9.5, 9.5, 10.0, 10.0)));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut layout = ResolvedLayout::new();
        layout.insert(FlowNodeLayout::new("a", 0.0, 0.0));
        layout.insert(FlowNodeLayout::new("b", 1.0, 1.0));
        layout.insert(FlowNodeLayout::new("a", 5.0, 6.0));
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.entries()[0].scene_id, "a");
        assert_eq!(layout.get("a"), Some(Point::new(5.0, 6.0)));
    }
}
