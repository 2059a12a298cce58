// Edge label placement: nudge the label off the edge midpoint along the
// edge normal until it clears every node box.

use super::types::{NodeBox, Point, Rect};
use crate::config::FlowConfig;

/// Unit normal to the left of the `from -> to` direction.
fn left_normal(from: Point, to: Point) -> Point {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = dx.hypot(dy);
    let len = if len == 0.0 { 1.0 } else { len };
    Point::new(-dy / len, dx / len)
}

fn hits_any_node(label: &Rect, nodes: &[NodeBox]) -> bool {
    nodes.iter().any(|node| label.intersects(&node.rect))
}

/// Anchor (label centre) for the label of an edge between two node boxes.
///
/// Candidates are tried in `config.label_offsets` order along the normal;
/// the first whose label box overlaps no node wins. When all overlap, the
/// plain midpoint is returned.
pub fn place_edge_label(from: &Rect, to: &Rect, nodes: &[NodeBox], config: &FlowConfig) -> Point {
    let start = from.center();
    let end = to.center();
    let mid = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    let normal = left_normal(start, end);

    config
        .label_offsets
        .iter()
        .map(|offset| Point::new(mid.x + normal.x * offset, mid.y + normal.y * offset))
        .find(|candidate| {
            let label = Rect::centered(*candidate, config.label_width, config.label_height);
            !hits_any_node(&label, nodes)
        })
        .unwrap_or(mid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, x: f64, y: f64) -> NodeBox {
        NodeBox {
            scene_id: id.to_string(),
            rect: Rect::new(x, y, 140.0, 60.0),
            ..Default::default()
        }
    }

    #[test]
    fn first_clear_offset_wins() {
        let config = FlowConfig::default();
        let a = node("a", 0.0, 0.0);
        let b = node("b", 560.0, 0.0);
        let nodes = vec![a.clone(), b.clone()];
        let anchor = place_edge_label(&a.rect, &b.rect, &nodes, &config);
        // Horizontal edge: the left normal points down (+y).
        assert_eq!(anchor, Point::new(350.0, 46.0));
    }

    #[test]
    fn skips_offsets_blocked_by_a_node() {
        let config = FlowConfig::default();
        let a = node("a", 0.0, 0.0);
        let b = node("b", 560.0, 0.0);
        let blocker = node("c", 280.0, 50.0);
        let nodes = vec![a.clone(), b.clone(), blocker];
        let anchor = place_edge_label(&a.rect, &b.rect, &nodes, &config);
        assert_eq!(anchor, Point::new(350.0, 14.0));
    }

    #[test]
    fn falls_back_to_midpoint_when_boxed_in() {
        let config = FlowConfig::default();
        let a = node("a", 0.0, 0.0);
        let b = node("b", 0.0, 0.0);
        let nodes = vec![a.clone(), b.clone()];
        // Zero-length edge sitting inside a node: every candidate overlaps.
        let anchor = place_edge_label(&a.rect, &b.rect, &nodes, &config);
        assert_eq!(anchor, Point::new(70.0, 30.0));
    }
}
