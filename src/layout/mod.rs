mod fallback;
pub(crate) mod label_placement;
mod ranking;
pub(crate) mod types;
pub use fallback::resolve_layout;
pub use label_placement::place_edge_label;
pub use types::*;

use std::collections::HashMap;

use crate::config::FlowConfig;
use crate::model::{FlowEdge, FlowNodeLayout, Scenario, Scene};
use ranking::*;

/// Layered left-to-right layout computed from the edge set alone.
///
/// Existing positions are ignored. Returns exactly one entry per scene,
/// ordered by level and then by vertical position. Edges may form cycles or
/// name unknown scenes; the result is deterministic either way.
pub fn auto_layout(
    scenes: &[Scene],
    edges: &[FlowEdge],
    config: &FlowConfig,
) -> Vec<FlowNodeLayout> {
    let index = DependencyIndex::build(scenes, edges);
    let levels = compute_levels(&index);
    let mut groups = group_levels(&index, &levels);
    let mut order = order_levels(&index, &mut groups, config.min_level_gap());
    resolve_level_collisions(&mut groups, &mut order, config.min_level_gap());

    tracing::debug!(
        scenes = index.scene_count(),
        levels = groups.len(),
        "auto layout"
    );

    let mut layout = Vec::with_capacity(index.scene_count());
    for (level, group) in &groups {
        let x = *level as f64 * config.level_spacing;
        for &slot in group {
            layout.push(FlowNodeLayout::new(index.id(slot), x, order[slot]));
        }
    }
    layout
}

fn node_rect(position: Point, config: &FlowConfig) -> Rect {
    Rect::new(position.x, position.y, config.node_width, config.node_height)
}

fn union(bounds: Option<Rect>, rect: Rect) -> Rect {
    match bounds {
        None => rect,
        Some(b) => {
            let x = b.x.min(rect.x);
            let y = b.y.min(rect.y);
            let right = (b.x + b.width).max(rect.x + rect.width);
            let bottom = (b.y + b.height).max(rect.y + rect.height);
            Rect::new(x, y, right - x, bottom - y)
        }
    }
}

/// Resolve node boxes, drawable edges and label anchors for one render.
///
/// Edges whose endpoints are not both positioned scenes are skipped, not
/// removed.
pub fn compute_flow_view(
    scenes: &[Scene],
    edges: &[FlowEdge],
    layout: &ResolvedLayout,
    config: &FlowConfig,
) -> FlowView {
    let nodes: Vec<NodeBox> = scenes
        .iter()
        .filter_map(|scene| {
            let position = layout.get(&scene.id)?;
            Some(NodeBox {
                scene_id: scene.id.clone(),
                title: scene.title.clone(),
                kind: scene.kind,
                chapter: scene.chapter.clone().filter(|c| !c.is_empty()),
                rect: node_rect(position, config),
            })
        })
        .collect();

    let mut bounds = nodes
        .iter()
        .map(|node| node.rect)
        .reduce(|acc, rect| union(Some(acc), rect));

    // Only scene ids count as endpoints; stray layout entries do not.
    let positions: HashMap<&str, Point> = nodes
        .iter()
        .map(|node| (node.scene_id.as_str(), Point::new(node.rect.x, node.rect.y)))
        .collect();

    let mut views = Vec::with_capacity(edges.len());
    for edge in edges {
        let endpoints = (positions.get(edge.from.as_str()), positions.get(edge.to.as_str()));
        let (Some(&from), Some(&to)) = endpoints else {
            tracing::debug!(
                edge = %edge.id,
                from = %edge.from,
                to = %edge.to,
                "skipping dangling edge"
            );
            continue;
        };
        let from_rect = node_rect(from, config);
        let to_rect = node_rect(to, config);
        let label = edge.label_text().map(str::to_string);
        let label_anchor = place_edge_label(&from_rect, &to_rect, &nodes, config);
        if label.is_some() {
            let label_rect =
                Rect::centered(label_anchor, config.label_width, config.label_height);
            bounds = Some(union(bounds, label_rect));
        }
        views.push(EdgeView {
            edge_id: edge.id.clone(),
            from: from_rect.center(),
            to: to_rect.center(),
            kind: edge.kind,
            label,
            label_anchor,
        });
    }

    let mut chapters: Vec<String> = Vec::new();
    for chapter in nodes.iter().filter_map(|node| node.chapter.as_ref()) {
        if !chapters.contains(chapter) {
            chapters.push(chapter.clone());
        }
    }

    FlowView {
        nodes,
        edges: views,
        bounds: bounds
            .unwrap_or_else(|| Rect::new(0.0, 0.0, config.node_width, config.node_height)),
        chapters,
    }
}

/// Flow view of a whole document: stored layout completed by the grid
/// fallback, chapters coloured in the document's chapter order.
pub fn scenario_flow_view(scenario: &Scenario, config: &FlowConfig) -> FlowView {
    let layout = resolve_layout(&scenario.scenes, &scenario.flow_layout, config);
    let mut view = compute_flow_view(&scenario.scenes, &scenario.flow_edges, &layout, config);
    if !scenario.chapters.is_empty() {
        view.chapters = scenario.chapters.clone();
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SceneType;

    fn scene(id: &str) -> Scene {
        Scene::new(id, id.to_uppercase(), SceneType::Investigation)
    }

    fn edge(id: &str, from: &str, to: &str) -> FlowEdge {
        FlowEdge {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            condition: Some(format!("{from} done")),
            ..Default::default()
        }
    }

    #[test]
    fn layout_places_levels_left_to_right() {
        let scenes = vec![scene("intro"), scene("library"), scene("rooftop")];
        let edges = vec![edge("e1", "intro", "library"), edge("e2", "library", "rooftop")];
        let layout = auto_layout(&scenes, &edges, &FlowConfig::default());
        let xs: Vec<(String, f64, f64)> = layout
            .iter()
            .map(|entry| (entry.scene_id.clone(), entry.x, entry.y))
            .collect();
        assert_eq!(
            xs,
            vec![
                ("intro".to_string(), 0.0, 0.0),
                ("library".to_string(), 280.0, 0.0),
                ("rooftop".to_string(), 560.0, 0.0),
            ]
        );
    }

    #[test]
    fn siblings_are_centered_around_zero() {
        let scenes = vec![scene("a"), scene("b"), scene("c")];
        let edges = vec![edge("e1", "a", "b"), edge("e2", "a", "c")];
        let layout = auto_layout(&scenes, &edges, &FlowConfig::default());
        assert_eq!(layout[1].y, -65.0);
        assert_eq!(layout[2].y, 65.0);
    }

    #[test]
    fn empty_graph_yields_empty_layout() {
        assert!(auto_layout(&[], &[], &FlowConfig::default()).is_empty());
    }

    #[test]
    fn flow_view_skips_dangling_edges() {
        let config = FlowConfig::default();
        let scenes = vec![scene("a"), scene("b")];
        let edges = vec![edge("e1", "a", "b"), edge("e2", "a", "gone")];
        let layout = resolve_layout(&scenes, &[], &config);
        let view = compute_flow_view(&scenes, &edges, &layout, &config);
        assert_eq!(view.nodes.len(), 2);
        assert_eq!(view.edges.len(), 1);
        assert_eq!(view.edges[0].edge_id, "e1");
        assert_eq!(view.edges[0].label.as_deref(), Some("a done"));
        assert!(view.bounds.width >= 340.0);
    }

    #[test]
    fn document_chapters_drive_palette_order() {
        let config = FlowConfig::default();
        let mut scenario = Scenario::default();
        let mut first = scene("a");
        first.chapter = Some("Act II".to_string());
        let mut second = scene("b");
        second.chapter = Some("Act I".to_string());
        scenario.scenes = vec![first, second];

        let view = scenario_flow_view(&scenario, &config);
        assert_eq!(view.chapters, vec!["Act II", "Act I"]);

        scenario.chapters = vec!["Act I".to_string(), "Act II".to_string()];
        let view = scenario_flow_view(&scenario, &config);
        assert_eq!(view.chapters, vec!["Act I", "Act II"]);
        assert_eq!(view.nodes[0].title, "A");
    }
}
