use super::types::ResolvedLayout;
use crate::config::FlowConfig;
use crate::model::{FlowNodeLayout, Scene};

/// Complete a sparse layout with grid slots for scenes that have none.
///
/// Explicit entries are copied unchanged. Missing scenes take consecutive
/// grid cells in document order, `grid_columns` per row. Fallback cells are
/// not checked against explicit positions and may coincide with one.
pub fn resolve_layout(
    scenes: &[Scene],
    layout: &[FlowNodeLayout],
    config: &FlowConfig,
) -> ResolvedLayout {
    let mut resolved: ResolvedLayout = layout.iter().cloned().collect();
    let (pitch_x, pitch_y) = config.grid_pitch();
    let columns = config.grid_columns.max(1);

    let fallback: Vec<FlowNodeLayout> = scenes
        .iter()
        .filter(|scene| !resolved.contains(&scene.id))
        .enumerate()
        .map(|(slot, scene)| {
            let col = (slot % columns) as f64;
            let row = (slot / columns) as f64;
            FlowNodeLayout::new(scene.id.clone(), col * pitch_x, row * pitch_y)
        })
        .collect();

    if !fallback.is_empty() {
        tracing::debug!(count = fallback.len(), "synthesized fallback positions");
    }
    for entry in fallback {
        resolved.insert(entry);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;
    use crate::model::SceneType;

    fn scenes(n: usize) -> Vec<Scene> {
        (0..n)
            .map(|i| Scene::new(format!("s{i}"), format!("Scene {i}"), SceneType::Etc))
            .collect()
    }

    #[test]
    fn fills_grid_left_to_right_then_down() {
        let resolved = resolve_layout(&scenes(6), &[], &FlowConfig::default());
        assert_eq!(resolved.get("s0"), Some(Point::new(0.0, 0.0)));
        assert_eq!(resolved.get("s3"), Some(Point::new(600.0, 0.0)));
        assert_eq!(resolved.get("s4"), Some(Point::new(0.0, 120.0)));
        assert_eq!(resolved.get("s5"), Some(Point::new(200.0, 120.0)));
    }

    #[test]
    fn explicit_entries_pass_through_first() {
        let explicit = vec![FlowNodeLayout::new("s1", 33.0, -7.0)];
        let resolved = resolve_layout(&scenes(3), &explicit, &FlowConfig::default());
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved.entries()[0], explicit[0]);
        assert_eq!(resolved.get("s0"), Some(Point::new(0.0, 0.0)));
        assert_eq!(resolved.get("s2"), Some(Point::new(200.0, 0.0)));
    }

    #[test]
    fn fallback_cells_skip_explicit_scenes() {
        let explicit = vec![FlowNodeLayout::new("s1", 0.0, 0.0)];
        let resolved = resolve_layout(&scenes(6), &explicit, &FlowConfig::default());
        assert_eq!(resolved.get("s4"), Some(Point::new(600.0, 0.0)));
        assert_eq!(resolved.get("s5"), Some(Point::new(0.0, 120.0)));
        // Accepted overlap between an explicit entry and a fallback cell.
        assert_eq!(resolved.get("s0"), resolved.get("s1"));
    }
}
