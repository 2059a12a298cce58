use std::collections::{HashMap, HashSet};
use std::path::Path;

use scenario_flow::config::RenderConfig;
use scenario_flow::layout_dump::LayoutDump;
use scenario_flow::storage::load_scenario;
use scenario_flow::{
    FlowConfig, Scenario, Theme, auto_layout, compute_flow_view, render_svg, resolve_layout,
    scenario_flow_view,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

fn load_fixture(name: &str) -> Scenario {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    load_scenario(&path).expect("fixture should load")
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    for name in ["foggy_harbor.json", "tangled.json"] {
        let scenario = load_fixture(name);
        let config = FlowConfig::default();
        let view = scenario_flow_view(&scenario, &config);
        let svg = render_svg(&view, &Theme::editor(), &config, &RenderConfig::default());
        assert_valid_svg(&svg, name);
        assert_eq!(svg.matches("class=\"node\"").count(), scenario.scenes.len(), "{name}");
    }
}

#[test]
fn auto_layout_keeps_minimum_gap_within_levels() {
    let scenario = load_fixture("foggy_harbor.json");
    let config = FlowConfig::default();
    let layout = auto_layout(&scenario.scenes, &scenario.flow_edges, &config);

    let mut columns: HashMap<i64, Vec<f64>> = HashMap::new();
    for entry in &layout {
        columns.entry(entry.x as i64).or_default().push(entry.y);
    }
    for ys in columns.values_mut() {
        ys.sort_by(f64::total_cmp);
        for pair in ys.windows(2) {
            assert!(pair[1] - pair[0] >= config.min_level_gap() - 1e-9, "{ys:?}");
        }
    }

    let x_of = |id: &str| layout.iter().find(|e| e.scene_id == id).unwrap().x;
    assert_eq!(x_of("scene-intro"), 0.0);
    assert_eq!(x_of("scene-archive"), 280.0);
    assert_eq!(x_of("scene-roof"), 560.0);
    assert_eq!(x_of("scene-dawn"), 840.0);
}

#[test]
fn cyclic_and_dangling_input_still_lays_out_every_scene() {
    let scenario = load_fixture("tangled.json");
    let config = FlowConfig::default();
    let first = auto_layout(&scenario.scenes, &scenario.flow_edges, &config);
    let second = auto_layout(&scenario.scenes, &scenario.flow_edges, &config);
    assert_eq!(first, second);

    let ids: HashSet<&str> = first.iter().map(|e| e.scene_id.as_str()).collect();
    assert_eq!(first.len(), scenario.scenes.len());
    assert_eq!(ids.len(), scenario.scenes.len());
    assert!(!ids.contains("ghost") && !ids.contains("vanished"));
}

#[test]
fn fallback_fills_gaps_without_moving_explicit_entries() {
    let scenario = load_fixture("foggy_harbor.json");
    let config = FlowConfig::default();
    let resolved = resolve_layout(&scenario.scenes, &scenario.flow_layout, &config);
    assert_eq!(resolved.len(), 4);
    assert_eq!(&resolved.entries()[..2], &scenario.flow_layout[..]);
    let roof = resolved.get("scene-roof").unwrap();
    let dawn = resolved.get("scene-dawn").unwrap();
    assert_eq!((roof.x, roof.y), (0.0, 0.0));
    assert_eq!((dawn.x, dawn.y), (200.0, 0.0));
}

#[test]
fn dangling_edges_are_skipped_not_removed() {
    let scenario = load_fixture("tangled.json");
    let config = FlowConfig::default();
    let layout = resolve_layout(&scenario.scenes, &scenario.flow_layout, &config);
    let view = compute_flow_view(&scenario.scenes, &scenario.flow_edges, &layout, &config);
    let drawn: Vec<&str> = view.edges.iter().map(|e| e.edge_id.as_str()).collect();
    assert_eq!(drawn, vec!["e1", "e2", "e3"]);
    assert_eq!(scenario.flow_edges.len(), 5);
    let dump = serde_json::to_value(LayoutDump::from_view(&view)).unwrap();
    assert_eq!(dump["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(dump["edges"].as_array().unwrap().len(), 3);
}

#[test]
fn labels_never_overlap_nodes_when_a_free_slot_exists() {
    let scenario = load_fixture("foggy_harbor.json");
    let config = FlowConfig::default();
    let entries = auto_layout(&scenario.scenes, &scenario.flow_edges, &config);
    let layout = resolve_layout(&scenario.scenes, &entries, &config);
    let view = compute_flow_view(&scenario.scenes, &scenario.flow_edges, &layout, &config);

    for edge in view.edges.iter().filter(|e| e.label.is_some()) {
        let label = scenario_flow::layout::Rect::centered(
            edge.label_anchor,
            config.label_width,
            config.label_height,
        );
        let mid_x = (edge.from.x + edge.to.x) / 2.0;
        let mid_y = (edge.from.y + edge.to.y) / 2.0;
        let at_midpoint = (edge.label_anchor.x - mid_x).abs() < 1e-9
            && (edge.label_anchor.y - mid_y).abs() < 1e-9;
        if !at_midpoint {
            assert!(
                view.nodes.iter().all(|n| !label.intersects(&n.rect)),
                "label of {} overlaps a node",
                edge.edge_id
            );
        }
    }
}

#[test]
fn unlisted_scene_chapters_still_get_a_colour() {
    let scenario = scenario_flow::storage::parse_scenario(
        r#"{
            "meta": {"title": "Two Acts"},
            "chapters": ["Act I"],
            "scenes": [
                {"id": "a", "title": "Opening", "chapter": "Act I"},
                {"id": "b", "title": "Turn", "chapter": "Act II"}
            ],
            "flowEdges": [{"id": "e1", "from": "a", "to": "b", "type": "normal"}]
        }"#,
    )
    .expect("document should import");
    let config = FlowConfig::default();
    let view = scenario_flow_view(&scenario, &config);
    assert_eq!(view.chapters, vec!["Act I", "Act II"]);
    let theme = Theme::editor();
    for node in &view.nodes {
        let chapter = node.chapter.as_deref().unwrap();
        assert!(theme.chapter_color(&view.chapters, chapter).is_some(), "{chapter}");
    }
}
