use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use scenario_flow::config::{FlowConfig, RenderConfig};
use scenario_flow::layout::{auto_layout, compute_flow_view, resolve_layout};
use scenario_flow::model::{FlowEdge, FlowEdgeType, Scenario, Scene, SceneType};
use scenario_flow::render::render_svg;
use scenario_flow::theme::Theme;
use std::hint::black_box;

/// A chain of `scenes` with `extra_edges` forward skips and a back edge
/// every ten scenes, roughly what a long campaign looks like.
fn dense_scenario(scenes: usize, extra_edges: usize) -> Scenario {
    let mut scenario = Scenario::default();
    for i in 0..scenes {
        let mut scene = Scene::new(format!("s{i}"), format!("Scene {i}"), SceneType::Investigation);
        scene.chapter = Some(format!("Chapter {}", i / 12));
        scenario.scenes.push(scene);
    }
    let mut push = |from: usize, to: usize, kind: FlowEdgeType| {
        let id = format!("e{}", scenario.flow_edges.len());
        scenario.flow_edges.push(FlowEdge {
            id,
            from: format!("s{from}"),
            to: format!("s{to}"),
            kind,
            condition: (from % 3 == 0).then(|| format!("clue {from}")),
            note: None,
        });
    };
    for i in 0..scenes.saturating_sub(1) {
        push(i, i + 1, FlowEdgeType::Normal);
    }
    let mut count = 0usize;
    'outer: for i in 0..scenes {
        for j in (i + 2)..scenes {
            if count >= extra_edges {
                break 'outer;
            }
            push(i, j, FlowEdgeType::Optional);
            count += 1;
        }
    }
    for i in (10..scenes).step_by(10) {
        push(i, i - 7, FlowEdgeType::BadEnd);
    }
    scenario
}

fn bench_auto_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("auto_layout");
    let config = FlowConfig::default();
    for (scenes, extra_edges) in [(12usize, 6usize), (40, 80), (80, 320), (200, 600)] {
        let name = format!("dense_{}_{}", scenes, extra_edges);
        let scenario = dense_scenario(scenes, extra_edges);
        group.bench_with_input(BenchmarkId::from_parameter(name), &scenario, |b, s| {
            b.iter(|| {
                let layout = auto_layout(black_box(&s.scenes), black_box(&s.flow_edges), &config);
                black_box(layout.len());
            });
        });
    }
    group.finish();
}

fn bench_flow_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("flow_view");
    let config = FlowConfig::default();
    for (scenes, extra_edges) in [(40usize, 80usize), (80, 320)] {
        let name = format!("dense_{}_{}", scenes, extra_edges);
        let mut scenario = dense_scenario(scenes, extra_edges);
        scenario.flow_layout = auto_layout(&scenario.scenes, &scenario.flow_edges, &config);
        group.bench_with_input(BenchmarkId::from_parameter(name), &scenario, |b, s| {
            b.iter(|| {
                let layout = resolve_layout(&s.scenes, &s.flow_layout, &config);
                let view = compute_flow_view(&s.scenes, &s.flow_edges, &layout, &config);
                black_box(view.edges.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let theme = Theme::editor();
    let config = FlowConfig::default();
    let render_cfg = RenderConfig::default();
    for (scenes, extra_edges) in [(12usize, 6usize), (80, 320)] {
        let name = format!("dense_{}_{}", scenes, extra_edges);
        let scenario = dense_scenario(scenes, extra_edges);
        group.bench_with_input(BenchmarkId::from_parameter(name), &scenario, |b, s| {
            b.iter(|| {
                let entries = auto_layout(&s.scenes, &s.flow_edges, &config);
                let layout = resolve_layout(&s.scenes, &entries, &config);
                let view = compute_flow_view(&s.scenes, &s.flow_edges, &layout, &config);
                let svg = render_svg(&view, &theme, &config, &render_cfg);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_auto_layout, bench_flow_view, bench_end_to_end);
criterion_main!(benches);
