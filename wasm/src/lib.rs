use scenario_flow::DamageBonus;
use scenario_flow::config::{FlowConfig, RenderConfig};
use scenario_flow::layout::{Point, auto_layout, resolve_layout, scenario_flow_view};
use scenario_flow::model::{NpcStats, Scenario};
use scenario_flow::render::{render_svg, render_svg_with_transform};
use scenario_flow::storage::parse_scenario;
use scenario_flow::theme::Theme;
use scenario_flow::viewport::Transform;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    /// Live view transform; when absent the SVG is fitted to the graph.
    offset_x: Option<f64>,
    offset_y: Option<f64>,
    scale: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn build_theme(options: &FlowRenderOptions) -> Theme {
    let mut theme = match options.theme.as_deref() {
        Some("highContrast") | Some("high-contrast") => Theme::high_contrast(),
        _ => Theme::editor(),
    };
    if let Some(font_family) = &options.font_family {
        theme.font_family = font_family.clone();
    }
    if let Some(font_size) = options.font_size {
        theme.font_size = font_size;
    }
    theme
}

fn render_scenario(scenario: &Scenario, options: &FlowRenderOptions) -> String {
    let config = FlowConfig::default();
    let theme = build_theme(options);
    let view = scenario_flow_view(scenario, &config);
    match options.scale {
        Some(scale) => {
            let (default_x, default_y) = config.viewport.default_offset;
            let scale = scale.clamp(config.viewport.min_scale, config.viewport.max_scale);
            let transform = Transform::new(
                Point::new(
                    options.offset_x.unwrap_or(default_x),
                    options.offset_y.unwrap_or(default_y),
                ),
                scale,
            );
            let width = options.width.unwrap_or(1200.0);
            let height = options.height.unwrap_or(800.0);
            render_svg_with_transform(&view, &theme, &config, &transform, width, height)
        }
        None => render_svg(&view, &theme, &config, &RenderConfig::default()),
    }
}

/// Fresh layered layout for every scene of a scenario document.
#[wasm_bindgen]
pub fn auto_layout_json(scenario_json: &str) -> Result<String, JsValue> {
    let scenario = parse_scenario(scenario_json).map_err(to_js)?;
    let layout = auto_layout(&scenario.scenes, &scenario.flow_edges, &FlowConfig::default());
    serde_json::to_string(&layout).map_err(to_js)
}

/// Stored layout completed with grid positions for unplaced scenes.
#[wasm_bindgen]
pub fn resolve_layout_json(scenario_json: &str) -> Result<String, JsValue> {
    let scenario = parse_scenario(scenario_json).map_err(to_js)?;
    let config = FlowConfig::default();
    let resolved = resolve_layout(&scenario.scenes, &scenario.flow_layout, &config);
    serde_json::to_string(resolved.entries()).map_err(to_js)
}

#[wasm_bindgen]
pub fn render_flow_svg(
    scenario_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<FlowRenderOptions>(&raw_options).map_err(to_js)?
    } else {
        FlowRenderOptions::default()
    };
    let scenario = parse_scenario(scenario_json).map_err(to_js)?;
    Ok(render_scenario(&scenario, &options))
}

/// Damage bonus label for a stat block, `undefined` when it cannot be derived.
#[wasm_bindgen]
pub fn damage_bonus(stats_json: Option<String>) -> Result<Option<String>, JsValue> {
    let stats = match stats_json {
        Some(raw) => Some(serde_json::from_str::<NpcStats>(&raw).map_err(to_js)?),
        None => None,
    };
    Ok(scenario_flow::damage_bonus(stats.as_ref()).map(|bonus| bonus.to_string()))
}

#[wasm_bindgen]
pub fn merge_damage(damage: &str, bonus: Option<String>) -> Option<String> {
    let bonus = bonus.as_deref().and_then(DamageBonus::from_label);
    scenario_flow::merge_damage(damage, bonus)
}
