use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

const LABEL_OFFSETS: [f64; 8] = [16.0, -16.0, 28.0, -28.0, 40.0, -40.0, 56.0, -56.0];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Extra vertical room left for edge labels between stacked nodes.
    pub label_allowance: f64,
    pub level_spacing: f64,
    pub grid_gap: f64,
    pub grid_columns: usize,
    pub label_width: f64,
    pub label_height: f64,
    pub label_offsets: Vec<f64>,
    pub viewport: ViewportConfig,
}

impl FlowConfig {
    /// Minimum vertical distance between two scenes of one level.
    pub fn min_level_gap(&self) -> f64 {
        self.node_height + self.label_allowance
    }

    pub fn grid_pitch(&self) -> (f64, f64) {
        (
            self.node_width + self.grid_gap,
            self.node_height + self.grid_gap,
        )
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            node_width: 140.0,
            node_height: 60.0,
            label_allowance: 70.0,
            level_spacing: 280.0,
            grid_gap: 60.0,
            grid_columns: 4,
            label_width: 160.0,
            label_height: 44.0,
            label_offsets: LABEL_OFFSETS.to_vec(),
            viewport: ViewportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_step: f64,
    pub default_offset: (f64, f64),
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.6,
            max_scale: 2.0,
            zoom_step: 0.1,
            default_offset: (10.0, 10.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    /// Space around the diagram in the SVG viewBox.
    pub margin: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
            margin: 60.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub flow: FlowConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::editor();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            flow: FlowConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    flow: Option<FlowConfigFile>,
    viewport: Option<ViewportConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    node_fill: Option<String>,
    node_border: Option<String>,
    title_color: Option<String>,
    muted_text_color: Option<String>,
    arrow_color: Option<String>,
    edge_label_background: Option<String>,
    edge_label_border: Option<String>,
    edge_normal: Option<String>,
    edge_optional: Option<String>,
    edge_bad_end: Option<String>,
    chapter_palette: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowConfigFile {
    node_width: Option<f64>,
    node_height: Option<f64>,
    label_allowance: Option<f64>,
    level_spacing: Option<f64>,
    grid_gap: Option<f64>,
    grid_columns: Option<usize>,
    label_width: Option<f64>,
    label_height: Option<f64>,
    label_offsets: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewportConfigFile {
    min_scale: Option<f64>,
    max_scale: Option<f64>,
    zoom_step: Option<f64>,
    default_offset_x: Option<f64>,
    default_offset_y: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    margin: Option<f64>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse a config file (JSON, or JSON5 as a fallback) onto the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents).map_err(|_| json_err)?,
    };
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "editor" | "default" => config.theme = Theme::editor(),
            "highContrast" | "high-contrast" => config.theme = Theme::high_contrast(),
            other => tracing::warn!(theme = other, "unknown theme name, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.title_color {
            config.theme.title_color = v;
        }
        if let Some(v) = vars.muted_text_color {
            config.theme.muted_text_color = v;
        }
        if let Some(v) = vars.arrow_color {
            config.theme.arrow_color = v;
        }
        if let Some(v) = vars.edge_label_background {
            config.theme.edge_label_background = v;
        }
        if let Some(v) = vars.edge_label_border {
            config.theme.edge_label_border = v;
        }
        if let Some(v) = vars.edge_normal {
            config.theme.edge_normal = v;
        }
        if let Some(v) = vars.edge_optional {
            config.theme.edge_optional = v;
        }
        if let Some(v) = vars.edge_bad_end {
            config.theme.edge_bad_end = v;
        }
        if let Some(v) = vars.chapter_palette {
            config.theme.chapter_palette = v;
        }
    }

    if let Some(flow) = parsed.flow {
        if let Some(v) = flow.node_width {
            config.flow.node_width = v;
        }
        if let Some(v) = flow.node_height {
            config.flow.node_height = v;
        }
        if let Some(v) = flow.label_allowance {
            config.flow.label_allowance = v;
        }
        if let Some(v) = flow.level_spacing {
            config.flow.level_spacing = v;
        }
        if let Some(v) = flow.grid_gap {
            config.flow.grid_gap = v;
        }
        if let Some(v) = flow.grid_columns {
            config.flow.grid_columns = v.max(1);
        }
        if let Some(v) = flow.label_width {
            config.flow.label_width = v;
        }
        if let Some(v) = flow.label_height {
            config.flow.label_height = v;
        }
        if let Some(v) = flow.label_offsets {
            config.flow.label_offsets = v;
        }
    }

    if let Some(viewport) = parsed.viewport {
        if let Some(v) = viewport.min_scale {
            config.flow.viewport.min_scale = v;
        }
        if let Some(v) = viewport.max_scale {
            config.flow.viewport.max_scale = v;
        }
        if let Some(v) = viewport.zoom_step {
            config.flow.viewport.zoom_step = v;
        }
        if let Some(v) = viewport.default_offset_x {
            config.flow.viewport.default_offset.0 = v;
        }
        if let Some(v) = viewport.default_offset_y {
            config.flow.viewport.default_offset.1 = v;
        }
        let vp = &mut config.flow.viewport;
        if !(vp.min_scale > 0.0 && vp.min_scale <= vp.max_scale) {
            anyhow::bail!(
                "invalid viewport scale range [{}, {}]",
                vp.min_scale,
                vp.max_scale
            );
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.margin {
            config.render.margin = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}
