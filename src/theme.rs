use crate::model::FlowEdgeType;
use serde::{Deserialize, Serialize};

const CHAPTER_PALETTE: [&str; 7] = [
    "#4c6fff", "#0ea5e9", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#64748b",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub node_fill: String,
    pub node_border: String,
    pub title_color: String,
    pub muted_text_color: String,
    pub arrow_color: String,
    pub edge_label_background: String,
    pub edge_label_border: String,
    pub edge_normal: String,
    pub edge_optional: String,
    pub edge_bad_end: String,
    pub chapter_palette: Vec<String>,
}

impl Theme {
    pub fn editor() -> Self {
        Self {
            font_family: "Inter, \"Noto Sans JP\", system-ui, sans-serif".to_string(),
            font_size: 13.0,
            background: "#FFFFFF".to_string(),
            node_fill: "#FFFFFF".to_string(),
            node_border: "#c7d0ff".to_string(),
            title_color: "#1f2937".to_string(),
            muted_text_color: "#4b5563".to_string(),
            arrow_color: "#555555".to_string(),
            edge_label_background: "#FFFFFF".to_string(),
            edge_label_border: "#d1d5db".to_string(),
            edge_normal: "#4c6fff".to_string(),
            edge_optional: "#2f9e44".to_string(),
            edge_bad_end: "#d9480f".to_string(),
            chapter_palette: CHAPTER_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            font_family: "system-ui, sans-serif".to_string(),
            font_size: 14.0,
            background: "#FFFFFF".to_string(),
            node_fill: "#FFFFFF".to_string(),
            node_border: "#000000".to_string(),
            title_color: "#000000".to_string(),
            muted_text_color: "#222222".to_string(),
            arrow_color: "#000000".to_string(),
            edge_label_background: "#FFFFFF".to_string(),
            edge_label_border: "#000000".to_string(),
            edge_normal: "#000000".to_string(),
            edge_optional: "#1b5e20".to_string(),
            edge_bad_end: "#b71c1c".to_string(),
            chapter_palette: vec!["#000000".to_string()],
        }
    }

    pub fn edge_color(&self, kind: FlowEdgeType) -> &str {
        match kind {
            FlowEdgeType::Normal => &self.edge_normal,
            FlowEdgeType::Optional => &self.edge_optional,
            FlowEdgeType::BadEnd => &self.edge_bad_end,
        }
    }

    /// Colour for a chapter, cycling the palette by the chapter's index in
    /// the scenario's chapter list. Unlisted chapters get no colour.
    pub fn chapter_color(&self, chapters: &[String], chapter: &str) -> Option<&str> {
        if self.chapter_palette.is_empty() {
            return None;
        }
        let idx = chapters.iter().position(|c| c == chapter.trim())?;
        Some(self.chapter_palette[idx % self.chapter_palette.len()].as_str())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::editor()
    }
}
