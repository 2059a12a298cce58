//! Scenario document types.
//!
//! Field names follow the persisted JSON (camelCase). Every collection and
//! optional field carries a serde default so partial documents load with
//! the same defaults in one place.

use serde::{Deserialize, Serialize};

pub type SceneId = String;
pub type NpcId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SceneType {
    Intro,
    Investigation,
    Combat,
    Climax,
    Epilogue,
    #[default]
    Etc,
}

impl SceneType {
    pub fn as_str(self) -> &'static str {
        match self {
            SceneType::Intro => "intro",
            SceneType::Investigation => "investigation",
            SceneType::Combat => "combat",
            SceneType::Climax => "climax",
            SceneType::Epilogue => "epilogue",
            SceneType::Etc => "etc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowEdgeType {
    #[default]
    Normal,
    Optional,
    BadEnd,
}

impl FlowEdgeType {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowEdgeType::Normal => "normal",
            FlowEdgeType::Optional => "optional",
            FlowEdgeType::BadEnd => "badEnd",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneSkillHint {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneSanCheck {
    pub id: String,
    pub trigger: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneMediaEntry {
    pub id: String,
    pub label: String,
    pub local_file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneNpcLine {
    pub id: String,
    pub npc_id: NpcId,
    pub line: String,
}

/// A node of the flow graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scene {
    pub id: SceneId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SceneType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlock_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    pub skill_hints: Vec<SceneSkillHint>,
    pub san_checks: Vec<SceneSanCheck>,
    pub bgms: Vec<SceneMediaEntry>,
    pub backgrounds: Vec<SceneMediaEntry>,
    pub npcs: Vec<NpcId>,
    pub npc_lines: Vec<SceneNpcLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Scene {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: SceneType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            ..Default::default()
        }
    }
}

/// A directed, typed connection between two scenes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowEdge {
    pub id: String,
    pub from: SceneId,
    pub to: SceneId,
    #[serde(rename = "type")]
    pub kind: FlowEdgeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FlowEdge {
    /// Text shown next to the edge: the condition, else the note.
    pub fn label_text(&self) -> Option<&str> {
        [self.condition.as_deref(), self.note.as_deref()]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
    }
}

/// Model-space position of one scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowNodeLayout {
    pub scene_id: SceneId,
    pub x: f64,
    pub y: f64,
}

impl FlowNodeLayout {
    pub fn new(scene_id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            scene_id: scene_id.into(),
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[allow(non_snake_case)]
#[serde(default)]
pub struct NpcStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub STR: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub CON: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub POW: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub DEX: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub APP: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub SIZ: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub INT: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub EDU: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub HP: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub MP: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub SAN: Option<i32>,
}

impl NpcStats {
    /// Characteristics other than the HP/MP/SAN pools, in sheet order.
    pub fn characteristics(&self) -> [(&'static str, Option<i32>); 8] {
        [
            ("STR", self.STR),
            ("CON", self.CON),
            ("POW", self.POW),
            ("DEX", self.DEX),
            ("APP", self.APP),
            ("SIZ", self.SIZ),
            ("INT", self.INT),
            ("EDU", self.EDU),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NpcRole {
    Client,
    Enemy,
    Mob,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillCategory {
    #[default]
    General,
    Combat,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillEntry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<SkillCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calc_stat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calc_multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillTemplate {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<SkillCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calc_stat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calc_multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpcQaItem {
    pub id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtraStat {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Npc {
    pub id: NpcId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruby: Option<String>,
    pub role: NpcRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<NpcStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_stats: Vec<ExtraStat>,
    pub skills: Vec<SkillEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub qa: Vec<NpcQaItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portrait_local_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_local_name: Option<String>,
    pub appear_scenes: Vec<SceneId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationNode {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub scene_ids: Vec<SceneId>,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioMeta {
    pub title: String,
    pub system: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_count_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for ScenarioMeta {
    fn default() -> Self {
        Self {
            title: "Untitled Scenario".to_string(),
            system: "CoC6".to_string(),
            author: None,
            estimated_hours: None,
            player_count_hint: None,
            notes: None,
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scenario {
    pub meta: ScenarioMeta,
    pub npcs: Vec<Npc>,
    pub scenes: Vec<Scene>,
    pub locations: Vec<LocationNode>,
    pub flow_edges: Vec<FlowEdge>,
    pub flow_layout: Vec<FlowNodeLayout>,
    pub skill_templates: Vec<SkillTemplate>,
    pub chapters: Vec<String>,
}

impl Scenario {
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id == id)
    }

    pub fn npc(&self, id: &str) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_label_prefers_condition_over_note() {
        let mut edge = FlowEdge {
            id: "e1".to_string(),
            from: "a".to_string(),
            to: "b".to_string(),
            note: Some("memo".to_string()),
            ..Default::default()
        };
        assert_eq!(edge.label_text(), Some("memo"));
        edge.condition = Some(String::new());
        assert_eq!(edge.label_text(), Some("memo"));
        edge.condition = Some("found the key".to_string());
        assert_eq!(edge.label_text(), Some("found the key"));
    }

    #[test]
    fn edge_type_uses_camel_case_on_the_wire() {
        let edge: FlowEdge =
            serde_json::from_str(r#"{"id":"e","from":"a","to":"b","type":"badEnd"}"#).unwrap();
        assert_eq!(edge.kind, FlowEdgeType::BadEnd);
        let json = serde_json::to_string(&edge).unwrap();
        assert!(json.contains(r#""type":"badEnd""#));
        assert!(!json.contains("condition"));
    }

    #[test]
    fn layout_entry_uses_scene_id_key() {
        let entry = FlowNodeLayout::new("scene-1", 10.0, -4.5);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["sceneId"], "scene-1");
        assert_eq!(json["y"], -4.5);
    }
}
