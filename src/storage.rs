//! JSON import/export of scenario documents.

use crate::error::StorageError;
use crate::model::Scenario;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Parse and normalize a scenario document.
///
/// `meta.title` must be a string. Scenes without a string `id` and `title`
/// and NPCs without a string `id` and `name` are dropped; at least one scene
/// must remain. Scene chapters are merged into `chapters`. Everything else
/// missing takes the model defaults.
pub fn parse_scenario(input: &str) -> Result<Scenario, StorageError> {
    let mut raw: Value = serde_json::from_str(input)?;
    let object = raw.as_object_mut().ok_or(StorageError::NotAnObject)?;
    let has_title = object
        .get("meta")
        .and_then(|meta| meta.get("title"))
        .is_some_and(Value::is_string);
    if !has_title {
        return Err(StorageError::MissingTitle);
    }
    retain_identified(object, "scenes", &["id", "title"]);
    retain_identified(object, "npcs", &["id", "name"]);

    let mut scenario: Scenario = serde_json::from_value(raw)?;
    if scenario.scenes.is_empty() {
        return Err(StorageError::NoScenes);
    }
    merge_scene_chapters(&mut scenario);
    tracing::debug!(
        scenes = scenario.scenes.len(),
        edges = scenario.flow_edges.len(),
        layout = scenario.flow_layout.len(),
        "parsed scenario"
    );
    Ok(scenario)
}

/// Keep only array items whose `fields` are all strings; a non-array becomes empty.
fn retain_identified(object: &mut Map<String, Value>, key: &str, fields: &[&str]) {
    let Some(value) = object.get_mut(key) else {
        return;
    };
    let Value::Array(items) = value else {
        *value = Value::Array(Vec::new());
        return;
    };
    let before = items.len();
    items.retain(|item| fields.iter().all(|field| item.get(*field).is_some_and(Value::is_string)));
    if items.len() < before {
        tracing::warn!(key, dropped = before - items.len(), "dropped entries without identity");
    }
}

/// Listed chapters (blank ones removed) followed by trimmed scene chapters,
/// first occurrence wins.
fn merge_scene_chapters(scenario: &mut Scenario) {
    let mut seen = HashSet::new();
    let listed = std::mem::take(&mut scenario.chapters)
        .into_iter()
        .filter(|chapter| !chapter.trim().is_empty());
    let from_scenes = scenario
        .scenes
        .iter()
        .filter_map(|scene| scene.chapter.as_deref())
        .map(str::trim)
        .filter(|chapter| !chapter.is_empty())
        .map(str::to_string);
    scenario.chapters = listed
        .chain(from_scenes)
        .filter(|chapter| seen.insert(chapter.clone()))
        .collect();
}

pub fn to_json_pretty(scenario: &Scenario) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(scenario)?)
}

pub fn load_scenario(path: &Path) -> Result<Scenario, StorageError> {
    let contents = std::fs::read_to_string(path)?;
    parse_scenario(&contents)
}

pub fn save_scenario(path: &Path, scenario: &Scenario) -> Result<(), StorageError> {
    std::fs::write(path, to_json_pretty(scenario)?)?;
    Ok(())
}

/// File name used when exporting: the scenario title, else `scenario`.
pub fn export_file_name(scenario: &Scenario) -> String {
    let title = scenario.meta.title.trim();
    if title.is_empty() {
        "scenario.json".to_string()
    } else {
        format!("{title}.json")
    }
}
