//! Editor commands over a scenario document, with bounded undo.
//!
//! Every successful mutation snapshots the previous document first.
//! Rejected commands leave both the document and the history untouched.

use std::collections::{HashSet, VecDeque};

use crate::combat::apply_derived_skills;
use crate::config::FlowConfig;
use crate::error::EditError;
use crate::layout::auto_layout;
use crate::model::{
    FlowEdge, FlowEdgeType, FlowNodeLayout, Npc, NpcId, NpcRole, Scenario, Scene, SceneId,
    SceneType, SkillTemplate,
};

const HISTORY_LIMIT: usize = 20;
const NEW_SCENE_TITLE: &str = "New scene";
const NEW_NPC_NAME: &str = "New NPC";

/// Fields of a flow edge before it has an id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeDraft {
    pub from: SceneId,
    pub to: SceneId,
    pub kind: FlowEdgeType,
    pub condition: Option<String>,
    pub note: Option<String>,
}

impl EdgeDraft {
    pub fn new(from: impl Into<SceneId>, to: impl Into<SceneId>, kind: FlowEdgeType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            ..Default::default()
        }
    }
}

/// Next `prefix-N` from the counter that no existing id already uses.
fn fresh_id<'a>(
    counter: &mut u64,
    prefix: &str,
    taken: impl IntoIterator<Item = &'a str>,
) -> String {
    let taken: HashSet<&str> = taken.into_iter().collect();
    loop {
        *counter += 1;
        let candidate = format!("{prefix}-{counter}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }
}

fn reject<T>(err: EditError) -> Result<T, EditError> {
    tracing::warn!(%err, "edit rejected");
    Err(err)
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    scenario: Scenario,
    history: VecDeque<Scenario>,
    id_counter: u64,
}

impl Document {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            id_counter: 0,
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn into_scenario(self) -> Scenario {
        self.scenario
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn undo(&mut self) -> Result<(), EditError> {
        match self.history.pop_back() {
            Some(previous) => {
                self.scenario = previous;
                Ok(())
            }
            None => Err(EditError::NothingToUndo),
        }
    }

    fn snapshot(&mut self) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(self.scenario.clone());
    }

    /// Replace the whole document, e.g. after an import or a reset.
    pub fn replace_scenario(&mut self, scenario: Scenario) {
        self.snapshot();
        self.scenario = scenario;
    }

    pub fn reset_to_sample(&mut self) {
        self.replace_scenario(Scenario::sample());
    }

    pub fn reset_to_empty(&mut self) {
        self.replace_scenario(Scenario::default());
    }

    pub fn add_scene(&mut self) -> SceneId {
        let taken = self.scenario.scenes.iter().map(|s| s.id.as_str());
        let id = fresh_id(&mut self.id_counter, "scene", taken);
        self.snapshot();
        self.scenario
            .scenes
            .push(Scene::new(id.clone(), NEW_SCENE_TITLE, SceneType::Etc));
        id
    }

    /// Replace a scene by id and keep every NPC's appearance list in step
    /// with the scene's NPC list.
    pub fn update_scene(&mut self, scene: Scene) -> Result<(), EditError> {
        let Some(pos) = self.scenario.scenes.iter().position(|s| s.id == scene.id) else {
            return reject(EditError::UnknownScene(scene.id));
        };
        self.snapshot();
        let previous = std::mem::replace(&mut self.scenario.scenes[pos], scene);
        let scene = &self.scenario.scenes[pos];

        for npc in &mut self.scenario.npcs {
            let in_new = scene.npcs.contains(&npc.id);
            let in_previous = previous.npcs.contains(&npc.id);
            let listed = npc.appear_scenes.contains(&scene.id);
            if in_new && !listed {
                npc.appear_scenes.push(scene.id.clone());
            } else if !in_new && in_previous && listed {
                npc.appear_scenes.retain(|sid| sid != &scene.id);
            }
        }
        Ok(())
    }

    /// Remove a scene with its incident edges, its layout entry and every
    /// NPC appearance that names it.
    pub fn delete_scene(&mut self, id: &str) -> Result<(), EditError> {
        if self.scenario.scene(id).is_none() {
            return reject(EditError::UnknownScene(id.to_string()));
        }
        self.snapshot();
        let scenario = &mut self.scenario;
        scenario.scenes.retain(|s| s.id != id);
        scenario.flow_edges.retain(|e| e.from != id && e.to != id);
        scenario.flow_layout.retain(|entry| entry.scene_id != id);
        for npc in &mut scenario.npcs {
            npc.appear_scenes.retain(|sid| sid != id);
        }
        Ok(())
    }

    fn check_edge(
        &self,
        from: &str,
        to: &str,
        kind: FlowEdgeType,
        ignore: Option<&str>,
    ) -> Result<(), EditError> {
        if from.is_empty() || to.is_empty() {
            return reject(EditError::MissingEndpoint);
        }
        if from == to {
            return reject(EditError::SelfLoop(from.to_string()));
        }
        let duplicate = self.scenario.flow_edges.iter().any(|edge| {
            Some(edge.id.as_str()) != ignore
                && edge.from == from
                && edge.to == to
                && edge.kind == kind
        });
        if duplicate {
            return reject(EditError::DuplicateEdge {
                from: from.to_string(),
                to: to.to_string(),
                kind: kind.as_str(),
            });
        }
        Ok(())
    }

    /// Append a new edge and return its id.
    pub fn add_flow_edge(&mut self, draft: EdgeDraft) -> Result<String, EditError> {
        self.check_edge(&draft.from, &draft.to, draft.kind, None)?;
        let taken = self.scenario.flow_edges.iter().map(|e| e.id.as_str());
        let id = fresh_id(&mut self.id_counter, "edge", taken);
        self.snapshot();
        self.scenario.flow_edges.push(FlowEdge {
            id: id.clone(),
            from: draft.from,
            to: draft.to,
            kind: draft.kind,
            condition: draft.condition,
            note: draft.note,
        });
        Ok(id)
    }

    pub fn update_flow_edge(&mut self, edge: FlowEdge) -> Result<(), EditError> {
        let Some(pos) = self.scenario.flow_edges.iter().position(|e| e.id == edge.id) else {
            return reject(EditError::UnknownEdge(edge.id));
        };
        self.check_edge(&edge.from, &edge.to, edge.kind, Some(&edge.id))?;
        self.snapshot();
        self.scenario.flow_edges[pos] = edge;
        Ok(())
    }

    pub fn delete_flow_edge(&mut self, id: &str) -> Result<(), EditError> {
        if !self.scenario.flow_edges.iter().any(|e| e.id == id) {
            return reject(EditError::UnknownEdge(id.to_string()));
        }
        self.snapshot();
        self.scenario.flow_edges.retain(|e| e.id != id);
        Ok(())
    }

    /// Replace the stored layout wholesale (drag results, imports).
    pub fn set_flow_layout(&mut self, layout: Vec<FlowNodeLayout>) {
        self.snapshot();
        self.scenario.flow_layout = layout;
    }

    pub fn apply_auto_layout(&mut self, config: &FlowConfig) {
        let layout = auto_layout(&self.scenario.scenes, &self.scenario.flow_edges, config);
        self.set_flow_layout(layout);
    }

    pub fn add_npc(&mut self) -> NpcId {
        let taken = self.scenario.npcs.iter().map(|n| n.id.as_str());
        let id = fresh_id(&mut self.id_counter, "npc", taken);
        self.snapshot();
        self.scenario.npcs.push(Npc {
            id: id.clone(),
            name: NEW_NPC_NAME.to_string(),
            role: NpcRole::Other,
            ..Default::default()
        });
        id
    }

    /// Replace an NPC by id. Formula-driven skills are recomputed from the
    /// incoming stats.
    pub fn update_npc(&mut self, mut npc: Npc) -> Result<(), EditError> {
        let Some(pos) = self.scenario.npcs.iter().position(|n| n.id == npc.id) else {
            return reject(EditError::UnknownNpc(npc.id));
        };
        apply_derived_skills(&mut npc);
        self.snapshot();
        self.scenario.npcs[pos] = npc;
        Ok(())
    }

    /// Remove an NPC and every scene reference to it, lines included.
    pub fn delete_npc(&mut self, id: &str) -> Result<(), EditError> {
        if self.scenario.npc(id).is_none() {
            return reject(EditError::UnknownNpc(id.to_string()));
        }
        self.snapshot();
        self.scenario.npcs.retain(|n| n.id != id);
        for scene in &mut self.scenario.scenes {
            scene.npcs.retain(|npc_id| npc_id != id);
            scene.npc_lines.retain(|line| line.npc_id != id);
        }
        Ok(())
    }

    pub fn add_skill_template(&mut self, template: SkillTemplate) {
        self.snapshot();
        self.scenario.skill_templates.push(template);
    }

    /// Replace the template with the same id; unknown ids are a no-op.
    pub fn update_skill_template(&mut self, template: SkillTemplate) {
        self.snapshot();
        for existing in &mut self.scenario.skill_templates {
            if existing.id == template.id {
                *existing = template.clone();
            }
        }
    }

    pub fn delete_skill_template(&mut self, id: &str) {
        self.snapshot();
        self.scenario.skill_templates.retain(|t| t.id != id);
    }

    /// Swap in a whole template set, such as the stock rulebook list.
    pub fn replace_skill_templates(&mut self, templates: Vec<SkillTemplate>) {
        self.snapshot();
        self.scenario.skill_templates = templates;
    }
}
