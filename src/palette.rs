//! Chat-palette export: dice command lines and the character clipboard
//! payload pasted into the online tabletop.

use serde::Serialize;

use crate::combat::{damage_bonus, merge_damage};
use crate::model::{Npc, SkillCategory, SkillEntry};

const SAN_CHECK_COMMAND: &str = "1d100<={SAN} 【SAN check】";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaletteOptions {
    /// Prefix every command with `S` so rolls are hidden from players.
    pub secret: bool,
    pub include_san_check: bool,
}

fn with_secret(line: String, secret: bool) -> String {
    if secret { format!("S{line}") } else { line }
}

/// `CCB<=value 【name】`, the value part omitted when the skill has none.
pub fn build_skill_command(skill: &SkillEntry, secret: bool) -> String {
    let value = skill
        .value
        .map(|value| format!("<={value}"))
        .unwrap_or_default();
    with_secret(format!("CCB{value} 【{}】", skill.name), secret)
}

/// One command per line: each skill, a damage roll after every combat
/// skill that has a damage expression, and optionally a SAN check.
pub fn build_npc_commands(npc: &Npc, options: PaletteOptions) -> String {
    let bonus = damage_bonus(npc.stats.as_ref());
    let mut lines = Vec::new();

    for skill in &npc.skills {
        lines.push(build_skill_command(skill, options.secret));
        if skill.category != Some(SkillCategory::Combat) {
            continue;
        }
        let Some(damage) = skill.damage.as_deref() else {
            continue;
        };
        if let Some(expr) = merge_damage(damage, bonus) {
            lines.push(with_secret(
                format!("{expr} 【{} damage】", skill.name),
                options.secret,
            ));
        }
    }

    if options.include_san_check {
        lines.push(with_secret(SAN_CHECK_COMMAND.to_string(), options.secret));
    }
    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterStatus {
    pub label: String,
    pub value: i32,
    pub max: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterParam {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiative: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<CharacterStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<CharacterParam>,
    pub commands: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterClipboard {
    pub kind: &'static str,
    pub data: CharacterData,
}

impl CharacterClipboard {
    pub fn from_npc(npc: &Npc, options: PaletteOptions) -> Self {
        let mut status = Vec::new();
        let mut params = Vec::new();

        if let Some(stats) = &npc.stats {
            for (label, value) in [("HP", stats.HP), ("MP", stats.MP), ("SAN", stats.SAN)] {
                if let Some(value) = value {
                    status.push(CharacterStatus {
                        label: label.to_string(),
                        value,
                        max: value,
                    });
                }
            }
            for (label, value) in stats.characteristics() {
                if let Some(value) = value {
                    params.push(CharacterParam {
                        label: label.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }

        if let Some(bonus) = damage_bonus(npc.stats.as_ref()) {
            params.push(CharacterParam {
                label: "DB".to_string(),
                value: bonus.to_string(),
            });
        }

        for skill in &npc.skills {
            params.push(CharacterParam {
                label: skill.name.clone(),
                value: skill.value.map(|v| v.to_string()).unwrap_or_default(),
            });
        }

        let qa = npc
            .qa
            .iter()
            .map(|item| format!("Q: {}\nA: {}", item.question, item.answer))
            .collect::<Vec<_>>()
            .join("\n");
        let memo = [npc.memo.clone().unwrap_or_default(), qa]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        CharacterClipboard {
            kind: "character",
            data: CharacterData {
                name: npc.name.clone(),
                memo: (!memo.is_empty()).then_some(memo),
                initiative: npc.stats.as_ref().and_then(|stats| stats.DEX),
                status,
                params,
                commands: build_npc_commands(npc, options),
            },
        }
    }
}

/// Pretty-printed clipboard JSON for one NPC.
pub fn build_clipboard_json(npc: &Npc, options: PaletteOptions) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&CharacterClipboard::from_npc(npc, options))
}
