//! Derived combat values: the STR+SIZ damage bonus table, damage
//! expression templating and stat-derived skill values.

use crate::model::{Npc, NpcStats, SkillEntry};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Placeholder token inside a damage expression, matched case-insensitively.
const DB_TOKEN: &str = "DB";

static DB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)DB").unwrap());
static SIGNED_DB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[+\-−]?\s*DB").unwrap());

/// Upper bounds (inclusive) of STR+SIZ and the bonus each maps to.
const DAMAGE_BONUS_TABLE: [(i32, DamageBonus); 8] = [
    (12, DamageBonus::Dice("-1D6")),
    (16, DamageBonus::Dice("-1D4")),
    (24, DamageBonus::None),
    (32, DamageBonus::Dice("+1D4")),
    (40, DamageBonus::Dice("+1D6")),
    (56, DamageBonus::Dice("+2D6")),
    (72, DamageBonus::Dice("+3D6")),
    (88, DamageBonus::Dice("+4D6")),
];
const DAMAGE_BONUS_MAX: DamageBonus = DamageBonus::Dice("+5D6 or more");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageBonus {
    /// Zero bonus ("none"), distinct from a bonus that cannot be computed.
    None,
    /// Signed dice expression such as `+1D4`.
    Dice(&'static str),
}

impl DamageBonus {
    pub const NONE_LABEL: &'static str = "none";

    pub fn as_str(&self) -> &'static str {
        match self {
            DamageBonus::None => Self::NONE_LABEL,
            DamageBonus::Dice(expr) => expr,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DamageBonus::None)
    }

    /// Look a bonus up by its table label, e.g. `"+1D4"` or `"none"`.
    pub fn from_label(label: &str) -> Option<DamageBonus> {
        DAMAGE_BONUS_TABLE
            .iter()
            .map(|(_, bonus)| *bonus)
            .chain([DAMAGE_BONUS_MAX])
            .find(|bonus| bonus.as_str() == label.trim())
    }
}

impl fmt::Display for DamageBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Damage bonus for a STR+SIZ total; `None` when the total is zero.
pub fn damage_bonus_for_total(total: i32) -> Option<DamageBonus> {
    if total == 0 {
        return None;
    }
    let bonus = DAMAGE_BONUS_TABLE
        .iter()
        .find(|(limit, _)| total <= *limit)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(DAMAGE_BONUS_MAX);
    Some(bonus)
}

/// Damage bonus from a stat block. Missing STR or SIZ count as zero.
pub fn damage_bonus(stats: Option<&NpcStats>) -> Option<DamageBonus> {
    let stats = stats?;
    damage_bonus_for_total(stats.STR.unwrap_or(0).saturating_add(stats.SIZ.unwrap_or(0)))
}

/// Built-in skills whose value follows a characteristic, keyed by template id.
const BUILTIN_DERIVED_SKILLS: [(&str, &str, f64); 3] = [
    ("dodge", "DEX", 2.0),
    ("nativeLang", "EDU", 5.0),
    ("luck", "POW", 5.0),
];

/// Value of a named stat: the fixed characteristics first, then extra stats.
pub fn stat_value(npc: &Npc, name: &str) -> Option<i32> {
    let base = npc.stats.as_ref().and_then(|stats| match name {
        "HP" => stats.HP,
        "MP" => stats.MP,
        "SAN" => stats.SAN,
        _ => stats
            .characteristics()
            .into_iter()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| value),
    });
    base.or_else(|| {
        npc.extra_stats
            .iter()
            .find(|extra| extra.name == name)
            .and_then(|extra| extra.value)
    })
}

/// The stat and multiplier a skill is computed from, if any.
///
/// Explicit `calcStat`/`calcMultiplier` win; otherwise the built-in table is
/// consulted by template id.
pub fn skill_formula(skill: &SkillEntry) -> Option<(&str, f64)> {
    let builtin = skill.template_id.as_deref().and_then(|template| {
        BUILTIN_DERIVED_SKILLS
            .iter()
            .find(|(id, _, _)| *id == template)
    });
    let stat = skill
        .calc_stat
        .as_deref()
        .or(builtin.map(|(_, stat, _)| *stat))?;
    let multiplier = skill.calc_multiplier.or(builtin.map(|(_, _, mult)| *mult))?;
    Some((stat, multiplier))
}

/// Stat × multiplier, rounded. `None` when the skill has no formula or the
/// stat is unset.
pub fn derived_skill_value(skill: &SkillEntry, npc: &Npc) -> Option<i32> {
    let (stat, multiplier) = skill_formula(skill)?;
    let base = stat_value(npc, stat)?;
    Some((f64::from(base) * multiplier).round() as i32)
}

/// Recompute every formula-driven skill from the NPC's current stats.
/// Skills without a formula keep their value.
pub fn apply_derived_skills(npc: &mut Npc) {
    let values: Vec<Option<Option<i32>>> = npc
        .skills
        .iter()
        .map(|skill| skill_formula(skill).map(|_| derived_skill_value(skill, npc)))
        .collect();
    for (skill, value) in npc.skills.iter_mut().zip(values) {
        if let Some(value) = value {
            skill.value = value;
        }
    }
}

/// HP = ceil((CON + SIZ) / 2); needs both characteristics.
pub fn hit_points(stats: Option<&NpcStats>) -> Option<i32> {
    let stats = stats?;
    let total = i64::from(stats.CON?) + i64::from(stats.SIZ?);
    Some((total + 1).div_euclid(2) as i32)
}

/// MP = POW.
pub fn magic_points(stats: Option<&NpcStats>) -> Option<i32> {
    stats?.POW
}

/// Combine a weapon damage expression with a damage bonus.
///
/// Returns `None` only for an empty damage expression.
pub fn merge_damage(damage: &str, bonus: Option<DamageBonus>) -> Option<String> {
    if damage.is_empty() {
        return None;
    }

    if !damage.to_uppercase().contains(DB_TOKEN) {
        let merged = match bonus {
            Some(DamageBonus::Dice(expr)) => {
                let signed = if expr.starts_with('-') {
                    expr.to_string()
                } else {
                    format!("+{}", expr.trim_start_matches('+'))
                };
                format!("{damage}{signed}")
            }
            Some(DamageBonus::None) | None => damage.to_string(),
        };
        return Some(merged);
    }

    let substituted = match bonus {
        None => return Some(damage.to_string()),
        Some(DamageBonus::None) => SIGNED_DB_RE.replace_all(damage, "").into_owned(),
        Some(DamageBonus::Dice(expr)) => {
            let unsigned = expr.strip_prefix('+').unwrap_or(expr);
            DB_RE.replace_all(damage, regex::NoExpand(unsigned)).into_owned()
        }
    };
    Some(collapse_signs(&substituted))
}

fn collapse_signs(expr: &str) -> String {
    expr.replace("+-", "-").replace("-+", "-").replace("++", "+")
}
