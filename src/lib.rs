//! Flow-graph layout, viewport and combat derivation for a scenario editor.

#[cfg(feature = "cli")]
pub mod cli;
pub mod combat;
pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod palette;
pub mod render;
mod sample;
pub mod storage;
pub mod theme;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use combat::{
    apply_derived_skills, damage_bonus, derived_skill_value, hit_points, magic_points,
    merge_damage, DamageBonus,
};
pub use config::{load_config, Config, FlowConfig, ViewportConfig};
pub use document::{Document, EdgeDraft};
pub use error::{EditError, StorageError};
pub use layout::{
    auto_layout, compute_flow_view, place_edge_label, resolve_layout, scenario_flow_view,
    FlowView, ResolvedLayout,
};
pub use model::{FlowEdge, FlowEdgeType, FlowNodeLayout, Npc, NpcStats, Scenario, Scene, SceneType};
pub use render::render_svg;
pub use theme::Theme;
pub use viewport::{Gesture, MoveOutcome, Propagation, Transform, ViewportController};
