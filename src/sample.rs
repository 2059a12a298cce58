//! The bundled demo scenario loaded on first start and by "reset to sample".

use crate::model::Scenario;
use once_cell::sync::Lazy;

const SAMPLE_JSON: &str = include_str!("sample_scenario.json");

static SAMPLE: Lazy<Scenario> =
    Lazy::new(|| serde_json::from_str(SAMPLE_JSON).expect("bundled sample scenario is valid"));

impl Scenario {
    pub fn sample() -> Scenario {
        SAMPLE.clone()
    }
}
