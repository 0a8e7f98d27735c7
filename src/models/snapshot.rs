use serde::Serialize;
use std::collections::HashMap;

/// One character's standing on the leaderboard at the moment of a fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterSnapshot {
    pub name: String,
    pub level: u32,
    pub exp_percent: f64,
}

impl CharacterSnapshot {
    pub fn new(name: impl Into<String>, level: u32, exp_percent: f64) -> Self {
        Self {
            name: name.into(),
            level,
            exp_percent,
        }
    }
}

/// Full leaderboard section, keyed by character name.
pub type Snapshot = HashMap<String, CharacterSnapshot>;
