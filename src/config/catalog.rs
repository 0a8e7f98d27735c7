//! Location catalog (`dungeons.json`): known dungeons with their stage count
//! and allowed difficulties.
//!
//! A missing catalog file disables validation; a present but unreadable one
//! is an error.

use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct LocationDef {
    #[serde(default)]
    pub stages: u32,
    #[serde(default)]
    pub difficulties: Vec<serde_json::Value>,
}

impl LocationDef {
    /// Difficulties may be written as strings or numbers in the catalog.
    fn allows(&self, difficulty: &str) -> bool {
        self.difficulties.iter().any(|d| match d {
            serde_json::Value::String(s) => s.eq_ignore_ascii_case(difficulty),
            other => other.to_string() == difficulty,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub dungeons: HashMap<String, LocationDef>,
}

impl Catalog {
    /// `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> AppResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn find(&self, location: &str) -> Option<&LocationDef> {
        self.dungeons
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(location))
            .map(|(_, def)| def)
    }

    pub fn validate(&self, location: &str, stage: u32, difficulty: &str) -> AppResult<()> {
        let def = self
            .find(location)
            .ok_or_else(|| AppError::Validation(format!("unknown location '{location}'")))?;

        if stage < 1 || stage > def.stages {
            return Err(AppError::Validation(format!(
                "stage {stage} outside 1..={} for '{location}'",
                def.stages
            )));
        }

        if !def.allows(difficulty) {
            return Err(AppError::Validation(format!(
                "difficulty '{difficulty}' not allowed for '{location}'"
            )));
        }
        Ok(())
    }
}

/// Validate against the catalog at `path`, skipping when it is absent.
pub fn validate_location(
    path: &Path,
    location: &str,
    stage: u32,
    difficulty: &str,
) -> AppResult<()> {
    match Catalog::load(path)? {
        Some(catalog) => catalog.validate(location, stage, difficulty),
        None => {
            tracing::warn!(
                catalog = %path.display(),
                "location catalog not found, skipping validation"
            );
            Ok(())
        }
    }
}
