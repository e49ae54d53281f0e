use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Composer settings. Every field has a default, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposerConfig {
    /// Snapshots kept for undo
    pub history_limit: usize,

    /// Events kept in the in-memory log; oldest are dropped first
    pub event_log_limit: usize,

    /// Skin for widgets whose library entry does not name one
    pub default_skin: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            event_log_limit: 1_000,
            default_skin: "default".to_string(),
        }
    }
}

impl ComposerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse composer config")
    }

    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config from: {}", path.display()))
    }
}
