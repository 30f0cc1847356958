use crate::undo_stack::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_NAME: &str = "designer.config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// What to do with a gesture that has been running too long
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StallPolicy {
    /// Keep the work done so far as one history entry
    #[default]
    Commit,

    /// Roll back to the state captured at gesture start
    Discard,
}

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum undo depth (0 = unbounded)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Seed source for generated element ids
    #[serde(default = "default_document_name")]
    pub document_name: String,

    /// Gestures older than this are treated as stalled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_timeout_ms: Option<u64>,

    #[serde(default)]
    pub stalled_interaction: StallPolicy,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_document_name() -> String {
    "untitled".to_string()
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn interaction_timeout(&self) -> Option<Duration> {
        self.interaction_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            document_name: default_document_name(),
            interaction_timeout_ms: None,
            stalled_interaction: StallPolicy::default(),
        }
    }
}
