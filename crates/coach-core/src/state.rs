use crate::error::{CoachError, Result};
use crate::paths;
use crate::types::SaveMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

const HISTORY_LIMIT: usize = 200;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub session: String,
    pub mode: SaveMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub outcome: String,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_session: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub last_updated: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

impl State {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: project.into(),
            active_session: None,
            history: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::state_path(root);
        if !path.exists() {
            return Err(CoachError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let state: State = serde_yaml::from_str(&data)?;
        Ok(state)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::state_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    pub fn set_active(&mut self, session: &str) {
        self.active_session = Some(session.to_string());
        self.last_updated = Utc::now();
    }

    /// Clear the active session if it is `session`.
    pub fn clear_active(&mut self, session: &str) {
        if self.active_session.as_deref() == Some(session) {
            self.active_session = None;
        }
        self.last_updated = Utc::now();
    }

    pub fn record_save(
        &mut self,
        session: &str,
        mode: SaveMode,
        record: Option<&str>,
        outcome: &str,
    ) {
        self.history.push(HistoryEntry {
            session: session.to_string(),
            mode,
            record: record.map(str::to_string),
            timestamp: Utc::now(),
            outcome: outcome.to_string(),
        });
        if self.history.len() > HISTORY_LIMIT {
            self.history.drain(..self.history.len() - HISTORY_LIMIT);
        }
        self.last_updated = Utc::now();
    }

    pub fn last_save(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
