use crate::types::Step;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// One failed requirement, keyed by the draft field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub field: String,
    pub message: String,
}

impl Issue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Local, recoverable failure of a step predicate or a publish attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Step whose predicate failed; `None` when raised by publish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<Step>,
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(step: Option<Step>, issues: Vec<Issue>) -> Self {
        Self { step, issues }
    }

    /// Field names in the order the issues were raised, without repeats.
    pub fn fields(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for issue in &self.issues {
            if !out.contains(&issue.field.as_str()) {
                out.push(issue.field.as_str());
            }
        }
        out
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.issues.iter().map(|i| i.message.as_str()).collect();
        match self.step {
            Some(step) => write!(f, "step '{step}' incomplete: {}", messages.join("; ")),
            None => write!(f, "cannot publish: {}", messages.join("; ")),
        }
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Gateway errors
// ---------------------------------------------------------------------------

/// A remote save/publish call failed. The draft is left untouched so the
/// same action can be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum PersistenceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Resume/edit target does not exist or is not accessible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record not found: {id}")]
pub struct NotFoundError {
    pub id: String,
}

impl NotFoundError {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

// ---------------------------------------------------------------------------
// CoachError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("not initialized: run 'coach init'")]
    NotInitialized,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("invalid transition from {from}: {reason}")]
    InvalidTransition { from: String, reason: String },

    #[error("a save is already in progress")]
    SaveInFlight,

    #[error("no save is in progress")]
    NoSaveInFlight,

    #[error("invalid tag: {0}")]
    InvalidTag(String),

    #[error("tag limit reached ({0})")]
    TagLimit(usize),

    #[error("block not found: {0}")]
    BlockNotFound(String),

    #[error("invalid step: {0}")]
    InvalidStep(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid block type: {0}")]
    InvalidBlockKind(String),

    #[error("invalid record id '{0}'")]
    InvalidRecordId(String),

    #[error("invalid day {0}")]
    InvalidDay(u32),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CoachError {
    /// Validation details, when this error came from a step or publish check.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            CoachError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_names_step() {
        let err = ValidationError::new(
            Some(Step::Overview),
            vec![Issue::new("title", "title required")],
        );
        assert_eq!(err.to_string(), "step 'overview' incomplete: title required");
    }

    #[test]
    fn validation_fields_are_deduplicated() {
        let err = ValidationError::new(
            None,
            vec![
                Issue::new("blocks", "at least one block required"),
                Issue::new("blocks", "block 2 has no items"),
                Issue::new("title", "title required"),
            ],
        );
        assert_eq!(err.fields(), vec!["blocks", "title"]);
        assert!(err.to_string().starts_with("cannot publish:"));
    }

    #[test]
    fn persistence_error_json_shape() {
        let err = PersistenceError::Network("timeout".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "network");
        assert_eq!(json["message"], "timeout");
    }
}
