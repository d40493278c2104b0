use crate::block::{BlockId, BlockList};
use crate::error::{CoachError, Result};
use crate::types::Category;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// RecordId
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

static RECORD_ID_RE: OnceLock<Regex> = OnceLock::new();

fn record_id_re() -> &'static Regex {
    RECORD_ID_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9\-_]*$").expect("record id regex is valid")
    })
}

impl RecordId {
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() || s.len() > 64 || !record_id_re().is_match(s) {
            return Err(CoachError::InvalidRecordId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = CoachError;

    fn try_from(s: String) -> Result<Self> {
        RecordId::parse(&s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self> {
        RecordId::parse(s)
    }
}

// ---------------------------------------------------------------------------
// DayAssignment
// ---------------------------------------------------------------------------

/// Blocks scheduled on one day of a multi-day program. Days are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAssignment {
    pub day: u32,
    #[serde(default)]
    pub block_ids: Vec<BlockId>,
}

// ---------------------------------------------------------------------------
// DraftPayload
// ---------------------------------------------------------------------------

/// Snapshot handed to the persistence gateway. Draft-save and publish send
/// the same shape; only `is_draft` differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub blocks: BlockList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<DayAssignment>,
    pub is_draft: bool,
}

// ---------------------------------------------------------------------------
// RecordSnapshot
// ---------------------------------------------------------------------------

/// A stored record as returned by the gateway: the payload plus the
/// server-assigned id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSnapshot {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: DraftPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_validation() {
        for ok in ["abc", "3f2c-11", "rec_1"] {
            RecordId::parse(ok).unwrap_or_else(|_| panic!("expected valid: {ok}"));
        }
        for bad in ["", "-lead", "has space", "../etc", "a/b"] {
            assert!(RecordId::parse(bad).is_err(), "expected invalid: {bad}");
        }
    }

    #[test]
    fn record_id_rejected_on_deserialize() {
        let res: std::result::Result<RecordId, _> = serde_json::from_str("\"../x\"");
        assert!(res.is_err());
    }

    #[test]
    fn snapshot_flattens_payload() {
        let snap = RecordSnapshot {
            id: RecordId::parse("r1").unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            payload: DraftPayload {
                title: "Calm Mornings".into(),
                description: String::new(),
                category: Some(Category::Mental),
                tags: vec!["Focus".into()],
                blocks: BlockList::new(),
                header_image_url: None,
                days: Vec::new(),
                is_draft: true,
            },
        };
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["id"], "r1");
        assert_eq!(json["title"], "Calm Mornings");
        assert_eq!(json["isDraft"], true);
        assert_eq!(json["category"], "mental");
        assert!(json.get("headerImageUrl").is_none());
        assert!(json.get("days").is_none());

        let back: RecordSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snap);
    }
}
