use crate::error::{NotFoundError, PersistenceError, Result};
use crate::gateway::PersistenceGateway;
use crate::payload::{DraftPayload, RecordId, RecordSnapshot};
use crate::paths;
use crate::types::SaveMode;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Record store backed by one YAML file per record under
/// `.coach/records/`. Last write wins; there is no locking.
#[derive(Debug, Clone)]
pub struct FileGateway {
    root: PathBuf,
}

impl FileGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load(&self, id: &RecordId) -> Result<RecordSnapshot> {
        let path = paths::record_path(&self.root, id.as_str());
        if !path.exists() {
            return Err(NotFoundError::new(id.as_str()).into());
        }
        let data = std::fs::read_to_string(&path)?;
        let snapshot: RecordSnapshot = serde_yaml::from_str(&data)?;
        Ok(snapshot)
    }

    /// All records, most recently updated first.
    pub fn list(&self) -> Result<Vec<RecordSnapshot>> {
        let mut records: Vec<RecordSnapshot> =
            crate::io::read_yaml_dir(&paths::records_dir(&self.root))?;
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    fn write(&self, snapshot: &RecordSnapshot) -> Result<()> {
        let path = paths::record_path(&self.root, snapshot.id.as_str());
        let data = serde_yaml::to_string(snapshot)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    fn store(
        &self,
        mode: SaveMode,
        target: Option<&RecordId>,
        payload: &DraftPayload,
    ) -> std::result::Result<RecordId, PersistenceError> {
        if payload.is_draft != mode.is_draft() {
            return Err(PersistenceError::Conflict(format!(
                "{mode} request carried isDraft={}",
                payload.is_draft
            )));
        }

        let now = Utc::now();
        let (id, created_at) = match target {
            Some(id) => match self.load(id) {
                Ok(existing) => (existing.id, existing.created_at),
                Err(crate::error::CoachError::NotFound(_)) => {
                    return Err(PersistenceError::Conflict(format!(
                        "record {id} no longer exists"
                    )))
                }
                Err(e) => return Err(PersistenceError::Storage(e.to_string())),
            },
            None => (RecordId::generate(), now),
        };

        let snapshot = RecordSnapshot {
            id: id.clone(),
            created_at,
            updated_at: now,
            payload: payload.clone(),
        };
        self.write(&snapshot)
            .map_err(|e| PersistenceError::Storage(e.to_string()))?;

        tracing::info!(record = %id, %mode, "record stored");
        Ok(id)
    }
}

impl PersistenceGateway for FileGateway {
    fn save_draft(
        &self,
        target: Option<&RecordId>,
        payload: &DraftPayload,
    ) -> std::result::Result<RecordId, PersistenceError> {
        self.store(SaveMode::Draft, target, payload)
    }

    fn publish(
        &self,
        target: Option<&RecordId>,
        payload: &DraftPayload,
    ) -> std::result::Result<RecordId, PersistenceError> {
        self.store(SaveMode::Publish, target, payload)
    }

    fn load_by_id(&self, id: &RecordId) -> std::result::Result<RecordSnapshot, NotFoundError> {
        self.load(id).map_err(|e| {
            tracing::debug!(record = %id, error = %e, "record load failed");
            NotFoundError::new(id.as_str())
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
