use crate::error::{CoachError, Result};
use crate::paths;
use crate::payload::RecordId;
use crate::wizard::Wizard;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The editing copy of a wizard kept between CLI invocations.
///
/// A session is discarded when dropped; the record it produced (if any)
/// lives on in the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub wizard: Wizard,
}

impl WizardSession {
    pub fn new(wizard: Wizard) -> Self {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().simple().to_string();
        Self {
            id: id[..12].to_string(),
            created_at: now,
            updated_at: now,
            wizard,
        }
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        // Session ids share the record id alphabet; anything else could
        // escape the sessions directory.
        RecordId::parse(id).map_err(|_| CoachError::SessionNotFound(id.to_string()))?;
        let path = paths::session_path(root, id);
        if !path.exists() {
            return Err(CoachError::SessionNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let session: WizardSession = serde_yaml::from_str(&data)?;
        Ok(session)
    }

    pub fn save(&mut self, root: &Path) -> Result<()> {
        self.updated_at = Utc::now();
        let path = paths::session_path(root, &self.id);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Most recently touched first.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut sessions: Vec<Self> = crate::io::read_yaml_dir(&paths::sessions_dir(root))?;
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        RecordId::parse(id).map_err(|_| CoachError::SessionNotFound(id.to_string()))?;
        if !crate::io::remove_if_exists(&paths::session_path(root, id))? {
            return Err(CoachError::SessionNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthoringConfig;
    use crate::draft::DraftField;
    use crate::types::{Category, Step};
    use tempfile::TempDir;

    #[test]
    fn session_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut wizard = Wizard::with_category(Category::Fitness, AuthoringConfig::default());
        wizard
            .set_field(DraftField::Title("Leg Day".into()))
            .unwrap();
        let mut session = WizardSession::new(wizard);
        session.save(dir.path()).unwrap();

        let loaded = WizardSession::load(dir.path(), &session.id).unwrap();
        assert_eq!(loaded.wizard.draft().title(), "Leg Day");
        assert_eq!(loaded.wizard.step(), Step::Overview);
        assert_eq!(WizardSession::list(dir.path()).unwrap().len(), 1);
    }

    #[test]
    fn load_rejects_unknown_and_traversal_ids() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            WizardSession::load(dir.path(), "nope"),
            Err(CoachError::SessionNotFound(_))
        ));
        assert!(matches!(
            WizardSession::load(dir.path(), "../config"),
            Err(CoachError::SessionNotFound(_))
        ));
    }

    #[test]
    fn delete_removes_file() {
        let dir = TempDir::new().unwrap();
        let mut session = WizardSession::new(Wizard::new(AuthoringConfig::default()));
        session.save(dir.path()).unwrap();
        WizardSession::delete(dir.path(), &session.id).unwrap();
        assert!(WizardSession::list(dir.path()).unwrap().is_empty());
        assert!(WizardSession::delete(dir.path(), &session.id).is_err());
    }
}
