use crate::error::AppError;
use coach_core::{store::FileGateway, wizard::Wizard, CoachError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Shared application state passed to all route handlers.
///
/// Wizards live in memory keyed by session id; records go through the
/// file gateway. The session map is never held across a gateway call.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub gateway: Arc<FileGateway>,
    sessions: Arc<Mutex<HashMap<String, Wizard>>>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            gateway: Arc::new(FileGateway::new(root.clone())),
            root,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a wizard and return its session id.
    pub fn insert(&self, wizard: Wizard) -> Result<String, AppError> {
        let id = uuid::Uuid::new_v4().simple().to_string()[..12].to_string();
        self.lock()?.insert(id.clone(), wizard);
        Ok(id)
    }

    pub fn remove(&self, id: &str) -> Result<Wizard, AppError> {
        self.lock()?
            .remove(id)
            .ok_or_else(|| CoachError::SessionNotFound(id.to_string()).into())
    }

    /// Run `f` against one session's wizard under the map lock.
    pub fn with_wizard<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Wizard) -> coach_core::Result<T>,
    ) -> Result<T, AppError> {
        let mut sessions = self.lock()?;
        let wizard = sessions
            .get_mut(id)
            .ok_or_else(|| CoachError::SessionNotFound(id.to_string()))?;
        Ok(f(wizard)?)
    }

    /// Session ids with a read-only projection of each wizard.
    pub fn snapshot<T>(&self, f: impl Fn(&str, &Wizard) -> T) -> Result<Vec<T>, AppError> {
        let sessions = self.lock()?;
        let mut ids: Vec<&String> = sessions.keys().collect();
        ids.sort();
        Ok(ids.into_iter().map(|id| f(id, &sessions[id])).collect())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Wizard>>, AppError> {
        self.sessions
            .lock()
            .map_err(|_| AppError(anyhow::anyhow!("session map poisoned")))
    }
}
