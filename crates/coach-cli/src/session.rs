use anyhow::Context;
use coach_core::{session::WizardSession, state::State};
use std::path::Path;

/// Load the session named by `--session`, falling back to the active one.
pub fn load(root: &Path, selected: Option<&str>) -> anyhow::Result<WizardSession> {
    let id = match selected {
        Some(id) => id.to_string(),
        None => {
            let state = State::load(root).context("failed to load state")?;
            state
                .active_session
                .ok_or_else(|| anyhow::anyhow!("no active session: run 'coach new' first"))?
        }
    };
    WizardSession::load(root, &id).with_context(|| format!("failed to load session {id}"))
}

pub fn save(root: &Path, session: &mut WizardSession) -> anyhow::Result<()> {
    session
        .save(root)
        .with_context(|| format!("failed to save session {}", session.id))
}

/// Persist a new session and make it the active one.
pub fn activate(root: &Path, session: &mut WizardSession) -> anyhow::Result<()> {
    save(root, session)?;
    let mut state = State::load(root).context("failed to load state")?;
    state.set_active(&session.id);
    state.save(root).context("failed to save state")
}
