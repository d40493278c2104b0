use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const COACH_DIR: &str = ".coach";
pub const RECORDS_DIR: &str = ".coach/records";
pub const SESSIONS_DIR: &str = ".coach/sessions";

pub const CONFIG_FILE: &str = ".coach/config.yaml";
pub const STATE_FILE: &str = ".coach/state.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn coach_dir(root: &Path) -> PathBuf {
    root.join(COACH_DIR)
}

pub fn records_dir(root: &Path) -> PathBuf {
    root.join(RECORDS_DIR)
}

pub fn record_path(root: &Path, id: &str) -> PathBuf {
    records_dir(root).join(format!("{id}.yaml"))
}

pub fn sessions_dir(root: &Path) -> PathBuf {
    root.join(SESSIONS_DIR)
}

pub fn session_path(root: &Path, id: &str) -> PathBuf {
    sessions_dir(root).join(format!("{id}.yaml"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}
