use std::path::{Path, PathBuf};

/// Resolve the coach workspace root.
///
/// Priority:
/// 1. `--root` flag / `COACH_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.coach/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_upward(&cwd).unwrap_or(cwd)
}

fn find_upward(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(".coach").is_dir() {
            return Some(dir);
        }
        dir = dir.parent()?.to_path_buf();
    }
}
