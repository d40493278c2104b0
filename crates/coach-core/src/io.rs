use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// A crash mid-write never leaves a truncated record behind.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Remove a file if present. Returns true if something was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Read every `*.yaml` file directly under `dir`, skipping anything that
/// fails to parse. A missing directory yields an empty list.
pub fn read_yaml_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }
        let data = std::fs::read_to_string(&path)?;
        match serde_yaml::from_str(&data) {
            Ok(v) => out.push(v),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file"),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/test.yaml");
        atomic_write(&path, b"data").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data");
    }

    #[test]
    fn remove_if_exists_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.yaml");
        std::fs::write(&path, "a: 1").unwrap();
        assert!(remove_if_exists(&path).unwrap());
        assert!(!remove_if_exists(&path).unwrap());
    }

    #[test]
    fn read_yaml_dir_skips_garbage_and_other_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.yaml"), "1").unwrap();
        std::fs::write(dir.path().join("b.yaml"), "[not: an int").unwrap();
        std::fs::write(dir.path().join("c.txt"), "3").unwrap();
        let values: Vec<u32> = read_yaml_dir(dir.path()).unwrap();
        assert_eq!(values, vec![1]);
    }

    #[test]
    fn read_yaml_dir_missing_dir() {
        let dir = TempDir::new().unwrap();
        let values: Vec<u32> = read_yaml_dir(&dir.path().join("nope")).unwrap();
        assert!(values.is_empty());
    }
}
