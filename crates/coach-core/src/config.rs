use crate::error::{CoachError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// AuthoringConfig
// ---------------------------------------------------------------------------

/// Limits applied by the wizard's step predicates and tag picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthoringConfig {
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
    #[serde(default = "default_max_title_len")]
    pub max_title_len: usize,
    #[serde(default = "default_max_program_days")]
    pub max_program_days: u32,
}

fn default_max_tags() -> usize {
    20
}

fn default_max_title_len() -> usize {
    120
}

fn default_max_program_days() -> u32 {
    84
}

impl Default for AuthoringConfig {
    fn default() -> Self {
        Self {
            max_tags: default_max_tags(),
            max_title_len: default_max_title_len(),
            max_program_days: default_max_program_days(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub authoring: AuthoringConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            authoring: AuthoringConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(CoachError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let a = &self.authoring;

        if a.max_title_len == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "authoring.max_title_len is 0: no title can pass the overview step"
                    .to_string(),
            });
        }

        if a.max_program_days == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "authoring.max_program_days is 0: fitness programs cannot be scheduled"
                    .to_string(),
            });
        } else if a.max_program_days > 366 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "authoring.max_program_days={} (more than a year is unusual)",
                    a.max_program_days
                ),
            });
        }

        if a.max_tags == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "authoring.max_tags is 0: tags cannot be added".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::new("test-project");
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.project.name, "test-project");
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.authoring, AuthoringConfig::default());
    }

    #[test]
    fn config_without_authoring_uses_defaults() {
        let yaml = "version: 1\nproject:\n  name: studio\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.authoring.max_tags, 20);
        assert_eq!(cfg.authoring.max_program_days, 84);
    }

    #[test]
    fn partial_authoring_section() {
        let yaml = "project:\n  name: studio\nauthoring:\n  max_tags: 5\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.authoring.max_tags, 5);
        assert_eq!(cfg.authoring.max_title_len, 120);
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(CoachError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        Config::new("studio").save(dir.path()).unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.project.name, "studio");
    }

    #[test]
    fn validate_flags_zero_limits() {
        let mut cfg = Config::new("studio");
        assert!(cfg.validate().is_empty());
        cfg.authoring.max_title_len = 0;
        cfg.authoring.max_program_days = 400;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert_eq!(warnings[1].level, WarnLevel::Warning);
    }
}
