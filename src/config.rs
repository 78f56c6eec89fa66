use crate::storage::Storage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://demobackendb.onrender.com/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_KEEP_SESSIONS: usize = 20;

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Backend connection settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    /// Applies to every request
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the token, user, cart and theme files
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ActivityConfig {
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Where per-session JSONL logs are written
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// How many session logs to retain; older ones are deleted at startup
    #[serde(default)]
    pub keep_sessions: Option<usize>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
}

impl Config {
    /// Load configuration from default paths
    /// Priority: local (.courtside/config.local.toml) > project
    /// (.courtside/config.toml) > user (~/.courtside/config.toml)
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir();
        Self::load_layers(home.as_deref(), Path::new("."))
    }

    /// Merge the user, project and local layers found under the given roots
    pub fn load_layers(home: Option<&Path>, project: &Path) -> Result<Self> {
        let mut config = Config::default();

        let mut layers = Vec::new();
        if let Some(home) = home {
            layers.push(home.join(".courtside").join("config.toml"));
        }
        layers.push(project.join(".courtside").join("config.toml"));
        layers.push(project.join(".courtside").join("config.local.toml"));

        for path in layers {
            if path.exists() {
                config.merge(Self::load_from(&path)?);
            }
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Merge another config into this one (other takes priority for every
    /// value it sets)
    pub fn merge(&mut self, other: Config) {
        if other.api.base_url.is_some() {
            self.api.base_url = other.api.base_url;
        }
        if other.api.timeout_ms.is_some() {
            self.api.timeout_ms = other.api.timeout_ms;
        }
        if other.storage.data_dir.is_some() {
            self.storage.data_dir = other.storage.data_dir;
        }
        if other.activity.enabled.is_some() {
            self.activity.enabled = other.activity.enabled;
        }
        if other.activity.dir.is_some() {
            self.activity.dir = other.activity.dir;
        }
        if other.activity.keep_sessions.is_some() {
            self.activity.keep_sessions = other.activity.keep_sessions;
        }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Storage::default_dir)
    }

    pub fn activity_enabled(&self) -> bool {
        self.activity.enabled.unwrap_or(true)
    }

    pub fn activity_dir(&self) -> PathBuf {
        self.activity
            .dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("activity"))
    }

    pub fn activity_keep_sessions(&self) -> usize {
        self.activity.keep_sessions.unwrap_or(DEFAULT_KEEP_SESSIONS)
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(url) = &self.api.base_url {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.push(ValidationError {
                    field: "api.base_url".to_string(),
                    message: format!("Expected an http(s) URL, got '{}'", url),
                });
            } else if url.contains('?') || url.contains('#') {
                errors.push(ValidationError {
                    field: "api.base_url".to_string(),
                    message: "Must not carry a query string or fragment".to_string(),
                });
            }
        }

        if self.api.timeout_ms == Some(0) {
            errors.push(ValidationError {
                field: "api.timeout_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.activity.keep_sessions == Some(0) {
            errors.push(ValidationError {
                field: "activity.keep_sessions".to_string(),
                message: "Must keep at least the current session".to_string(),
            });
        }

        if let Some(dir) = &self.storage.data_dir {
            if dir.as_os_str().is_empty() {
                errors.push(ValidationError {
                    field: "storage.data_dir".to_string(),
                    message: "Must not be empty".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
        assert!(config.activity_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_layers_override_in_order() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();

        write(
            &home.path().join(".courtside/config.toml"),
            "[api]\nbase_url = \"https://user.test/api\"\ntimeout_ms = 5000\n",
        );
        write(
            &project.path().join(".courtside/config.toml"),
            "[api]\nbase_url = \"https://project.test/api\"\n",
        );
        write(
            &project.path().join(".courtside/config.local.toml"),
            "[activity]\nenabled = false\nkeep_sessions = 5\n",
        );

        let config = Config::load_layers(Some(home.path()), project.path()).unwrap();
        assert_eq!(config.base_url(), "https://project.test/api");
        assert_eq!(config.timeout(), Duration::from_millis(5000));
        assert!(!config.activity_enabled());
        assert_eq!(config.activity_keep_sessions(), 5);
    }

    #[test]
    fn test_missing_layers_are_skipped() {
        let project = tempfile::tempdir().unwrap();
        let config = Config::load_layers(None, project.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_bad_toml_is_error() {
        let project = tempfile::tempdir().unwrap();
        write(
            &project.path().join(".courtside/config.toml"),
            "[api\nbase_url = 1",
        );
        assert!(Config::load_layers(None, project.path()).is_err());
    }

    #[test]
    fn test_activity_dir_follows_data_dir() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/tmp/courtside-data"));
        assert_eq!(
            config.activity_dir(),
            PathBuf::from("/tmp/courtside-data/activity")
        );
    }

    #[test]
    fn test_validate_invalid_base_url() {
        let mut config = Config::default();
        config.api.base_url = Some("demobackendb.onrender.com/api".to_string());
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.contains("base_url"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_ms = Some(0);
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("greater than 0"));
    }

    #[test]
    fn test_validate_zero_keep_sessions() {
        let mut config = Config::default();
        assert_eq!(config.activity_keep_sessions(), DEFAULT_KEEP_SESSIONS);
        config.activity.keep_sessions = Some(0);
        let errors = config.validate().unwrap_err();
        assert_eq!(errors[0].field, "activity.keep_sessions");
    }
}
