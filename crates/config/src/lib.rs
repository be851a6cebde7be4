//! Configuration loading, validation, and management for the parking lot.
//!
//! Loads configuration from `~/.parkinglot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Store backends understood by `parkinglot-store`.
pub const STORE_BACKENDS: &[&str] = &["memory", "file", "sqlite"];

/// The root configuration structure.
///
/// Maps directly to `~/.parkinglot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where lot state is kept between runs
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "memory", "file" or "sqlite"
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// Database file / URL or JSON file. Relative paths resolve against the
    /// config directory.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_backend() -> String {
    "sqlite".into()
}
fn default_store_path() -> String {
    "parking_lot.db".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: default_store_path(),
        }
    }
}

impl StoreConfig {
    /// The store location with relative paths anchored at `base`.
    ///
    /// `sqlite:` URLs are passed through untouched.
    pub fn resolve_path(&self, base: &Path) -> String {
        if self.path.starts_with("sqlite:") {
            return self.path.clone();
        }
        let path = Path::new(&self.path);
        if path.is_absolute() {
            self.path.clone()
        } else {
            base.join(path).display().to_string()
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.parkinglot/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `PARKINGLOT_STORE` — store backend
    /// - `DATABASE_URL` — database path or URL, sqlite backend only
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        config.apply_overrides(
            std::env::var("PARKINGLOT_STORE").ok(),
            std::env::var("DATABASE_URL").ok(),
        );

        config.validate()?;
        Ok(config)
    }

    /// Apply the store overrides. The database URL only replaces the path
    /// when the (possibly overridden) backend is `sqlite`.
    pub fn apply_overrides(&mut self, backend: Option<String>, database_url: Option<String>) {
        if let Some(backend) = backend {
            self.store.backend = backend;
        }

        match database_url {
            Some(url) if self.store.backend == "sqlite" => self.store.path = url,
            Some(_) => tracing::debug!(
                backend = %self.store.backend,
                "Ignoring DATABASE_URL for non-sqlite store"
            ),
            None => {}
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".parkinglot")
    }

    /// The configured store location, resolved against the config directory.
    pub fn store_location(&self) -> String {
        self.store.resolve_path(&Self::config_dir())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !STORE_BACKENDS.contains(&self.store.backend.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown store backend '{}' (expected one of: {})",
                self.store.backend,
                STORE_BACKENDS.join(", ")
            )));
        }

        if self.store.backend != "memory" && self.store.path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "store.path must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.store.backend, "sqlite");
        assert_eq!(config.store.path, "parking_lot.db");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.store.backend, config.store.backend);
        assert_eq!(parsed.store.path, config.store.path);
    }

    #[test]
    fn unknown_backend_rejected() {
        let config = AppConfig {
            store: StoreConfig {
                backend: "redis".into(),
                ..StoreConfig::default()
            },
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("redis"));
    }

    #[test]
    fn empty_path_rejected_unless_in_memory() {
        let mut config = AppConfig {
            store: StoreConfig {
                backend: "file".into(),
                path: "  ".into(),
            },
        };
        assert!(config.validate().is_err());

        config.store.backend = "memory".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn database_url_only_overrides_sqlite() {
        let mut config = AppConfig::default();
        config.apply_overrides(None, Some("sqlite:///srv/lot.db".into()));
        assert_eq!(config.store.path, "sqlite:///srv/lot.db");

        let mut config = AppConfig::default();
        config.apply_overrides(Some("file".into()), Some("sqlite:///srv/lot.db".into()));
        assert_eq!(config.store.backend, "file");
        assert_eq!(config.store.path, "parking_lot.db");

        let mut config = AppConfig {
            store: StoreConfig {
                backend: "file".into(),
                path: "/data/lot.json".into(),
            },
        };
        config.apply_overrides(Some("sqlite".into()), Some("/data/lot.db".into()));
        assert_eq!(config.store.path, "/data/lot.db");

        let mut config = AppConfig::default();
        config.apply_overrides(None, None);
        assert_eq!(config.store.path, "parking_lot.db");
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().store.backend, "sqlite");
    }

    #[test]
    fn loads_store_section_from_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "[store]\nbackend = \"file\"\npath = \"/var/lib/lot.json\"").unwrap();

        let config = AppConfig::load_from(tmp.path()).unwrap();
        assert_eq!(config.store.backend, "file");
        assert_eq!(config.store.path, "/var/lib/lot.json");
    }

    #[test]
    fn partial_store_section_uses_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "[store]\nbackend = \"memory\"").unwrap();

        let config = AppConfig::load_from(tmp.path()).unwrap();
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.path, "parking_lot.db");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "[store\nbackend = ").unwrap();

        let result = AppConfig::load_from(tmp.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let store = StoreConfig::default();
        let resolved = store.resolve_path(Path::new("/home/user/.parkinglot"));
        assert_eq!(resolved, "/home/user/.parkinglot/parking_lot.db");

        let absolute = StoreConfig {
            backend: "file".into(),
            path: "/data/lot.json".into(),
        };
        assert_eq!(absolute.resolve_path(Path::new("/ignored")), "/data/lot.json");

        let url = StoreConfig {
            backend: "sqlite".into(),
            path: "sqlite::memory:".into(),
        };
        assert_eq!(url.resolve_path(Path::new("/ignored")), "sqlite::memory:");
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("sqlite"));
    }
}
