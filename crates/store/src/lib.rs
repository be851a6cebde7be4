//! Lot store implementations.

pub mod noop;
pub mod file_backend;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use noop::NoopStore;
pub use file_backend::FileStore;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteStore, Visit};

use parkinglot_config::AppConfig;
use parkinglot_core::error::StoreError;
use parkinglot_core::store::LotStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Build the store selected by `config.store.backend`.
pub async fn open_from_config(config: &AppConfig) -> Result<Arc<dyn LotStore>, StoreError> {
    let location = config.store_location();
    match config.store.backend.as_str() {
        "memory" => Ok(Arc::new(NoopStore)),
        "file" => Ok(Arc::new(FileStore::open(PathBuf::from(location))?)),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            if !location.starts_with("sqlite:") {
                ensure_parent_dir(&location)?;
            }
            Ok(Arc::new(SqliteStore::new(&sqlite_url(&location)).await?))
        }
        other => Err(StoreError::Storage(format!(
            "store backend '{other}' is not available in this build"
        ))),
    }
}

#[cfg(feature = "sqlite")]
fn ensure_parent_dir(location: &str) -> Result<(), StoreError> {
    match std::path::Path::new(location).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| StoreError::Storage(format!("Failed to create store directory: {e}"))),
        _ => Ok(()),
    }
}

/// Turn a plain file path into a `sqlite://` URL; URLs pass through.
pub fn sqlite_url(location: &str) -> String {
    if location.starts_with("sqlite:") {
        location.to_string()
    } else {
        format!("sqlite://{location}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkinglot_config::StoreConfig;
    use tempfile::TempDir;

    fn config(backend: &str, path: &str) -> AppConfig {
        AppConfig {
            store: StoreConfig {
                backend: backend.into(),
                path: path.into(),
            },
        }
    }

    #[test]
    fn sqlite_url_wraps_paths() {
        assert_eq!(sqlite_url("/tmp/lot.db"), "sqlite:///tmp/lot.db");
        assert_eq!(sqlite_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[tokio::test]
    async fn opens_each_backend() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("lot.json");

        let store = open_from_config(&config("memory", "")).await.unwrap();
        assert_eq!(store.name(), "none");

        let store = open_from_config(&config("file", json.to_str().unwrap()))
            .await
            .unwrap();
        assert_eq!(store.name(), "file");

        #[cfg(feature = "sqlite")]
        {
            let store = open_from_config(&config("sqlite", "sqlite::memory:"))
                .await
                .unwrap();
            assert_eq!(store.name(), "sqlite");
        }
    }

    #[tokio::test]
    async fn unknown_backend_is_an_error() {
        let result = open_from_config(&config("redis", "x")).await;
        assert!(matches!(result, Err(StoreError::Storage(_))));
    }
}
