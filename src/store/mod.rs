pub mod disk;
pub mod memory;

use crate::core::config::{AppConfig, StorageBackend};
use anyhow::Result;
use disk::DiskStorage;
use memory::MemoryStorage;
use std::sync::Arc;
use tracing::debug;

/// String key-value storage that survives between sessions, the stand-in for
/// browser local storage.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    /// Removes every key.
    fn clear(&self) -> Result<()>;
}

/// Opens the storage backend selected in the config.
pub fn open_storage(config: &AppConfig) -> Result<Arc<dyn Storage>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            debug!("Using in-memory storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageBackend::Disk => {
            let path = config.default_data_path()?.join("storage");
            debug!(path = %path.display(), "Using disk storage");
            Ok(Arc::new(DiskStorage::open(&path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_storage_memory_backend() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;

        let storage = open_storage(&config).unwrap();
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_open_storage_disk_backend_uses_data_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_path: Some(dir.path().to_string_lossy().into_owned()),
            ..AppConfig::default()
        };

        let storage = open_storage(&config).unwrap();
        storage.set("k", "v").unwrap();
        assert!(dir.path().join("storage").exists());
    }
}
