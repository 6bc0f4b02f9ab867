use super::Storage;
use anyhow::{Result, anyhow, bail};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory storage using a HashMap behind a RwLock. An optional quota
/// (in bytes of keys plus values) mimics a browser storage limit.
pub struct MemoryStorage {
    inner: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            quota: None,
        }
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.inner.read().map_err(|e| anyhow!("Storage lock poisoned: {e}"))?;
        let value = map.get(key).cloned();
        debug!(key, hit = value.is_some(), "Storage GET");
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.inner.write().map_err(|e| anyhow!("Storage lock poisoned: {e}"))?;
        if let Some(quota) = self.quota {
            let used: usize = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > quota {
                bail!("Storage quota of {quota} bytes exceeded while writing '{key}'");
            }
        }
        map.insert(key.to_string(), value.to_string());
        debug!(key, "Storage SET");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.inner.write().map_err(|e| anyhow!("Storage lock poisoned: {e}"))?;
        map.remove(key);
        debug!(key, "Storage REMOVE");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut map = self.inner.write().map_err(|e| anyhow!("Storage lock poisoned: {e}"))?;
        map.clear();
        debug!("Storage CLEAR");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_get_set() {
        let storage = MemoryStorage::new();

        // Initially, storage is empty
        assert!(storage.get("key1").unwrap().is_none());

        storage.set("key1", "one").unwrap();
        assert_eq!(storage.get("key1").unwrap().as_deref(), Some("one"));

        // Overwrite
        storage.set("key1", "uno").unwrap();
        assert_eq!(storage.get("key1").unwrap().as_deref(), Some("uno"));
    }

    #[test]
    fn test_storage_remove_and_clear() {
        let storage = MemoryStorage::new();
        storage.set("key1", "one").unwrap();
        storage.set("key2", "two").unwrap();

        storage.remove("key1").unwrap();
        assert!(storage.get("key1").unwrap().is_none());
        assert!(storage.get("key2").unwrap().is_some());

        storage.clear().unwrap();
        assert!(storage.get("key2").unwrap().is_none());
    }

    #[test]
    fn test_storage_quota_exceeded() {
        let storage = MemoryStorage::with_quota(8);
        storage.set("k", "1234").unwrap();

        let err = storage.set("k2", "123456").unwrap_err();
        assert!(err.to_string().contains("quota"));

        // Replacing an existing key only counts the new value
        storage.set("k", "1234567").unwrap();
    }
}
