use super::Storage;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION_NAME: &str = "local_storage";

/// Durable storage backed by a fjall partition. Every write is synced before
/// returning so a crash never loses an acknowledged update.
pub struct DiskStorage {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStorage {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open storage at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION_NAME, PartitionCreateOptions::default())
            .context("Failed to open storage partition")?;

        Ok(Self {
            keyspace,
            partition,
        })
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist storage")
    }
}

impl Storage for DiskStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.partition.get(key.as_bytes())?;
        debug!(key, hit = value.is_some(), "Storage GET");
        value
            .map(|bytes| String::from_utf8(bytes.to_vec()).context("Stored value is not UTF-8"))
            .transpose()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.partition.insert(key.as_bytes(), value.as_bytes())?;
        debug!(key, "Storage SET");
        self.persist()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.partition.remove(key.as_bytes())?;
        debug!(key, "Storage REMOVE");
        self.persist()
    }

    fn clear(&self) -> Result<()> {
        let keys = self
            .partition
            .keys()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for key in keys {
            self.partition.remove(key)?;
        }
        debug!("Storage CLEAR");
        self.persist()
    }
}
