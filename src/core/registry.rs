//! The authoritative list of tracked stocks, mirrored to storage

use super::filter::FilterModel;
use super::stock::{Slot, StockEntry};
use crate::store::Storage;
use anyhow::{Context, Result, anyhow};
use std::sync::Arc;
use tracing::{debug, warn};

/// Key of the serialized slot list in storage.
pub const STORAGE_KEY: &str = "stock_tickers_data";

/// Ordered stock slots kept in sync with a [`Storage`].
///
/// Storage failures never escape: they are recorded as an error string and
/// the registry keeps working in memory. After a failed write nothing more is
/// written for the lifetime of the registry.
pub struct StockRegistry {
    storage: Arc<dyn Storage>,
    defaults: Vec<Slot>,
    slots: Vec<Slot>,
    error: Option<String>,
    in_memory_only: bool,
}

impl StockRegistry {
    /// Reads the stored list, falling back to `defaults` when nothing is
    /// stored or the stored data cannot be read.
    pub fn load(storage: Arc<dyn Storage>, defaults: Vec<Slot>) -> Self {
        let mut registry = Self {
            storage,
            slots: defaults.clone(),
            defaults,
            error: None,
            in_memory_only: false,
        };

        match registry.read_stored() {
            Ok(Some(slots)) => {
                debug!(count = slots.len(), "Loaded stocks from storage");
                registry.slots = slots;
            }
            Ok(None) => debug!("No stored stocks, using defaults"),
            Err(e) => {
                warn!(error = %e, "Failed to load stocks, using defaults");
                registry.error = Some(format!("Failed to load stocks: {e:#}"));
            }
        }
        registry
    }

    fn read_stored(&self) -> Result<Option<Vec<Slot>>> {
        let Some(raw) = self.storage.get(STORAGE_KEY)? else {
            return Ok(None);
        };
        let slots = serde_json::from_str(&raw).context("Stored stock list is malformed")?;
        Ok(Some(slots))
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Filled entries in registry order.
    pub fn entries(&self) -> impl Iterator<Item = &StockEntry> {
        self.slots.iter().filter_map(Slot::entry)
    }

    pub fn find(&self, id: u32) -> Option<&StockEntry> {
        self.entries().find(|e| e.id == id)
    }

    /// Last storage error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_in_memory_only(&self) -> bool {
        self.in_memory_only
    }

    /// Replaces the whole list and writes it to storage.
    pub fn replace(&mut self, slots: Vec<Slot>) {
        self.slots = slots;
        self.write_through();
    }

    /// Replaces the list with a function of the previous one.
    pub fn update<F>(&mut self, transform: F)
    where
        F: FnOnce(&[Slot]) -> Vec<Slot>,
    {
        let next = transform(&self.slots);
        self.replace(next);
    }

    /// Saves a filter on a stock, mirroring its country into the entry.
    pub fn save_filter(&mut self, id: u32, filter: FilterModel) -> Result<()> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.entry().is_some_and(|e| e.id == id))
            .ok_or_else(|| anyhow!("No stock with id {}", id))?;

        self.update(|prev| {
            let mut next = prev.to_vec();
            if let Some(entry) = next[index].entry_mut() {
                entry.apply_filter(filter);
            }
            next
        });
        debug!(id, "Filter saved");
        Ok(())
    }

    /// Removes the stored list and resets to the defaults.
    pub fn clear(&mut self) {
        self.error = None;
        if let Err(e) = self.storage.remove(STORAGE_KEY) {
            warn!(error = %e, "Failed to clear stored stocks");
            self.error = Some(format!("Failed to clear stocks: {e:#}"));
        }
        self.slots = self.defaults.clone();
        debug!("Registry cleared");
    }

    fn write_through(&mut self) {
        if self.in_memory_only {
            debug!("Registry is in-memory only, skipping write");
            return;
        }
        let result = serde_json::to_string(&self.slots)
            .context("Failed to serialize stocks")
            .and_then(|json| self.storage.set(STORAGE_KEY, &json));

        if let Err(e) = result {
            warn!(error = %e, "Failed to save stocks, continuing in memory");
            self.error = Some(format!("Failed to save stocks: {e:#}"));
            self.in_memory_only = true;
        }
    }
}
