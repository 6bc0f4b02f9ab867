//! Stock entries and the slots that hold them

use super::filter::FilterModel;
use serde::{Deserialize, Serialize};

/// A tracked stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub id: u32,
    pub name: String,
    pub ticker: String,
    pub country_name: String,
    #[serde(default)]
    pub filter_data: Option<FilterModel>,
}

impl StockEntry {
    /// Creates an entry with a normalized ticker. An empty name falls back to
    /// the ticker, as happens when a raw search term is submitted.
    pub fn new(id: u32, name: &str, ticker: &str, country_name: &str) -> Self {
        let ticker = ticker.trim().to_uppercase();
        let name = match name.trim() {
            "" => ticker.clone(),
            name => name.to_string(),
        };
        Self {
            id,
            name,
            ticker,
            country_name: country_name.to_string(),
            filter_data: None,
        }
    }

    /// Attaches a saved filter, mirroring its country into the entry.
    pub fn apply_filter(&mut self, filter: FilterModel) {
        self.country_name = filter.country_of_incorporation.clone();
        self.filter_data = Some(filter);
    }
}

/// One position in the registry: either waiting for a stock or holding one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slot", rename_all = "camelCase")]
pub enum Slot {
    Placeholder,
    Filled(StockEntry),
}

impl Slot {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Slot::Placeholder)
    }

    pub fn entry(&self) -> Option<&StockEntry> {
        match self {
            Slot::Filled(entry) => Some(entry),
            Slot::Placeholder => None,
        }
    }

    pub fn entry_mut(&mut self) -> Option<&mut StockEntry> {
        match self {
            Slot::Filled(entry) => Some(entry),
            Slot::Placeholder => None,
        }
    }
}

pub fn placeholder_slots(count: usize) -> Vec<Slot> {
    vec![Slot::Placeholder; count]
}

/// Next free id: one past the largest id in use, starting at 1. `None` once
/// the largest id is `u32::MAX`.
pub fn next_id(slots: &[Slot]) -> Option<u32> {
    slots
        .iter()
        .filter_map(Slot::entry)
        .map(|e| e.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
}
