//! Add-ticker grid: fixed slots that fill up as stocks are added

use super::registry::StockRegistry;
use super::stock::{Slot, StockEntry, next_id};
use tracing::{debug, warn};

/// One card of the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridCard {
    Add,
    Stock {
        id: u32,
        name: String,
        ticker: String,
        country: String,
        has_filter: bool,
    },
}

/// Fills the first placeholder with a new stock. When that leaves no open
/// slot a fresh placeholder is appended, so the grid always offers one.
///
/// Returns the id of the new stock, or `None` when there was no placeholder
/// or no id left.
pub fn add_stock(
    registry: &mut StockRegistry,
    name: &str,
    ticker: &str,
    country: &str,
) -> Option<u32> {
    let Some(index) = registry.slots().iter().position(Slot::is_placeholder) else {
        warn!(ticker, "No open slot to add stock to");
        return None;
    };
    let Some(id) = next_id(registry.slots()) else {
        warn!(ticker, "No stock id left");
        return None;
    };
    let entry = StockEntry::new(id, name, ticker, country);
    debug!(id, ticker = %entry.ticker, index, "Filling grid slot");

    registry.update(move |prev| {
        let mut next = prev.to_vec();
        next[index] = Slot::Filled(entry);
        if !next.iter().any(Slot::is_placeholder) {
            next.push(Slot::Placeholder);
        }
        next
    });
    Some(id)
}

/// The "continue" action needs at least one stock.
pub fn can_continue(slots: &[Slot]) -> bool {
    slots.iter().any(|slot| !slot.is_placeholder())
}

pub fn cards(slots: &[Slot]) -> Vec<GridCard> {
    slots
        .iter()
        .map(|slot| match slot {
            Slot::Placeholder => GridCard::Add,
            Slot::Filled(entry) => GridCard::Stock {
                id: entry.id,
                name: entry.name.clone(),
                ticker: entry.ticker.clone(),
                country: entry.country_name.clone(),
                has_filter: entry.filter_data.is_some(),
            },
        })
        .collect()
}
