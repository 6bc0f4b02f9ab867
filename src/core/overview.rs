//! Overview and compare projections over the registry

use super::registry::StockRegistry;
use super::stock::{Slot, StockEntry, next_id};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Tabs of the overview screen, in menu order.
pub const OVERVIEW_TABS: [&str; 31] = [
    "Final Output",
    "Past Year",
    "Input Sheet",
    "Cost of Capital",
    "Valuation",
    "Valuation Output",
    "Valuation Output (Historical)",
    "CFO/OI",
    "CFO/OI (LFY)",
    "CFO/OI (Historical)",
    "CFO/Revenue",
    "CFO/Revenue (LFY)",
    "CFO/Revenue (Historical)",
    "FCFF",
    "FCFF (LFY)",
    "FCFF (Historical)",
    "Company Analysis",
    "R&D Converter",
    "Diagnostics",
    "Summary Sheet",
    "Operating Lease",
    "Country Equity Risk",
    "Synthetic Rating",
    "Industry Average (US)",
    "Industry Average (Global)",
    "Trailing 12 Month",
    "Answer Keys",
    "Property Valuation",
    "Stories to Numbers",
    "Option Value",
    "Simulation Sheet",
];

pub const DEFAULT_TAB: &str = "Past Year";

/// Rows of the compare matrix.
pub const COMPARE_METRICS: [&str; 15] = [
    "Score",
    "Category",
    "Country",
    "Currency",
    "market cap",
    "Net cost with market cap (both columns)",
    "PP1 (both columns)",
    "%cost",
    "%mkap",
    "PP2 (both columns)",
    "%cost",
    "%mkap",
    "Goodwill/intangible %",
    "Non controlling %",
    "Net debt",
];

/// Case-insensitive tab lookup.
pub fn find_tab(name: &str) -> Option<&'static str> {
    OVERVIEW_TABS
        .iter()
        .find(|tab| tab.eq_ignore_ascii_case(name.trim()))
        .copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Overview,
    Compare,
}

/// Selection state of the overview screen. Both modes read the same
/// registry; only one selection is live at a time.
#[derive(Debug, Clone)]
pub struct OverviewState {
    mode: ViewMode,
    active_tab: &'static str,
    selected: Option<u32>,
    comparison: Vec<u32>,
}

impl Default for OverviewState {
    fn default() -> Self {
        Self {
            mode: ViewMode::Overview,
            active_tab: DEFAULT_TAB,
            selected: None,
            comparison: Vec::new(),
        }
    }
}

impl OverviewState {
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn active_tab(&self) -> &'static str {
        self.active_tab
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// Comparison set in insertion order.
    pub fn comparison(&self) -> &[u32] {
        &self.comparison
    }

    /// Picking a tab returns to overview mode.
    pub fn select_tab(&mut self, tab: &'static str) {
        self.active_tab = tab;
        if self.mode == ViewMode::Compare {
            debug!("Leaving compare mode");
            self.mode = ViewMode::Overview;
            self.comparison.clear();
        }
    }

    pub fn enter_compare(&mut self) {
        debug!("Entering compare mode");
        self.mode = ViewMode::Compare;
        self.comparison.clear();
    }

    pub fn select_single(&mut self, id: u32) {
        self.selected = Some(id);
    }

    /// Adds `id` to the comparison set, or removes it if already there.
    pub fn toggle_comparison(&mut self, id: u32) {
        if let Some(pos) = self.comparison.iter().position(|c| *c == id) {
            self.comparison.remove(pos);
        } else {
            self.comparison.push(id);
        }
    }

    /// A click on a stock card: single selection or comparison toggle
    /// depending on the mode.
    pub fn click(&mut self, id: u32) {
        match self.mode {
            ViewMode::Overview => self.select_single(id),
            ViewMode::Compare => self.toggle_comparison(id),
        }
    }

    /// Re-derives selection after the registry changed: drops ids that no
    /// longer exist and auto-selects the first stock if nothing is selected.
    pub fn sync(&mut self, slots: &[Slot]) {
        let exists = |id: u32| slots.iter().filter_map(Slot::entry).any(|e| e.id == id);

        if self.selected.is_some_and(|id| !exists(id)) {
            self.selected = None;
        }
        self.comparison.retain(|id| exists(*id));

        if self.selected.is_none() {
            self.selected = slots.iter().filter_map(Slot::entry).map(|e| e.id).next();
        }
    }
}

/// Appends a stock with the next free id, the way the overview screen adds
/// stocks (no slot filling). `None` when no id is left.
pub fn append_stock(
    registry: &mut StockRegistry,
    name: &str,
    ticker: &str,
    country: &str,
) -> Option<u32> {
    let Some(id) = next_id(registry.slots()) else {
        warn!(ticker, "No stock id left");
        return None;
    };
    let entry = StockEntry::new(id, name, ticker, country);
    debug!(id, ticker = %entry.ticker, "Appending stock");
    registry.update(move |prev| {
        let mut next = prev.to_vec();
        next.push(Slot::Filled(entry));
        next
    });
    Some(id)
}

/// Side-by-side matrix of the stocks being compared.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareMatrix {
    /// `(name, ticker)` per column, in comparison order.
    pub columns: Vec<(String, String)>,
    /// Metric label and one value per column.
    pub rows: Vec<(String, Vec<String>)>,
}

impl CompareMatrix {
    /// Builds the matrix from the comparison set. `values` holds one value per
    /// metric for each stock; missing values show as `-`.
    pub fn build(
        slots: &[Slot],
        comparison: &[u32],
        values: &HashMap<u32, Vec<String>>,
    ) -> Self {
        let stocks: Vec<&StockEntry> = comparison
            .iter()
            .filter_map(|id| slots.iter().filter_map(Slot::entry).find(|e| e.id == *id))
            .collect();

        let columns = stocks
            .iter()
            .map(|e| (e.name.clone(), e.ticker.clone()))
            .collect();

        let rows = COMPARE_METRICS
            .iter()
            .enumerate()
            .map(|(row, metric)| {
                let cells = stocks
                    .iter()
                    .map(|e| {
                        values
                            .get(&e.id)
                            .and_then(|v| v.get(row))
                            .cloned()
                            .unwrap_or_else(|| "-".to_string())
                    })
                    .collect();
                (metric.to_string(), cells)
            })
            .collect();

        Self { columns, rows }
    }
}
