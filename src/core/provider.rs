//! Financial data abstractions and the mock provider behind the tables

use super::overview::COMPARE_METRICS;
use super::stock::StockEntry;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub label: String,
    pub values: Vec<String>,
}

/// A titled table as shown on the overview and zoom-in screens. `columns`
/// includes the label column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub id: String,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[async_trait]
pub trait FinancialDataProvider: Send + Sync {
    /// The table behind one overview tab for a stock.
    async fn fetch_table(&self, stock: &StockEntry, tab: &str) -> Result<TableData>;

    /// One value per compare metric, in metric order.
    async fn compare_values(&self, stock: &StockEntry) -> Result<Vec<String>>;
}

/// Turns a title into an identifier: lowercase words joined by `-`.
pub fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

const MOCK_ROWS: [&str; 6] = [
    "Revenues",
    "Operating income (EBIT)",
    "Net income",
    "Cash flow from operations",
    "Invested capital",
    "Return on invested capital",
];

/// Data provider with no data source: tables have the real shape and `-` in
/// every cell. Only the country is known.
pub struct MockFinancialDataProvider {
    years: usize,
}

impl MockFinancialDataProvider {
    pub fn new() -> Self {
        Self { years: 5 }
    }
}

impl Default for MockFinancialDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FinancialDataProvider for MockFinancialDataProvider {
    async fn fetch_table(&self, stock: &StockEntry, tab: &str) -> Result<TableData> {
        let mut columns = vec!["Item".to_string()];
        columns.extend((1..=self.years).map(|year| format!("Year {year}")));

        let rows = MOCK_ROWS
            .iter()
            .map(|label| TableRow {
                label: label.to_string(),
                values: vec!["-".to_string(); self.years],
            })
            .collect();

        Ok(TableData {
            id: format!("{}_{}", slugify(&stock.ticker), slugify(tab)),
            title: tab.to_string(),
            columns,
            rows,
        })
    }

    async fn compare_values(&self, stock: &StockEntry) -> Result<Vec<String>> {
        Ok(COMPARE_METRICS
            .iter()
            .map(|metric| match *metric {
                "Country" => stock.country_name.clone(),
                _ => "-".to_string(),
            })
            .collect())
    }
}
