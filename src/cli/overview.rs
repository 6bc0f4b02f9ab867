use super::ui;
use crate::core::overview::{CompareMatrix, OVERVIEW_TABS, ViewMode};
use crate::core::{FinancialDataProvider, Intent, Session, StockEntry};
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;
use std::collections::HashMap;
use tracing::warn;

/// The stock list of the overview screen, marking the selection (or the
/// comparison set in compare mode).
pub fn render_stock_list(session: &Session) -> String {
    let state = session.overview();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Id"),
        ui::header_cell("Stock"),
        ui::header_cell("Ticker"),
        ui::header_cell("Country"),
    ]);

    for entry in session.registry().entries() {
        let marked = match state.mode() {
            ViewMode::Overview => state.selected() == Some(entry.id),
            ViewMode::Compare => state.comparison().contains(&entry.id),
        };
        table.add_row(vec![
            ui::marker_cell(marked),
            Cell::new(entry.id),
            Cell::new(&entry.name),
            Cell::new(&entry.ticker),
            Cell::new(&entry.country_name),
        ]);
    }
    table.to_string()
}

pub fn render_tabs(active: &str) -> String {
    OVERVIEW_TABS
        .iter()
        .map(|tab| {
            if *tab == active {
                ui::style_text(&format!("[{tab}]"), ui::StyleType::Highlight)
            } else {
                ui::style_text(tab, ui::StyleType::Subtle)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Renders the overview page: stocks, tab menu and the active table.
pub async fn render(session: &Session, provider: &dyn FinancialDataProvider) -> Result<String> {
    let mut output = format!(
        "{}\n\n{}\n\n{}",
        ui::style_text("Overview", ui::StyleType::Title),
        render_stock_list(session),
        render_tabs(session.overview().active_tab())
    );

    let Some(entry) = selected_entry(session) else {
        output.push_str("\n\nNo stocks added yet.");
        return Ok(output);
    };
    let data = provider
        .fetch_table(entry, session.overview().active_tab())
        .await?;
    output.push_str(&format!(
        "\n\n{} {}\n{}",
        ui::style_text(&entry.name, ui::StyleType::Label),
        ui::style_text(&data.title, ui::StyleType::Subtle),
        ui::render_table(&data)
    ));
    Ok(output)
}

pub async fn run(
    session: &mut Session,
    provider: &dyn FinancialDataProvider,
    stock: Option<u32>,
    tab: Option<&str>,
) -> Result<()> {
    if let Some(id) = stock {
        session.dispatch(Intent::Click(id))?;
    }
    if let Some(tab) = tab {
        session.dispatch(Intent::SelectTab(tab.to_string()))?;
    }
    println!("{}", render(session, provider).await?);
    Ok(())
}

/// Fetches compare values for the comparison set concurrently. Stocks whose
/// values fail to load are shown with `-`.
pub async fn fetch_compare_values(
    session: &Session,
    provider: &dyn FinancialDataProvider,
) -> HashMap<u32, Vec<String>> {
    let stocks: Vec<&StockEntry> = session
        .overview()
        .comparison()
        .iter()
        .filter_map(|id| session.registry().find(*id))
        .collect();

    let pb = ui::new_progress_bar(stocks.len() as u64);
    let futures = stocks.iter().map(|entry| {
        let pb_clone = pb.clone();
        async move {
            let res = provider.compare_values(entry).await;
            pb_clone.inc(1);
            (entry.id, res)
        }
    });
    let results = join_all(futures).await;
    pb.finish_and_clear();

    results
        .into_iter()
        .filter_map(|(id, res)| match res {
            Ok(values) => Some((id, values)),
            Err(e) => {
                warn!(id, error = %e, "Failed to load compare values");
                None
            }
        })
        .collect()
}

pub fn render_matrix(matrix: &CompareMatrix) -> String {
    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Metric")];
    header.extend(
        matrix
            .columns
            .iter()
            .map(|(name, ticker)| ui::header_cell(&format!("{name}\n{ticker}"))),
    );
    table.set_header(header);

    for (metric, values) in &matrix.rows {
        let mut cells = vec![Cell::new(metric)];
        cells.extend(values.iter().map(|v| ui::value_cell(v)));
        table.add_row(cells);
    }
    table.to_string()
}

pub async fn compare(
    session: &mut Session,
    provider: &dyn FinancialDataProvider,
    ids: &[u32],
) -> Result<()> {
    session.dispatch(Intent::EnterCompare)?;
    for id in ids {
        session.dispatch(Intent::Click(*id))?;
    }
    println!("{}", render_compare(session, provider).await);
    Ok(())
}

pub async fn render_compare(session: &Session, provider: &dyn FinancialDataProvider) -> String {
    let values = fetch_compare_values(session, provider).await;
    let matrix = CompareMatrix::build(
        session.registry().slots(),
        session.overview().comparison(),
        &values,
    );
    if matrix.columns.is_empty() {
        return format!(
            "{}\n\nClick stocks to add them to the comparison.",
            render_stock_list(session)
        );
    }
    format!(
        "{}\n\n{}",
        ui::style_text("Compare", ui::StyleType::Title),
        render_matrix(&matrix)
    )
}

fn selected_entry(session: &Session) -> Option<&StockEntry> {
    session
        .overview()
        .selected()
        .and_then(|id| session.registry().find(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Route;
    use crate::core::provider::MockFinancialDataProvider;
    use crate::core::stock::placeholder_slots;
    use crate::store::memory::MemoryStorage;
    use std::sync::Arc;

    fn session_with_stocks() -> Session {
        let mut session = Session::start(
            Arc::new(MemoryStorage::new()),
            placeholder_slots(0),
            "US",
            Route::Overview,
        );
        for (name, ticker) in [("Apple", "AAPL"), ("Infosys", "INFY")] {
            session
                .dispatch(Intent::AddStock {
                    name: name.to_string(),
                    ticker: ticker.to_string(),
                })
                .unwrap();
        }
        session
    }

    #[tokio::test]
    async fn test_render_overview_shows_selected_table() {
        let session = session_with_stocks();
        let provider = MockFinancialDataProvider::new();

        let output = render(&session, &provider).await.unwrap();
        assert!(output.contains("Apple"));
        assert!(output.contains("Revenues"));
        assert!(output.contains("Past Year"));
    }

    #[tokio::test]
    async fn test_compare_renders_columns_in_click_order() {
        let mut session = session_with_stocks();
        let provider = MockFinancialDataProvider::new();

        session.dispatch(Intent::EnterCompare).unwrap();
        session.dispatch(Intent::Click(2)).unwrap();
        session.dispatch(Intent::Click(1)).unwrap();

        let output = render_compare(&session, &provider).await;
        let infy = output.find("INFY").unwrap();
        let aapl = output.find("AAPL").unwrap();
        assert!(infy < aapl);
        assert!(output.contains("Net debt"));
    }

    #[tokio::test]
    async fn test_compare_with_empty_set_prompts_for_selection() {
        let mut session = session_with_stocks();
        let provider = MockFinancialDataProvider::new();
        session.dispatch(Intent::EnterCompare).unwrap();

        let output = render_compare(&session, &provider).await;
        assert!(output.contains("Click stocks"));
    }
}
