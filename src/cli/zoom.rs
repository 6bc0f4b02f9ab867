use super::ui;
use crate::core::export::{ExportSink, FileExportSink, export_file_name, table_to_csv};
use crate::core::{FinancialDataProvider, Intent, Session, TableData};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Fetches the table shown on the zoom-in page.
pub async fn zoomed_table(
    session: &Session,
    provider: &dyn FinancialDataProvider,
) -> Result<(String, TableData)> {
    let (id, tab) = session.zoom().context("Nothing is zoomed in")?;
    let entry = session
        .registry()
        .find(id)
        .with_context(|| format!("No stock with id {id}"))?;
    let data = provider.fetch_table(entry, tab).await?;
    Ok((entry.name.clone(), data))
}

/// Exports the zoomed table as CSV, returning where it was written.
pub async fn export(
    session: &Session,
    provider: &dyn FinancialDataProvider,
    sink: &dyn ExportSink,
) -> Result<String> {
    let (stock_name, data) = zoomed_table(session, provider).await?;
    let contents = table_to_csv(&data, &stock_name, &data.title)?;
    sink.export(&export_file_name(&data), &contents)
}

pub async fn render(session: &Session, provider: &dyn FinancialDataProvider) -> Result<String> {
    let (stock_name, data) = zoomed_table(session, provider).await?;
    Ok(format!(
        "{} {}\n\n{}",
        ui::style_text(&stock_name, ui::StyleType::Title),
        ui::style_text(&data.title, ui::StyleType::Subtle),
        ui::render_table(&data)
    ))
}

pub async fn run(
    session: &mut Session,
    provider: &dyn FinancialDataProvider,
    stock: Option<u32>,
    tab: Option<&str>,
    export_dir: Option<PathBuf>,
) -> Result<()> {
    if let Some(id) = stock {
        session.dispatch(Intent::Click(id))?;
    }
    if let Some(tab) = tab {
        session.dispatch(Intent::SelectTab(tab.to_string()))?;
    }
    session.dispatch(Intent::Zoom)?;

    println!("{}", render(session, provider).await?);

    if let Some(dir) = export_dir {
        let location = export(session, provider, &FileExportSink::new(dir)).await?;
        println!(
            "\nExported to {}",
            ui::style_text(&location, ui::StyleType::Highlight)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Route;
    use crate::core::provider::MockFinancialDataProvider;
    use crate::core::stock::placeholder_slots;
    use crate::store::memory::MemoryStorage;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSink {
        files: Mutex<Vec<(String, String)>>,
    }

    impl ExportSink for RecordingSink {
        fn export(&self, file_name: &str, contents: &str) -> Result<String> {
            self.files
                .lock()
                .unwrap()
                .push((file_name.to_string(), contents.to_string()));
            Ok(file_name.to_string())
        }
    }

    fn zoomed_session() -> Session {
        let mut session = Session::start(
            Arc::new(MemoryStorage::new()),
            placeholder_slots(0),
            "US",
            Route::Overview,
        );
        session
            .dispatch(Intent::AddStock {
                name: "Apple".to_string(),
                ticker: "AAPL".to_string(),
            })
            .unwrap();
        session
            .dispatch(Intent::SelectTab("fcff".to_string()))
            .unwrap();
        session.dispatch(Intent::Zoom).unwrap();
        session
    }

    #[tokio::test]
    async fn test_export_writes_csv_for_zoomed_table() {
        let session = zoomed_session();
        let provider = MockFinancialDataProvider::new();
        let sink = RecordingSink::default();

        let location = export(&session, &provider, &sink).await.unwrap();
        assert!(location.starts_with("aapl_fcff_"));

        let files = sink.files.lock().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].1.starts_with("FCFF\nStock: Apple\nTab: FCFF\n\n"));
    }

    #[tokio::test]
    async fn test_render_requires_zoom() {
        let session = Session::start(
            Arc::new(MemoryStorage::new()),
            placeholder_slots(0),
            "US",
            Route::Overview,
        );
        let provider = MockFinancialDataProvider::new();
        assert!(render(&session, &provider).await.is_err());
    }
}
