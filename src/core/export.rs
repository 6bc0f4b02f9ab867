//! CSV export of a zoomed-in table

use super::provider::TableData;
use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where exported files go.
pub trait ExportSink: Send + Sync {
    /// Stores `contents` under `file_name`, returning where it ended up.
    fn export(&self, file_name: &str, contents: &str) -> Result<String>;
}

/// Renders a table as CSV: a short preamble (title, stock, tab, blank line)
/// followed by the fully quoted header and rows.
pub fn table_to_csv(table: &TableData, stock_name: &str, tab_name: &str) -> Result<String> {
    let mut buf = Vec::new();
    writeln!(buf, "{}", table.title)?;
    writeln!(buf, "Stock: {stock_name}")?;
    writeln!(buf, "Tab: {tab_name}")?;
    writeln!(buf)?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buf);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(std::iter::once(&row.label).chain(row.values.iter()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

/// `<table id>_<unix millis>.csv`
pub fn export_file_name(table: &TableData) -> String {
    format!("{}_{}.csv", table.id, chrono::Utc::now().timestamp_millis())
}

/// Writes exports as files into a directory.
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ExportSink for FileExportSink {
    fn export(&self, file_name: &str, contents: &str) -> Result<String> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write export to {}", path.display()))?;
        info!(path = %path.display(), "Exported table");
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::TableRow;
    use tempfile::TempDir;

    fn table() -> TableData {
        TableData {
            id: "aapl_past-year".to_string(),
            title: "Past Year".to_string(),
            columns: vec!["Item".to_string(), "Year 1".to_string()],
            rows: vec![
                TableRow {
                    label: "Revenues".to_string(),
                    values: vec!["1,000".to_string()],
                },
                TableRow {
                    label: "Note \"adj\"".to_string(),
                    values: vec!["-".to_string()],
                },
            ],
        }
    }

    #[test]
    fn test_table_to_csv_layout() {
        let csv = table_to_csv(&table(), "Apple", "Past Year").unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Past Year");
        assert_eq!(lines[1], "Stock: Apple");
        assert_eq!(lines[2], "Tab: Past Year");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], r#""Item","Year 1""#);
        assert_eq!(lines[5], r#""Revenues","1,000""#);
        assert_eq!(lines[6], r#""Note ""adj""","-""#);
    }

    #[test]
    fn test_export_file_name() {
        let name = export_file_name(&table());
        assert!(name.starts_with("aapl_past-year_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_file_export_sink_writes_file() -> Result<()> {
        let dir = TempDir::new()?;
        let sink = FileExportSink::new(dir.path().join("exports"));

        let location = sink.export("t.csv", "a,b\n")?;
        assert!(location.ends_with("t.csv"));
        assert_eq!(std::fs::read_to_string(dir.path().join("exports/t.csv"))?, "a,b\n");
        Ok(())
    }
}
