use crate::core::provider::TableData;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Highlight,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Highlight => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Value cell; the `-` placeholder of mock data is dimmed.
pub fn value_cell(text: &str) -> Cell {
    if text == "-" {
        Cell::new(text)
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Center)
    } else {
        Cell::new(text).set_alignment(CellAlignment::Right)
    }
}

/// Cell marking the selected card in a list.
pub fn marker_cell(selected: bool) -> Cell {
    if selected {
        Cell::new("●").fg(Color::Green)
    } else {
        Cell::new("○").fg(Color::DarkGrey)
    }
}

/// Renders a financial table with its header row.
pub fn render_table(data: &TableData) -> Table {
    let mut table = new_styled_table();
    table.set_header(data.columns.iter().map(|c| header_cell(c)).collect::<Vec<_>>());
    for row in &data.rows {
        let mut cells = vec![Cell::new(&row.label).add_attribute(Attribute::Bold)];
        cells.extend(row.values.iter().map(|v| value_cell(v)));
        table.add_row(cells);
    }
    table
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(bar_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(bar_style.progress_chars("#>-"));
    }
    pb
}

/// Spinner shown while a simulated remote call is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::TableRow;

    #[test]
    fn test_render_table_contains_labels_and_values() {
        let data = TableData {
            id: "t".to_string(),
            title: "Past Year".to_string(),
            columns: vec!["Item".to_string(), "Year 1".to_string()],
            rows: vec![TableRow {
                label: "Revenues".to_string(),
                values: vec!["1,000".to_string()],
            }],
        };
        let rendered = render_table(&data).to_string();
        assert!(rendered.contains("Item"));
        assert!(rendered.contains("Revenues"));
        assert!(rendered.contains("1,000"));
    }
}
