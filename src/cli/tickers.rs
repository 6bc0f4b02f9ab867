use super::ui;
use crate::core::grid::{self, GridCard};
use crate::core::{Intent, Session};
use anyhow::Result;
use comfy_table::Cell;

/// Renders the add-ticker grid, one row per slot.
pub fn render_grid(session: &Session) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Stock"),
        ui::header_cell("Ticker"),
        ui::header_cell("Country"),
        ui::header_cell("Filter"),
    ]);

    for (slot, card) in grid::cards(session.registry().slots()).iter().enumerate() {
        match card {
            GridCard::Add => {
                table.add_row(vec![
                    Cell::new(slot + 1),
                    Cell::new(ui::style_text("+ Add ticker", ui::StyleType::Subtle)),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(""),
                ]);
            }
            GridCard::Stock {
                id,
                name,
                ticker,
                country,
                has_filter,
            } => {
                table.add_row(vec![
                    Cell::new(slot + 1),
                    Cell::new(format!("{name} (id {id})")),
                    Cell::new(ticker),
                    Cell::new(country),
                    Cell::new(if *has_filter { "saved" } else { "-" }),
                ]);
            }
        }
    }

    let mut output = format!(
        "{}\n\n{}",
        ui::style_text("Add Tickers", ui::StyleType::Title),
        table
    );
    if let Some(error) = session.registry().error() {
        output.push_str(&format!("\n\n{}", ui::style_text(error, ui::StyleType::Error)));
    }
    if session.registry().is_in_memory_only() {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text("Changes are not being saved", ui::StyleType::Error)
        ));
    }
    output
}

pub fn show(session: &Session) -> Result<()> {
    println!("{}", render_grid(session));
    Ok(())
}

pub fn add(session: &mut Session, ticker: &str, name: &str) -> Result<()> {
    let before = session.registry().entries().count();
    session.dispatch(Intent::AddStock {
        name: name.to_string(),
        ticker: ticker.to_string(),
    })?;
    if session.registry().entries().count() == before {
        anyhow::bail!("No open slot for {}", ticker);
    }
    println!("{}", render_grid(session));
    Ok(())
}
