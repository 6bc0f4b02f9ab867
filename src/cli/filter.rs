use super::ui;
use crate::core::{FilterDialog, FilterField, Intent, Session};
use anyhow::{Context, Result};
use comfy_table::Cell;

/// Splits a `key=value` assignment.
pub fn parse_assignment(assignment: &str) -> Result<(FilterField, String)> {
    let (key, value) = assignment
        .split_once('=')
        .with_context(|| format!("Expected key=value, got '{assignment}'"))?;
    Ok((key.parse()?, value.to_string()))
}

/// Renders the visible fields of the dialog with their current display text.
pub fn render_dialog(dialog: &FilterDialog) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Field"),
        ui::header_cell("Key"),
        ui::header_cell("Value"),
    ]);
    for field in dialog.visible_fields() {
        let label = if dialog.focused() == Some(field) {
            ui::style_text(field.label(), ui::StyleType::Highlight)
        } else {
            field.label().to_string()
        };
        table.add_row(vec![
            Cell::new(label),
            Cell::new(ui::style_text(field.key(), ui::StyleType::Subtle)),
            Cell::new(dialog.display(field)),
        ]);
    }
    format!(
        "Filter: {}\n\n{}",
        ui::style_text(dialog.stock_name(), ui::StyleType::Title),
        table
    )
}

/// Opens the filter of stock `id`, applies each assignment the way a user
/// would type it (focus, input, blur) and saves when anything was set.
pub fn run(session: &mut Session, id: u32, assignments: &[String]) -> Result<()> {
    session.dispatch(Intent::OpenFilter(id))?;

    for assignment in assignments {
        let (field, value) = parse_assignment(assignment)?;
        session.dispatch(Intent::Focus(field))?;
        session.dispatch(Intent::Input(field, value))?;
        session.dispatch(Intent::Blur)?;
    }

    if let Some(dialog) = session.filter() {
        println!("{}", render_dialog(dialog));
    }

    if assignments.is_empty() {
        session.dispatch(Intent::CloseFilter)?;
    } else {
        session.dispatch(Intent::SubmitFilter)?;
        println!(
            "\n{}",
            ui::style_text("Filter saved", ui::StyleType::Highlight)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Route;
    use crate::core::stock::placeholder_slots;
    use crate::store::memory::MemoryStorage;
    use std::sync::Arc;

    fn session() -> Session {
        let mut session = Session::start(
            Arc::new(MemoryStorage::new()),
            placeholder_slots(1),
            "US",
            Route::AddTicker,
        );
        session
            .dispatch(Intent::AddStock {
                name: "Apple".to_string(),
                ticker: "AAPL".to_string(),
            })
            .unwrap();
        session
    }

    #[test]
    fn test_parse_assignment() {
        let (field, value) = parse_assignment("trappedCashValue=$1,200").unwrap();
        assert_eq!(field, FilterField::TrappedCash);
        assert_eq!(value, "$1,200");

        assert!(parse_assignment("trappedCashValue").is_err());
        assert!(parse_assignment("nope=1").is_err());
    }

    #[test]
    fn test_run_saves_assignments() {
        let mut session = session();
        let sets = vec![
            "trappedCashAssumption=yes".to_string(),
            "trappedCashValue=1234.5".to_string(),
        ];
        run(&mut session, 1, &sets).unwrap();

        let saved = session.registry().find(1).unwrap().filter_data.clone().unwrap();
        assert!(saved.override_trapped_cash);
        assert_eq!(saved.trapped_cash, 1234.5);
        assert!(session.filter().is_none());
    }

    #[test]
    fn test_run_without_assignments_does_not_save() {
        let mut session = session();
        run(&mut session, 1, &[]).unwrap();
        assert!(session.registry().find(1).unwrap().filter_data.is_none());
    }

    #[test]
    fn test_render_dialog_formats_unfocused_currency() {
        let session = session();
        let mut dialog = FilterDialog::open(session.registry().find(1).unwrap());
        dialog.input(FilterField::OverrideTrappedCash, "yes").unwrap();
        dialog.input(FilterField::TrappedCash, "1234.5").unwrap();

        let rendered = render_dialog(&dialog);
        assert!(rendered.contains("$1,234.50"));
    }
}
