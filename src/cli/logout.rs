use super::ui;
use crate::core::{Intent, Session};
use anyhow::Result;
use console::Term;

const PROMPT: &str = "Log out and clear your stocks? [y/N] ";

/// Asks on the terminal whether to go ahead with the logout.
pub fn ask_confirmation() -> Result<bool> {
    let term = Term::stdout();
    term.write_str(PROMPT)?;
    let answer = term.read_line()?;
    Ok(is_yes(&answer))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Confirms or cancels a pending logout.
pub fn resolve(session: &mut Session, confirmed: bool) -> Result<()> {
    if confirmed {
        session.dispatch(Intent::ConfirmLogout)?;
        println!(
            "{}",
            ui::style_text("Logged out, stored stocks cleared", ui::StyleType::Highlight)
        );
    } else {
        session.dispatch(Intent::CancelLogout)?;
        println!("Staying on {}", session.route());
    }
    Ok(())
}

/// Logs out from the profile menu of the overview.
pub fn run(session: &mut Session, yes: bool) -> Result<()> {
    session.dispatch(Intent::Logout)?;
    let confirmed = yes || ask_confirmation()?;
    resolve(session, confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Route;
    use crate::core::registry::STORAGE_KEY;
    use crate::core::stock::placeholder_slots;
    use crate::store::Storage;
    use crate::store::memory::MemoryStorage;
    use std::sync::Arc;

    fn session(storage: Arc<MemoryStorage>) -> Session {
        let mut session =
            Session::start(storage, placeholder_slots(3), "US", Route::Overview);
        session
            .dispatch(Intent::AddStock {
                name: "Apple".to_string(),
                ticker: "AAPL".to_string(),
            })
            .unwrap();
        session
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES\n"));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn test_run_with_yes_clears_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = session(storage.clone());

        run(&mut session, true).unwrap();
        assert_eq!(session.route(), Route::SignIn);
        assert!(storage.get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_run_does_not_touch_history() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = session(storage.clone());
        let before = session.history().len();

        session.dispatch(Intent::Logout).unwrap();
        assert_eq!(session.history().len(), before);
        resolve(&mut session, false).unwrap();
        assert_eq!(session.history().len(), before);
    }

    #[test]
    fn test_declined_logout_keeps_stocks() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = session(storage.clone());

        session.dispatch(Intent::Logout).unwrap();
        resolve(&mut session, false).unwrap();
        assert_eq!(session.route(), Route::Overview);
        assert!(!session.logout_pending());
        assert!(storage.get(STORAGE_KEY).unwrap().is_some());
    }
}
