//! Back-navigation guard that turns "back" on primary pages into a logout
//! confirmation.

use super::route::Route;
use anyhow::{Result, bail};
use tracing::debug;

/// Navigation history, most recent entry last.
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    entries: Vec<Route>,
}

impl NavigationHistory {
    pub fn push(&mut self, route: Route) {
        self.entries.push(route);
    }

    /// Pops the current entry and returns the one now on top.
    pub fn back(&mut self) -> Option<Route> {
        self.entries.pop();
        self.entries.last().copied()
    }

}

#[cfg(test)]
impl NavigationHistory {
    pub(crate) fn current(&self) -> Option<Route> {
        self.entries.last().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Idle,
    ConfirmPending,
    LoggedOut,
}

/// Keeps a synthetic history entry on top of a guarded page so that a back
/// action lands on the page again instead of leaving it.
#[derive(Debug, Clone)]
pub struct LogoutGuard {
    route: Route,
    state: GuardState,
}

impl LogoutGuard {
    /// Arms the guard for `route`, pushing the synthetic entry.
    pub fn arm(route: Route, history: &mut NavigationHistory) -> Self {
        history.push(route);
        debug!(%route, "Back guard armed");
        Self {
            route,
            state: GuardState::Idle,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Handles a back action that already popped the synthetic entry: asks
    /// for confirmation and re-arms.
    pub fn on_back(&mut self, history: &mut NavigationHistory) {
        if self.state == GuardState::LoggedOut {
            return;
        }
        self.state = GuardState::ConfirmPending;
        history.push(self.route);
        debug!(route = %self.route, "Back intercepted, logout confirmation pending");
    }

    /// Logout picked from the profile menu: asks for confirmation without
    /// touching the history.
    pub fn request_logout(&mut self) {
        if self.state == GuardState::Idle {
            self.state = GuardState::ConfirmPending;
            debug!(route = %self.route, "Logout requested, confirmation pending");
        }
    }

    /// Confirms the logout. The caller clears storage; the returned route is
    /// where to go next.
    pub fn confirm(&mut self) -> Result<Route> {
        if self.state != GuardState::ConfirmPending {
            bail!("No logout confirmation is pending");
        }
        self.state = GuardState::LoggedOut;
        debug!("Logout confirmed");
        Ok(Route::SignIn)
    }

    pub fn cancel(&mut self) {
        if self.state == GuardState::ConfirmPending {
            debug!("Logout cancelled");
            self.state = GuardState::Idle;
        }
    }
}
