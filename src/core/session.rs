//! A running dashboard session: the current page, its projections and the
//! intents that change them.

use super::filter::{FilterDialog, FilterField};
use super::grid;
use super::guard::{GuardState, LogoutGuard, NavigationHistory};
use super::overview::{self, OverviewState, find_tab};
use super::registry::StockRegistry;
use super::route::Route;
use super::stock::Slot;
use crate::store::Storage;
use anyhow::{Context, Result, anyhow, bail};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Something the user did.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Navigate(Route),
    AddStock { name: String, ticker: String },
    /// Leave the add-ticker grid for the overview.
    Continue,
    /// Click on a stock card in the overview list.
    Click(u32),
    EnterCompare,
    SelectTab(String),
    /// Open the zoom-in page for the selected stock and tab.
    Zoom,
    OpenFilter(u32),
    Focus(FilterField),
    Input(FilterField, String),
    Blur,
    SubmitFilter,
    CloseFilter,
    Back,
    /// Logout from the profile menu of a guarded page.
    Logout,
    ConfirmLogout,
    CancelLogout,
}

pub struct Session {
    storage: Arc<dyn Storage>,
    registry: StockRegistry,
    overview: OverviewState,
    history: NavigationHistory,
    guard: Option<LogoutGuard>,
    filter: Option<FilterDialog>,
    zoom: Option<(u32, &'static str)>,
    route: Route,
    default_country: String,
}

impl Session {
    /// Loads the registry and mounts `route`.
    pub fn start(
        storage: Arc<dyn Storage>,
        defaults: Vec<Slot>,
        default_country: &str,
        route: Route,
    ) -> Self {
        let registry = StockRegistry::load(Arc::clone(&storage), defaults);
        if let Some(error) = registry.error() {
            warn!(error, "Registry loaded with errors");
        }
        let mut session = Self {
            storage,
            registry,
            overview: OverviewState::default(),
            history: NavigationHistory::default(),
            guard: None,
            filter: None,
            zoom: None,
            route,
            default_country: default_country.to_string(),
        };
        session.mount(route);
        session
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn registry(&self) -> &StockRegistry {
        &self.registry
    }

    pub fn overview(&self) -> &OverviewState {
        &self.overview
    }

    pub fn filter(&self) -> Option<&FilterDialog> {
        self.filter.as_ref()
    }

    /// Stock id and tab shown on the zoom-in page.
    pub fn zoom(&self) -> Option<(u32, &'static str)> {
        self.zoom
    }

    pub fn logout_pending(&self) -> bool {
        self.guard
            .as_ref()
            .is_some_and(|g| g.state() == GuardState::ConfirmPending)
    }

    fn mount(&mut self, route: Route) {
        self.history.push(route);
        self.route = route;
        self.guard = route
            .is_guarded()
            .then(|| LogoutGuard::arm(route, &mut self.history));
        self.overview.sync(self.registry.slots());
        debug!(%route, "Mounted page");
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<()> {
        debug!(?intent, route = %self.route, "Dispatching intent");

        if self.logout_pending()
            && !matches!(
                intent,
                Intent::ConfirmLogout | Intent::CancelLogout | Intent::Back | Intent::Logout
            )
        {
            bail!("Confirm or cancel the logout first");
        }

        match intent {
            Intent::Navigate(route) => self.mount(route),
            Intent::AddStock { name, ticker } => self.add_stock(&name, &ticker)?,
            Intent::Continue => {
                self.expect_route(Route::AddTicker)?;
                if !grid::can_continue(self.registry.slots()) {
                    bail!("Add at least one stock to continue");
                }
                self.mount(Route::Overview);
            }
            Intent::Click(id) => {
                self.expect_route(Route::Overview)?;
                self.require_stock(id)?;
                self.overview.click(id);
            }
            Intent::EnterCompare => {
                self.expect_route(Route::Overview)?;
                self.overview.enter_compare();
            }
            Intent::SelectTab(name) => {
                self.expect_route(Route::Overview)?;
                let tab = find_tab(&name).ok_or_else(|| anyhow!("Unknown tab: {}", name))?;
                self.overview.select_tab(tab);
            }
            Intent::Zoom => {
                self.expect_route(Route::Overview)?;
                let id = self
                    .overview
                    .selected()
                    .context("Select a stock before zooming in")?;
                self.zoom = Some((id, self.overview.active_tab()));
                self.mount(Route::ZoomIn);
            }
            Intent::OpenFilter(id) => {
                let entry = self.require_stock(id)?;
                self.filter = Some(FilterDialog::open(entry));
            }
            Intent::Focus(field) => self.dialog()?.focus(field),
            Intent::Input(field, text) => self.dialog()?.input(field, &text)?,
            Intent::Blur => self.dialog()?.blur(),
            Intent::SubmitFilter => {
                let dialog = self.filter.take().context("No filter dialog is open")?;
                let (id, model) = dialog.submit();
                self.registry.save_filter(id, model)?;
                self.overview.sync(self.registry.slots());
            }
            Intent::CloseFilter => self.filter = None,
            Intent::Back => self.back(),
            Intent::Logout => {
                let route = self.route;
                let guard = self
                    .guard
                    .as_mut()
                    .filter(|g| g.route() == route)
                    .with_context(|| format!("Logout is not available on {route}"))?;
                guard.request_logout();
            }
            Intent::ConfirmLogout => self.confirm_logout()?,
            Intent::CancelLogout => {
                if let Some(guard) = self.guard.as_mut() {
                    guard.cancel();
                }
            }
        }
        Ok(())
    }

    fn add_stock(&mut self, name: &str, ticker: &str) -> Result<()> {
        if ticker.trim().is_empty() {
            bail!("Ticker must not be empty");
        }
        match self.route {
            Route::AddTicker => {
                grid::add_stock(&mut self.registry, name, ticker, &self.default_country);
            }
            Route::Overview => {
                overview::append_stock(&mut self.registry, name, ticker, &self.default_country);
            }
            other => bail!("Stocks cannot be added from {}", other),
        }
        self.overview.sync(self.registry.slots());
        Ok(())
    }

    fn back(&mut self) {
        let intercepted = self
            .guard
            .as_ref()
            .is_some_and(|g| g.route() == self.route);

        if intercepted {
            self.history.back();
            if let Some(guard) = self.guard.as_mut() {
                guard.on_back(&mut self.history);
            }
        } else if let Some(route) = self.history.back() {
            self.route = route;
            self.guard = route.is_guarded().then(|| {
                // Replace the synthetic entry left by the previous guard
                self.history.back();
                LogoutGuard::arm(route, &mut self.history)
            });
            debug!(%route, "Navigated back");
        } else {
            self.history.push(self.route);
        }
    }

    fn confirm_logout(&mut self) -> Result<()> {
        let guard = self.guard.as_mut().context("Nothing to confirm")?;
        let next = guard.confirm()?;

        self.registry.clear();
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Failed to clear storage on logout");
        }
        self.overview = OverviewState::default();
        self.filter = None;
        self.zoom = None;
        self.history = NavigationHistory::default();
        info!("Logged out");
        self.mount(next);
        Ok(())
    }

    fn expect_route(&self, route: Route) -> Result<()> {
        if self.route != route {
            bail!("Not available on {} (expected {})", self.route, route);
        }
        Ok(())
    }

    fn require_stock(&self, id: u32) -> Result<&super::stock::StockEntry> {
        self.registry
            .find(id)
            .ok_or_else(|| anyhow!("No stock with id {}", id))
    }

    fn dialog(&mut self) -> Result<&mut FilterDialog> {
        self.filter.as_mut().context("No filter dialog is open")
    }
}

#[cfg(test)]
impl Session {
    pub(crate) fn history(&self) -> &NavigationHistory {
        &self.history
    }
}
