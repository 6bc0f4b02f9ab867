//! Core dashboard logic: the stock registry, its projections and the
//! session that drives them

pub mod auth;
pub mod config;
pub mod export;
pub mod filter;
pub mod grid;
pub mod guard;
pub mod log;
pub mod overview;
pub mod provider;
pub mod registry;
pub mod route;
pub mod session;
pub mod stock;

// Re-export main types for cleaner imports
pub use filter::{FilterDialog, FilterField, FilterModel};
pub use provider::{FinancialDataProvider, TableData};
pub use registry::StockRegistry;
pub use route::Route;
pub use session::{Intent, Session};
pub use stock::{Slot, StockEntry};
