pub mod auth;
pub mod filter;
pub mod logout;
pub mod overview;
pub mod setup;
pub mod shell;
pub mod tickers;
pub mod ui;
pub mod zoom;
