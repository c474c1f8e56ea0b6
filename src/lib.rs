pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod notify;
pub mod session;
pub mod timefmt;
pub mod ui;
