//! Library surface for stacktop (used by the binary and integration tests).

pub mod app;
pub mod config;
pub mod host;
pub mod providers;
pub mod query;
pub mod types;
pub mod ui;
