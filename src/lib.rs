pub mod config;
pub mod logging;
pub mod ports;
pub mod store;
pub mod tui;
