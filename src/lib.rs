pub mod cli;
pub mod config;
pub mod logging;
pub mod services;
pub mod sources;
pub mod tui;
pub mod types;
