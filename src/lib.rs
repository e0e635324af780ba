pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod notion;
pub mod ui;
pub mod utils;
