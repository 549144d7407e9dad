//! helpdeskctl library - exposes modules for the binary and integration tests

pub mod app;
pub mod cli;
pub mod commands;
pub mod display;
pub mod errors;
pub mod logging;
pub mod repl;
pub mod spinner;
