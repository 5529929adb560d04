//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod config;
mod handlers;
mod logging;
mod scan;

pub use config::{ConfigSubcommand, handle_config_command};
pub use handlers::handle_handlers_command;
pub use logging::*;
pub use scan::{ScanArgs, handle_scan_command};
