//! CLI module for roadie-user
//!
//! Provides command-line interface for:
//! - serve: Run the HTTP host over the configured store
//! - invoke: Handle a single proxy event and exit

mod args;
mod commands;
mod config;
mod errors;
mod io;
mod logging;

pub use args::{Cli, Command};
pub use commands::{invoke, run, run_command, serve};
pub use config::ServiceConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_event, write_json};
pub use logging::init_tracing;
