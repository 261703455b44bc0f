//! CLI argument definitions using clap
//!
//! Commands:
//! - roadie-user serve [--config <path>] [--host <host>] [--port <port>] [--data-file <path>]
//! - roadie-user invoke [--config <path>] [--event <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// roadie-user - CRUD service for user records
#[derive(Parser, Debug)]
#[command(name = "roadie-user")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the user routes over HTTP
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Record log backing the store (selects the file backend)
        #[arg(long, env = "USER_STORE_PATH")]
        data_file: Option<PathBuf>,
    },

    /// Handle one proxy event and print the proxy response
    Invoke {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// File holding the event JSON (stdin when omitted)
        #[arg(long)]
        event: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
