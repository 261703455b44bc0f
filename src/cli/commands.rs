//! CLI command implementations

use std::path::PathBuf;

use tracing::info;

use crate::dispatcher::Dispatcher;
use crate::gateway;
use crate::http_server::HttpServer;
use crate::store;

use super::args::{Cli, Command};
use super::config::ServiceConfig;
use super::errors::{CliError, CliResult};
use super::io::{read_event, write_json};
use super::logging::init_tracing;

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_tracing();
    run_command(cli.command).await
}

/// Run a parsed command
pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve {
            config,
            host,
            port,
            data_file,
        } => serve(config, host, port, data_file).await,
        Command::Invoke { config, event } => invoke(config, event).await,
    }
}

/// Open the configured store and serve HTTP until shutdown
pub async fn serve(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    data_file: Option<PathBuf>,
) -> CliResult<()> {
    let config =
        ServiceConfig::load(config_path.as_deref())?.with_overrides(host, port, data_file)?;

    let store = store::open(&config.store)?;
    let server = HttpServer::new(config.http, store, config.dispatch)
        .map_err(|e| CliError::config_error(e.to_string()))?;

    info!(addr = %server.socket_addr(), "Starting user service");

    server
        .start()
        .await
        .map_err(|e| CliError::serve_failed(e.to_string()))
}

/// Dispatch one proxy event and print the proxy response
pub async fn invoke(config_path: Option<PathBuf>, event_path: Option<PathBuf>) -> CliResult<()> {
    let config = ServiceConfig::load(config_path.as_deref())?;
    let store = store::open(&config.store)?;
    let dispatcher = Dispatcher::new(store, config.dispatch);

    let event = read_event(event_path.as_deref())?;
    let response = gateway::invoke_json(&dispatcher, &event).await?;

    write_json(&response)
}
