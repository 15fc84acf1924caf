//! CLI command implementations
//!
//! Commands stay thin: configuration loading and validation here,
//! everything else delegated to the server module.

use std::fs;
use std::path::Path;

use crate::http_server::{PlanServer, ServerConfig};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Dispatch a parsed command.
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Serve { config } => serve(config.as_deref()),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Boot the HTTP server and serve until terminated.
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    let server = PlanServer::with_config(config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::boot_failed(format!("Failed to start runtime: {}", e)))?;

    runtime
        .block_on(server.start())
        .map_err(|e| CliError::boot_failed(format!("Server error: {}", e)))
}

/// Load and validate a configuration file, reporting problems.
pub fn check_config(path: &Path) -> CliResult<()> {
    let config = load_config(path)?;
    println!("{} is valid (listen on {})", path.display(), config.socket_addr());
    Ok(())
}

fn load_config(path: &Path) -> CliResult<ServerConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

    let config: ServerConfig = serde_json::from_str(&content)
        .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

    config
        .validate()
        .map_err(|e| CliError::config_error(format!("Invalid config: {}", e)))?;

    Ok(config)
}
