//! CLI module for planvault
//!
//! Provides the command-line interface:
//! - serve: boot the HTTP server and enter the serving loop
//! - check-config: validate a configuration file and exit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check_config, run_command, serve};
pub use errors::{CliError, CliResult};

/// Parse arguments and dispatch to the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli)
}
