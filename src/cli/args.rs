//! CLI argument definitions using clap
//!
//! Commands:
//! - planvault serve [--config <path>]
//! - planvault check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// planvault - A strict, self-hostable plan document store
#[derive(Parser, Debug)]
#[command(name = "planvault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the planvault server
    Serve {
        /// Path to configuration file; built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a configuration file and exit
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./planvault.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
