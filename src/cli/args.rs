//! CLI argument definitions using clap
//!
//! Commands:
//! - trackle start [--host <addr>] [--port <port>] [--seed]

use clap::{Parser, Subcommand};

/// Trackle - project/timesheet tracking with runtime-definable attributes
#[derive(Parser, Debug)]
#[command(name = "trackle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the API server
    Start {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = 8000)]
        port: u16,

        /// Populate the store with the demo catalog and sample projects
        #[arg(long)]
        seed: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
