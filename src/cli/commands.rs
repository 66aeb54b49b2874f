//! CLI command dispatch.

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::seed;
use crate::store::Store;

/// Parse arguments and run the selected command.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}

/// Dispatch a parsed command.
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Start { host, port, seed } => start(host, port, seed),
    }
}

/// Boot the store (optionally seeded) and serve until shutdown.
fn start(host: String, port: u16, seed_demo: bool) -> CliResult<()> {
    let store = Store::new();
    if seed_demo {
        seed::run(&store);
    }

    let config = HttpServerConfig {
        host,
        port,
        cors_origins: Vec::new(),
    };
    let server = HttpServer::with_config(store, config);

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Io)?;
    runtime.block_on(server.run()).map_err(CliError::Io)
}
