//! CLI error types.

use thiserror::Error;

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

/// Errors that abort a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Runtime construction or server I/O failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
