//! CLI module for Trackle
//!
//! Parses arguments and boots the server. All logic lives here; main.rs
//! only dispatches and reports errors.

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use errors::{CliError, CliResult};
