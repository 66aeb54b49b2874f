//! Trackle CLI entry point
//!
//! A minimal entrypoint: parse arguments, dispatch to the CLI module, print
//! errors to stderr and exit non-zero on failure. Subsystem initialization
//! happens inside the CLI commands, not here.

use trackle::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
