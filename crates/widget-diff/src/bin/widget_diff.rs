//! `widget-diff` — replay form edit sessions and compute partial-update payloads.
//!
//! Usage:
//!   widget-diff replay <SESSION> [--options FILE] [--coerce-array-undefined] [--refresh-snapshot-on-reset]
//!   widget-diff diff <BASELINE> <EDITED> [--options FILE] [...]
//!
//! Logs go to stderr; `RUST_LOG` overrides the `-v` level.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use widget_diff::cli::{log_filter, run, Cli};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli.command) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
