//! `widget-diff` command line: argument parsing and command bodies.
//!
//! The binary only parses arguments, sets up logging and prints what these
//! functions return, so everything here is testable without a process.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use crate::error::{json_kind, Error, Result};
use crate::options::TrackerOptions;
use crate::replay::{parse_session, replay};
use crate::tracker::{diff_entities, Fields};

#[derive(Parser, Debug)]
#[command(
    name = "widget-diff",
    version,
    about = "Replay form edit sessions and compute field-level diffs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a session file and print the tracker state after every event
    Replay {
        /// Newline-delimited JSON events
        session: PathBuf,

        #[command(flatten)]
        tracker: OptionArgs,
    },

    /// Print the partial-update payload between two entity JSON files
    Diff {
        baseline: PathBuf,
        edited: PathBuf,

        #[command(flatten)]
        tracker: OptionArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// TOML file with tracker options
    #[arg(long = "options", value_name = "FILE")]
    pub options_file: Option<PathBuf>,

    /// Treat missing baseline values as [] for array edits
    #[arg(long)]
    pub coerce_array_undefined: bool,

    /// Fold pending changes into the baseline on reset
    #[arg(long)]
    pub refresh_snapshot_on_reset: bool,
}

impl OptionArgs {
    /// Options file first, then flags switch options on.
    pub fn resolve(&self) -> Result<TrackerOptions> {
        let base = match &self.options_file {
            Some(path) => TrackerOptions::load(path)?,
            None => TrackerOptions::default(),
        };
        Ok(base
            .with_coerce_array_undefined(base.coerce_array_undefined || self.coerce_array_undefined)
            .with_refresh_snapshot_on_reset(
                base.refresh_snapshot_on_reset || self.refresh_snapshot_on_reset,
            ))
    }
}

/// Default log filter for a `-v` count, used when `RUST_LOG` is unset.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn run(command: &Commands) -> Result<String> {
    match command {
        Commands::Replay { session, tracker } => {
            let options = tracker.resolve()?;
            let text = fs::read_to_string(session)?;
            info!(session = %session.display(), "replaying session");
            cmd_replay(&text, options)
        }
        Commands::Diff {
            baseline,
            edited,
            tracker,
        } => {
            let options = tracker.resolve()?;
            let baseline = fs::read_to_string(baseline)?;
            let edited = fs::read_to_string(edited)?;
            cmd_diff(&baseline, &edited, options)
        }
    }
}

/// One compact JSON report per event, newline separated.
pub fn cmd_replay(session: &str, options: TrackerOptions) -> Result<String> {
    let events = parse_session(session)?;
    let lines = replay(options, &events)
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// The pending changes between two entities, pretty-printed.
pub fn cmd_diff(baseline: &str, edited: &str, options: TrackerOptions) -> Result<String> {
    let baseline = parse_entity(baseline)?;
    let edited = parse_entity(edited)?;
    let payload = diff_entities(options, &baseline, &edited);
    Ok(serde_json::to_string_pretty(&payload)?)
}

fn parse_entity(text: &str) -> Result<Fields> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(fields) => Ok(fields),
        other => Err(Error::NotAnObject(json_kind(&other))),
    }
}
