//! CLI command definitions

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Strategic intelligence from a multi-agent board of directors.
#[derive(Parser, Debug)]
#[command(name = "council", version, about)]
pub struct Cli {
    /// The strategic question to put before the board
    pub query: Option<String>,

    /// Interactive chat mode
    #[arg(long)]
    pub chat: bool,

    /// Hand the verdict to the execution squad after the decision
    #[arg(long)]
    pub execute: bool,

    /// Save the rendered decision diagram to this file
    #[arg(long, value_name = "PATH")]
    pub diagram: Option<PathBuf>,

    /// Export the board report document (default filename when no path given)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub report: Option<Option<PathBuf>>,

    /// Print the decision as JSON instead of the decision card
    #[arg(long)]
    pub json: bool,

    /// Path to a config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ignore config files and use built-in defaults
    #[arg(long)]
    pub no_config: bool,

    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the live transcript and progress output
    #[arg(short, long)]
    pub quiet: bool,
}
