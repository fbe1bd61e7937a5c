//! Command-Line Interface (CLI) argument parsing.
//!
//! The binary host reads one notification from a JSON file and relays
//! it using the options from the TOML configuration file, optionally
//! overridden by `SLACK_RELAY_`-prefixed environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Relay a monitoring-platform notification to Slack.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "slack-relay.toml")]
    pub config: PathBuf,

    /// Path to the notification JSON file ("-" for stdin).
    /// Required unless --print-schema is given.
    #[arg(value_name = "NOTIFICATION", required_unless_present = "print_schema")]
    pub notification: Option<PathBuf>,

    /// Print the option schema as JSON and exit.
    #[arg(long)]
    pub print_schema: bool,
}
