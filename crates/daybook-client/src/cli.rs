//! Command-line interface definition.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use daybook_core::{OutputFormat, YearMonth, parse_wall_clock};

/// daybook - A provider's appointments for the day
#[derive(Debug, Parser)]
#[command(name = "daybook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "DAYBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    // --- Gestures ---
    /// Day to select, as if clicked on the calendar
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Month to show on the calendar
    #[arg(long, value_name = "YYYY-MM")]
    pub month: Option<YearMonth>,

    /// Current time to view the schedule at (defaults to the local clock)
    #[arg(long, value_name = "YYYY-MM-DDTHH:MM", value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,

    // --- Source ---
    /// Serve data from a JSON fixture file instead of the booking API
    #[arg(long, value_name = "FILE")]
    pub fixture: Option<PathBuf>,

    /// Provider whose calendar is viewed
    #[arg(long, env = "DAYBOOK_PROVIDER_ID")]
    pub provider_id: Option<String>,

    /// Base URL of the booking API
    #[arg(long, env = "DAYBOOK_BASE_URL")]
    pub base_url: Option<String>,

    /// Session token (supports `env::` and `pass::` references)
    #[arg(long, env = "DAYBOOK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the output format based on CLI flags.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Tty
        }
    }
}

fn parse_now(value: &str) -> Result<NaiveDateTime, String> {
    parse_wall_clock(value).ok_or_else(|| format!("invalid date-time `{}`", value))
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Dump,
    /// Check the configuration and resolve secrets
    Validate,
    /// Print the configuration file path
    Path,
}
