//! Command-line parsing for the liquidity report job.
//!
//! Argument parsing and dispatch stay separate from fetching/storage code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "liq", version, about = "US bank liquidity monitor (FRED -> CSV history -> Telegram)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, compute, update the history file and send the report (default).
    Run(RunArgs),
    /// Print the stored history and its trailing averages. No network access.
    History(HistoryArgs),
    /// Send a short test message to check the Telegram credentials.
    NotifyTest,
}

#[derive(Debug, Args, Clone, Default)]
pub struct RunArgs {
    /// History CSV path (overrides LIQ_HISTORY_PATH).
    #[arg(long, value_name = "CSV")]
    pub history: Option<PathBuf>,

    /// Report date (YYYY-MM-DD). Defaults to today, local time.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Print the report without writing history or notifying.
    #[arg(long)]
    pub dry_run: bool,

    /// Update history but do not send the report.
    #[arg(long)]
    pub no_notify: bool,
}

#[derive(Debug, Args, Clone, Default)]
pub struct HistoryArgs {
    /// History CSV path (overrides LIQ_HISTORY_PATH).
    #[arg(long, value_name = "CSV")]
    pub history: Option<PathBuf>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}
