//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments
//! - builds the config and the FRED/Telegram clients
//! - runs the pipeline and prints the report

use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, HistoryArgs, RunArgs};
use crate::config::{Config, history_path_from_env};
use crate::data::FredClient;
use crate::error::AppError;
use crate::notify::{Notifier, TelegramNotifier};
use crate::store::{HistoryTable, ROLLING_LONG, ROLLING_SHORT};

pub mod pipeline;

const DEFAULT_LOG_FILTER: &str = "liquidity_monitor=info";

/// Entry point for the `liq` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    let cli = crate::cli::Cli::parse();
    match cli.command.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(args) => handle_run(args),
        Command::History(args) => handle_history(args),
        Command::NotifyTest => handle_notify_test(),
    }
}

/// Logs go to stderr; stdout carries only the report.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = Config::from_env()?;
    let history_path = args.history.clone().unwrap_or_else(|| config.history_path.clone());
    let report_date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let source = FredClient::new(&config)?;
    let notifier = TelegramNotifier::new(&config)?;

    info!(%report_date, path = %history_path.display(), dry_run = args.dry_run, "starting liquidity report");

    let options = pipeline::RunOptions {
        report_date,
        history_path: &history_path,
        dry_run: args.dry_run,
        notify: !args.no_notify,
    };
    let run = pipeline::run_report(&source, &notifier, &options)?;

    println!("{}", run.message);
    Ok(())
}

fn handle_history(args: HistoryArgs) -> Result<(), AppError> {
    let path = args.history.unwrap_or_else(history_path_from_env);
    let table = HistoryTable::load(&path)?;

    if let Some(latest) = pipeline::latest_ratios(&table) {
        info!(
            rows = table.len(),
            reserve_to_asset = latest.reserve_to_asset,
            reserve_to_gdp = latest.reserve_to_gdp,
            "latest stored ratios"
        );
    }

    println!(
        "{}",
        crate::report::format_history(
            &table.sorted_rows(),
            table.rolling(ROLLING_SHORT),
            table.rolling(ROLLING_LONG),
        )
    );
    Ok(())
}

fn handle_notify_test() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let notifier = TelegramNotifier::new(&config)?;
    notifier.send("✅ *liq* notification test")?;
    println!("Test message sent to chat {}.", config.tg_chat_id);
    Ok(())
}
