//! The reporting pipeline shared by `liq run` and its dry-run mode.
//!
//! fetch -> ratios -> upsert -> persist -> format -> notify
//!
//! Every step before `persist` can abort the run. Notification happens last
//! and its failure never undoes the persisted row.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::analysis::{compute_ratios, series_week_over_week};
use crate::data::{SeriesSource, fetch_snapshot};
use crate::domain::{HistoryRow, LiquiditySnapshot, RatioSet, RollingAverages};
use crate::error::AppError;
use crate::notify::Notifier;
use crate::report::{ReportInput, format_report};
use crate::store::{HistoryTable, ROLLING_LONG, ROLLING_SHORT, UpsertOutcome};

/// Per-run options that are not part of the environment config.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions<'a> {
    pub report_date: NaiveDate,
    pub history_path: &'a Path,
    /// Compute and render only; nothing is written or sent.
    pub dry_run: bool,
    pub notify: bool,
}

/// What happened to the notification step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Skipped,
    Failed(String),
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub snapshot: LiquiditySnapshot,
    pub row: HistoryRow,
    pub upsert: UpsertOutcome,
    pub avg_short: RollingAverages,
    pub avg_long: RollingAverages,
    pub history_len: usize,
    pub message: String,
    pub delivery: Delivery,
}

/// Execute the full pipeline against the given source and sink.
pub fn run_report(
    source: &dyn SeriesSource,
    notifier: &dyn Notifier,
    options: &RunOptions<'_>,
) -> Result<RunOutput, AppError> {
    // 1) Fetch.
    let snapshot = fetch_snapshot(source)?;
    info!(
        reserves_date = %snapshot.reserves.current.date,
        assets_date = %snapshot.assets.current.date,
        gdp_date = %snapshot.gdp.date,
        "fetched FRED snapshot"
    );

    // 2) Compute.
    let ratios = compute_ratios(
        snapshot.reserves.current.value,
        snapshot.assets.current.value,
        snapshot.gdp.value,
    )?;
    let reserves_wow = series_week_over_week(&snapshot.reserves)?;
    let assets_wow = series_week_over_week(&snapshot.assets)?;

    // 3) Upsert + aggregate.
    let mut table = HistoryTable::load(options.history_path)?;
    let row = HistoryRow::from_snapshot(options.report_date, &snapshot, ratios);
    let upsert = table.upsert(row.clone());
    let (avg_short, avg_long) = trailing_averages(&table)?;

    // 4) Persist before anything leaves the process.
    if options.dry_run {
        info!("dry run: history not written");
    } else {
        table.persist(options.history_path)?;
        info!(
            path = %options.history_path.display(),
            rows = table.len(),
            outcome = ?upsert,
            "history updated"
        );
    }

    // 5) Format.
    let message = format_report(&ReportInput {
        report_date: options.report_date,
        snapshot: &snapshot,
        ratios,
        reserves_wow,
        assets_wow,
        avg_short,
        avg_long,
    });

    // 6) Notify.
    let delivery = if options.dry_run || !options.notify {
        Delivery::Skipped
    } else {
        match notifier.send(&message) {
            Ok(()) => {
                info!("report delivered");
                Delivery::Sent
            }
            Err(err) => {
                warn!(error = %err, "report delivery failed; history is already saved");
                Delivery::Failed(err.to_string())
            }
        }
    };

    Ok(RunOutput {
        snapshot,
        row,
        upsert,
        avg_short,
        avg_long,
        history_len: table.len(),
        message,
        delivery,
    })
}

/// Short and long trailing averages of a non-empty table.
pub fn trailing_averages(table: &HistoryTable) -> Result<(RollingAverages, RollingAverages), AppError> {
    let short = table.rolling(ROLLING_SHORT);
    let long = table.rolling(ROLLING_LONG);
    match (short, long) {
        (Some(short), Some(long)) => Ok((short, long)),
        _ => Err(AppError::compute("Cannot compute rolling averages over an empty history.")),
    }
}

/// Current ratios of the most recent stored row, if any.
pub fn latest_ratios(table: &HistoryTable) -> Option<RatioSet> {
    table.sorted_rows().last().map(|r| r.ratios())
}
