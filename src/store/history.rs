//! Date-keyed history of computed ratios, persisted as CSV.
//!
//! One row per report date. A run loads the whole file, upserts today's row,
//! and rewrites the whole file. The rewrite goes through a sibling temp file
//! and a rename, so a crash mid-write leaves the previous table intact.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{HistoryRow, RollingAverages};
use crate::error::AppError;

pub const ROLLING_SHORT: usize = 4;
pub const ROLLING_LONG: usize = 12;

/// Whether an upsert added a new date or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryTable {
    rows: Vec<HistoryRow>,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from `path`; a missing file is an empty table.
    ///
    /// Only a path that does not exist at all counts as missing. A symlink
    /// whose target is gone, or any other stat failure, is a storage error.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        match fs::metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if fs::symlink_metadata(path).is_ok() {
                    return Err(AppError::storage(format!(
                        "History CSV '{}' is a symlink to a missing target.",
                        path.display()
                    )));
                }
                debug!(path = %path.display(), "history file not found; starting empty");
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to stat history CSV '{}': {e}",
                    path.display()
                )));
            }
        }

        let file = File::open(path)
            .map_err(|e| AppError::storage(format!("Failed to open history CSV '{}': {e}", path.display())))?;
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

        let mut table = Self::new();
        for (idx, result) in reader.deserialize::<HistoryRow>().enumerate() {
            // +2: 1-based lines, plus the header line.
            let line = idx + 2;
            let row = result.map_err(|e| {
                AppError::storage(format!(
                    "Invalid history row at {}:{line}: {e}",
                    path.display()
                ))
            })?;
            table.upsert(row);
        }

        debug!(path = %path.display(), rows = table.len(), "loaded history");
        Ok(table)
    }

    /// Insert `row`, replacing any existing row with the same report date.
    pub fn upsert(&mut self, row: HistoryRow) -> UpsertOutcome {
        match self.rows.iter_mut().find(|r| r.report_date == row.report_date) {
            Some(existing) => {
                *existing = row;
                UpsertOutcome::Replaced
            }
            None => {
                self.rows.push(row);
                UpsertOutcome::Inserted
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in storage order.
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    /// Rows sorted by report date, ascending.
    pub fn sorted_rows(&self) -> Vec<&HistoryRow> {
        let mut sorted: Vec<&HistoryRow> = self.rows.iter().collect();
        sorted.sort_by_key(|r| r.report_date);
        sorted
    }

    /// Mean of both ratios over the most recent `window` rows.
    ///
    /// Shorter histories average whatever is there. Returns `None` only for an
    /// empty table or a zero window.
    pub fn rolling(&self, window: usize) -> Option<RollingAverages> {
        if window == 0 || self.rows.is_empty() {
            return None;
        }
        let sorted = self.sorted_rows();
        let tail = &sorted[sorted.len().saturating_sub(window)..];
        let n = tail.len() as f64;

        Some(RollingAverages {
            window,
            rows_used: tail.len(),
            reserve_to_asset: tail.iter().map(|r| r.reserve_to_asset).sum::<f64>() / n,
            reserve_to_gdp: tail.iter().map(|r| r.reserve_to_gdp).sum::<f64>() / n,
        })
    }

    /// Rewrite the whole table to `path`, sorted by date.
    ///
    /// A symlinked path is resolved first, so the link survives and the
    /// target file is what gets replaced.
    pub fn persist(&self, path: &Path) -> Result<(), AppError> {
        let resolved = resolve_link(path)?;
        let path = resolved.as_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::storage(format!("Failed to create history dir '{}': {e}", parent.display()))
            })?;
        }

        let tmp = temp_path(path);
        if let Err(err) = self.write_csv(&tmp) {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }

        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            AppError::storage(format!("Failed to replace history CSV '{}': {e}", path.display()))
        })?;

        debug!(path = %path.display(), rows = self.len(), "persisted history");
        Ok(())
    }

    fn write_csv(&self, path: &Path) -> Result<(), AppError> {
        let file = File::create(path)
            .map_err(|e| AppError::storage(format!("Failed to create '{}': {e}", path.display())))?;
        let mut writer = csv::Writer::from_writer(file);

        for row in self.sorted_rows() {
            writer
                .serialize(row)
                .map_err(|e| AppError::storage(format!("Failed to write history row: {e}")))?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| AppError::storage(format!("Failed to flush history CSV: {}", e.error())))?;
        file.sync_all()
            .map_err(|e| AppError::storage(format!("Failed to sync history CSV: {e}")))?;
        Ok(())
    }
}

fn resolve_link(path: &Path) -> Result<PathBuf, AppError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path).map_err(|e| {
            AppError::storage(format!(
                "History CSV '{}' is a symlink to a missing target: {e}",
                path.display()
            ))
        }),
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(AppError::storage(format!(
            "Failed to stat history CSV '{}': {e}",
            path.display()
        ))),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "history.csv".into());
    name.push(".tmp");
    path.with_file_name(name)
}
