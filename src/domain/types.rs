//! Shared domain types.
//!
//! Levels are always in **billions of USD** once they leave the fetcher;
//! ratios and deltas are always in **percent**.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One `(date, value)` point of a FRED series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// The two most recent observations of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLatest {
    pub series_id: String,
    pub current: Observation,
    pub previous: Observation,
}

/// Everything the job needs from FRED for a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct LiquiditySnapshot {
    /// Bank reserves, converted to billions.
    pub reserves: SeriesLatest,
    /// Commercial bank total assets (billions).
    pub assets: SeriesLatest,
    /// Latest nominal GDP print (billions, quarterly).
    pub gdp: Observation,
}

/// Reserve ratios, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioSet {
    pub reserve_to_asset: f64,
    pub reserve_to_gdp: f64,
}

/// Signed percentage change between two consecutive observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekOverWeek {
    pub change_pct: f64,
}

/// One persisted record per report date.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub report_date: NaiveDate,
    pub reserves: f64,
    pub assets: f64,
    pub gdp: f64,
    pub reserve_to_asset: f64,
    pub reserve_to_gdp: f64,
}

impl HistoryRow {
    pub fn from_snapshot(report_date: NaiveDate, snapshot: &LiquiditySnapshot, ratios: RatioSet) -> Self {
        Self {
            report_date,
            reserves: snapshot.reserves.current.value,
            assets: snapshot.assets.current.value,
            gdp: snapshot.gdp.value,
            reserve_to_asset: ratios.reserve_to_asset,
            reserve_to_gdp: ratios.reserve_to_gdp,
        }
    }

    pub fn ratios(&self) -> RatioSet {
        RatioSet {
            reserve_to_asset: self.reserve_to_asset,
            reserve_to_gdp: self.reserve_to_gdp,
        }
    }
}

/// Trailing mean of both ratios over the most recent rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingAverages {
    /// Requested window length.
    pub window: usize,
    /// Rows actually averaged (`min(window, history length)`).
    pub rows_used: usize,
    pub reserve_to_asset: f64,
    pub reserve_to_gdp: f64,
}

/// `YYQn` label for a quarterly observation date, e.g. `2025-07-01` -> `25Q3`.
pub fn quarter_label(date: NaiveDate) -> String {
    let quarter = (date.month0() / 3) + 1;
    format!("{:02}Q{quarter}", date.year().rem_euclid(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn quarter_label_covers_each_quarter() {
        assert_eq!(quarter_label(d(2025, 1, 1)), "25Q1");
        assert_eq!(quarter_label(d(2025, 4, 1)), "25Q2");
        assert_eq!(quarter_label(d(2025, 7, 1)), "25Q3");
        assert_eq!(quarter_label(d(2025, 12, 31)), "25Q4");
        assert_eq!(quarter_label(d(2005, 10, 1)), "05Q4");
    }

    #[test]
    fn history_row_takes_current_levels() {
        let snapshot = LiquiditySnapshot {
            reserves: SeriesLatest {
                series_id: "WRESBAL".to_string(),
                current: Observation::new(d(2025, 6, 4), 3000.0),
                previous: Observation::new(d(2025, 5, 28), 2970.0),
            },
            assets: SeriesLatest {
                series_id: "TLAACBW027SBOG".to_string(),
                current: Observation::new(d(2025, 5, 28), 23500.0),
                previous: Observation::new(d(2025, 5, 21), 23400.0),
            },
            gdp: Observation::new(d(2025, 1, 1), 30000.0),
        };
        let ratios = RatioSet {
            reserve_to_asset: 12.77,
            reserve_to_gdp: 10.0,
        };
        let row = HistoryRow::from_snapshot(d(2025, 6, 6), &snapshot, ratios);
        assert_eq!(row.reserves, 3000.0);
        assert_eq!(row.assets, 23500.0);
        assert_eq!(row.gdp, 30000.0);
        assert_eq!(row.ratios(), ratios);
    }
}
