//! FRED API integration for the liquidity series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::domain::{LiquiditySnapshot, Observation, SeriesLatest};
use crate::error::AppError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Reserve balances with Federal Reserve Banks (weekly, millions of USD).
pub const SERIES_RESERVES: &str = "WRESBAL";
/// Total assets, all commercial banks (weekly, billions of USD).
pub const SERIES_ASSETS: &str = "TLAACBW027SBOG";
/// Nominal GDP (quarterly, billions of USD, SAAR).
pub const SERIES_GDP: &str = "GDP";

/// `WRESBAL` is published in millions; everything else is in billions.
pub const RESERVES_SCALE: f64 = 1000.0;

/// A read-only source of date-indexed series.
pub trait SeriesSource {
    /// Full history of `series_id`, ascending by date.
    fn fetch_series(&self, series_id: &str) -> Result<Vec<Observation>, AppError>;
}

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::fetch(format!("Failed to build FRED HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: config.fred_api_key.clone(),
        })
    }
}

impl SeriesSource for FredClient {
    fn fetch_series(&self, series_id: &str) -> Result<Vec<Observation>, AppError> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "asc"),
            ])
            .send()
            .map_err(|e| AppError::fetch(format!("FRED request for {series_id} failed: {}", e.without_url())))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(format!(
                "FRED request for {series_id} failed with status {}.",
                resp.status()
            )));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::fetch(format!("Failed to parse FRED response for {series_id}: {e}")))?;

        let out = parse_observations(series_id, body.observations)?;
        debug!(series_id, n_obs = out.len(), "fetched FRED series");
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

/// Convert raw FRED rows into ascending, date-unique observations.
///
/// FRED marks missing values with `"."`; those rows are skipped.
fn parse_observations(series_id: &str, raw: Vec<RawObservation>) -> Result<Vec<Observation>, AppError> {
    let mut by_date = BTreeMap::new();
    for obs in raw {
        let value = match parse_value(&obs.value) {
            Some(v) => v,
            None => continue,
        };
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .map_err(|e| AppError::fetch(format!("Invalid FRED date '{}' in {series_id}: {e}", obs.date)))?;
        by_date.insert(date, value);
    }
    Ok(by_date
        .into_iter()
        .map(|(date, value)| Observation::new(date, value))
        .collect())
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

/// The last two observations of an ascending series.
///
/// A series with fewer than two points cannot produce a week-over-week delta,
/// so it is rejected outright.
pub fn latest_two(series_id: &str, observations: &[Observation]) -> Result<SeriesLatest, AppError> {
    match observations {
        [] => Err(AppError::fetch(format!("No observations returned for series {series_id}."))),
        [_] => Err(AppError::fetch(format!(
            "Series {series_id} has only one observation; two are needed for a week-over-week change."
        ))),
        [.., previous, current] => Ok(SeriesLatest {
            series_id: series_id.to_string(),
            current: *current,
            previous: *previous,
        }),
    }
}

/// Fetch all three series and reduce them to what one run needs.
pub fn fetch_snapshot(source: &dyn SeriesSource) -> Result<LiquiditySnapshot, AppError> {
    let reserves_raw = source.fetch_series(SERIES_RESERVES)?;
    let assets_raw = source.fetch_series(SERIES_ASSETS)?;
    let gdp_raw = source.fetch_series(SERIES_GDP)?;

    let mut reserves = latest_two(SERIES_RESERVES, &reserves_raw)?;
    reserves.current.value /= RESERVES_SCALE;
    reserves.previous.value /= RESERVES_SCALE;

    let assets = latest_two(SERIES_ASSETS, &assets_raw)?;

    let gdp = *gdp_raw
        .last()
        .ok_or_else(|| AppError::fetch(format!("No observations returned for series {SERIES_GDP}.")))?;

    Ok(LiquiditySnapshot { reserves, assets, gdp })
}
