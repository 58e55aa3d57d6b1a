//! Reserve ratios and week-over-week changes.
//!
//! All functions here are pure. Zero or non-finite denominators are errors
//! rather than `inf`/`NaN` values leaking into the history file.

use crate::domain::{RatioSet, SeriesLatest, WeekOverWeek};
use crate::error::AppError;

/// Reserve-to-asset and reserve-to-GDP ratios, in percent.
///
/// All three inputs must already be in the same unit (billions).
pub fn compute_ratios(reserves: f64, assets: f64, gdp: f64) -> Result<RatioSet, AppError> {
    Ok(RatioSet {
        reserve_to_asset: percent_of(reserves, assets, "reserve/asset ratio", "total assets")?,
        reserve_to_gdp: percent_of(reserves, gdp, "reserve/GDP ratio", "GDP")?,
    })
}

/// `(current - previous) / previous * 100`.
pub fn week_over_week(current: f64, previous: f64) -> Result<WeekOverWeek, AppError> {
    if !current.is_finite() {
        return Err(AppError::compute("Non-finite current value for week-over-week change."));
    }
    let change_pct = percent_of(current - previous, previous, "week-over-week change", "previous value")?;
    Ok(WeekOverWeek { change_pct })
}

/// Week-over-week change of a series' two latest observations.
///
/// Errors name the series so a bad upstream print is easy to trace.
pub fn series_week_over_week(series: &SeriesLatest) -> Result<WeekOverWeek, AppError> {
    week_over_week(series.current.value, series.previous.value).map_err(|e| {
        AppError::compute(format!(
            "{} ({} -> {}): {}",
            series.series_id,
            series.previous.date,
            series.current.date,
            e.message()
        ))
    })
}

/// Render a signed percentage with two decimals: `+1.00%`, `-1.00%`.
pub fn format_signed_pct(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}

impl WeekOverWeek {
    pub fn display(&self) -> String {
        format_signed_pct(self.change_pct)
    }
}

fn percent_of(numerator: f64, denominator: f64, what: &str, denominator_name: &str) -> Result<f64, AppError> {
    if !numerator.is_finite() {
        return Err(AppError::compute(format!("Non-finite input for {what}.")));
    }
    if !denominator.is_finite() || denominator == 0.0 {
        return Err(AppError::compute(format!(
            "Cannot compute {what}: {denominator_name} is {denominator}."
        )));
    }
    let out = numerator / denominator * 100.0;
    if !out.is_finite() {
        return Err(AppError::compute(format!("Non-finite result for {what}.")));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::fred::RESERVES_SCALE;
    use crate::domain::Observation;
    use crate::error::EXIT_COMPUTE;

    #[test]
    fn reserve_to_asset_matches_worked_example() {
        let reserves = 3_000_000.0 / RESERVES_SCALE;
        let ratios = compute_ratios(reserves, 23_500.0, 30_000.0).unwrap();
        assert!((ratios.reserve_to_asset - 3000.0 / 23500.0 * 100.0).abs() < 1e-12);
        assert_eq!(format!("{:.2}", ratios.reserve_to_asset), "12.77");
        assert!((ratios.reserve_to_gdp - 10.0).abs() < 1e-12);
    }

    #[test]
    fn ratios_are_positive_for_positive_inputs() {
        for (r, a, g) in [(1.0, 2.0, 3.0), (3200.5, 23811.0, 30331.1), (1e-6, 1e6, 1e7)] {
            let ratios = compute_ratios(r, a, g).unwrap();
            assert!(ratios.reserve_to_asset > 0.0);
            assert!(ratios.reserve_to_gdp > 0.0);
            assert!((ratios.reserve_to_asset - r / a * 100.0).abs() < 1e-9);
            assert!((ratios.reserve_to_gdp - r / g * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_denominators_fail_fast() {
        let err = compute_ratios(3000.0, 0.0, 30_000.0).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_COMPUTE);
        assert!(err.message().contains("total assets"));

        let err = compute_ratios(3000.0, 23_500.0, 0.0).unwrap_err();
        assert!(err.message().contains("GDP"));

        assert!(compute_ratios(f64::NAN, 1.0, 1.0).is_err());
        assert!(compute_ratios(1.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn week_over_week_is_signed() {
        let up = week_over_week(3030.0, 3000.0).unwrap();
        assert_eq!(up.display(), "+1.00%");
        let down = week_over_week(2970.0, 3000.0).unwrap();
        assert_eq!(down.display(), "-1.00%");
        let flat = week_over_week(3000.0, 3000.0).unwrap();
        assert_eq!(flat.display(), "+0.00%");
    }

    #[test]
    fn series_change_errors_name_the_series() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
        let series = SeriesLatest {
            series_id: "TLAACBW027SBOG".to_string(),
            current: Observation::new(d(28), 23_500.0),
            previous: Observation::new(d(21), 0.0),
        };
        let err = series_week_over_week(&series).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_COMPUTE);
        assert!(err.message().starts_with("TLAACBW027SBOG (2025-05-21 -> 2025-05-28):"), "{err}");

        let ok = SeriesLatest {
            previous: Observation::new(d(21), 23_265.35),
            ..series
        };
        assert_eq!(series_week_over_week(&ok).unwrap().display(), "+1.01%");
    }

    #[test]
    fn week_over_week_rejects_zero_previous() {
        let err = week_over_week(10.0, 0.0).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_COMPUTE);
    }
}
