//! Pure computations over fetched levels.

pub mod ratios;

pub use ratios::{compute_ratios, format_signed_pct, series_week_over_week, week_over_week};
