//! Upstream data sources.

pub mod fred;

pub use fred::{FredClient, SeriesSource, fetch_snapshot};
