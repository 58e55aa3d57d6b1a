//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw series points (`Observation`, `SeriesLatest`, `LiquiditySnapshot`)
//! - derived values (`RatioSet`, `WeekOverWeek`, `RollingAverages`)
//! - the persisted history record (`HistoryRow`)

pub mod types;

pub use types::*;
