//! Persistent ratio history.

pub mod history;

pub use history::{HistoryTable, ROLLING_LONG, ROLLING_SHORT, UpsertOutcome};
