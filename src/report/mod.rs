//! Reporting utilities: chat message and history table rendering.
//!
//! Formatting lives in one place so the pipeline and the store stay free of
//! presentation details.

pub mod format;

pub use format::{ReportInput, fmt_level, format_history, format_report};
