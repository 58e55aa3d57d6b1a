//! `liquidity-monitor` library crate.
//!
//! The binary (`liq`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable with in-memory sources and sinks
//! - no step depends on process-wide state beyond the `Config` built at startup

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod notify;
pub mod report;
pub mod store;
