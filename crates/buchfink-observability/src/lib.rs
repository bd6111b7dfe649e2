//! # buchfink-observability
//!
//! Structured logging for buchfink.
//!
//! Every crate logs through `tracing`; this crate installs the subscriber.
//! Per-crate levels come from `LogConfig::components`, and `json: true`
//! switches to one JSON object per line for ELK, Loki or CloudWatch.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
