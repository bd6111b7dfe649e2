//! # buchfink-batch
//!
//! Classifies an account's transaction history in bulk.
//!
//! ## Features
//! - Memory-bounded chunking (default 1,000 transactions per chunk)
//! - CPU-parallel classification via Rayon
//! - Progress callbacks (for progress bars / ETAs)
//! - YAML configuration: log levels, rule files, accounts
//!
//! ## Usage
//! ```no_run
//! use buchfink_batch::{BatchRequest, ClassifierConfig};
//! use buchfink_catalog::builtin;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), buchfink_core::BatchError> {
//! let config = ClassifierConfig::load(std::path::Path::new("buchfink.yaml"))?;
//! let engine = config.engine(Arc::new(builtin::asset_resolver()))?;
//! for account in config.accounts()? {
//!     let result = engine.classify(BatchRequest::new(account, Vec::new()))?;
//!     println!("{} events", result.events.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod request;

pub use config::{AccountConfig, ClassifierConfig};
pub use engine::{BatchEngine, BatchResult};
pub use request::{BatchRequest, DEFAULT_CHUNK_SIZE};
