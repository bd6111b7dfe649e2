//! # buchfink-core
//!
//! Core types, traits, and primitives shared across the buchfink crates.
//! The log decoder, the signature catalog, and the batch engine are all
//! built on the interfaces defined here.

pub mod account;
pub mod asset;
pub mod classifier;
pub mod encoding;
pub mod error;
pub mod event;
pub mod fingerprint;
pub mod log;
pub mod rule;

pub use account::{Account, AccountKind};
pub use asset::{AssetKey, AssetRef, AssetResolver, StaticAssetResolver};
pub use classifier::{ClassifyReport, Diagnostic, DiagnosticKind, TxClassifier};
pub use error::{AccountError, BatchError, CatalogError, ClassifyError, DecodeError, ResolveError};
pub use event::{EventKind, EventSubtype, OutputEvent};
pub use log::{LogEntry, RawLog, Receipt, Transaction};
pub use rule::{
    AddressPredicate, AmountSource, AssetSource, CompanionSpec, CompanionToken, EventRule, Guard,
    RuleCatalog,
};

pub use alloy_primitives::{Address, Bytes, B256, U256};
pub use bigdecimal::BigDecimal;
