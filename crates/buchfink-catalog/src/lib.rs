//! # buchfink-catalog
//!
//! The signature catalog for buchfink.
//!
//! ## Sources of rules
//! 1. **Built-in rules**: `builtin::rules()`, the mainnet rule set
//! 2. **Rule files**: YAML documents parsed by `RuleFile`
//!
//! Both feed a `SignatureCatalogBuilder`; the frozen `SignatureCatalog`
//! implements the `RuleCatalog` trait from `buchfink-core`.

pub mod builtin;
pub mod catalog;
pub mod rules;

pub use catalog::{SignatureCatalog, SignatureCatalogBuilder};
pub use rules::RuleFile;
