//! The `TxClassifier` trait and the per-transaction report it produces.
//!
//! The EVM classifier in `buchfink-evm` implements `TxClassifier`. The trait
//! is object-safe so classifiers can be stored as `Arc<dyn TxClassifier>` in
//! the batch engine.

use alloy_primitives::B256;
use std::fmt;

use crate::account::Account;
use crate::event::OutputEvent;
use crate::log::{Receipt, Transaction};

/// Why a log did not turn into an event, when that is worth reporting.
///
/// Logs with an unknown topic0 are skipped silently and never show up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// topic0 is in the catalog but no rule's contract/guard checks held
    RecognizedUnmatched { signature: B256 },
    /// The log was too short or not valid hex for the rule's recipe
    Malformed { rule: Option<String>, reason: String },
    /// The resolver did not know the rule's asset
    UnresolvedAsset { rule: String, asset: String },
    /// The rule needs a companion log and the receipt has none
    CompanionNotFound { rule: String },
}

/// A diagnostic tied to the receipt position of the log it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub log_index: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(log_index: usize, kind: DiagnosticKind) -> Self {
        Self { log_index, kind }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::RecognizedUnmatched { signature } => write!(
                f,
                "log {}: recognized signature {signature}, unmatched variant",
                self.log_index
            ),
            DiagnosticKind::Malformed { rule: Some(rule), reason } => {
                write!(f, "log {}: malformed for rule {rule}: {reason}", self.log_index)
            }
            DiagnosticKind::Malformed { rule: None, reason } => {
                write!(f, "log {}: malformed: {reason}", self.log_index)
            }
            DiagnosticKind::UnresolvedAsset { rule, asset } => write!(
                f,
                "log {}: rule {rule} could not resolve asset {asset}",
                self.log_index
            ),
            DiagnosticKind::CompanionNotFound { rule } => {
                write!(f, "log {}: rule {rule} found no companion log", self.log_index)
            }
        }
    }
}

/// The output of classifying one transaction: events plus diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifyReport {
    pub events: Vec<OutputEvent>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ClassifyReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.diagnostics.is_empty()
    }
}

/// Turns one (transaction, receipt) pair into financial events.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` and must not mutate shared state,
/// so calls can run concurrently on Rayon threads without locking.
pub trait TxClassifier: Send + Sync {
    /// Classify and keep the diagnostics.
    fn classify_tx_report(
        &self,
        account: &Account,
        tx: &Transaction,
        receipt: &Receipt,
    ) -> ClassifyReport;

    /// Classify a transaction the account initiated. Transactions sent by
    /// anyone else yield an empty list.
    fn classify_tx(
        &self,
        account: &Account,
        tx: &Transaction,
        receipt: &Receipt,
    ) -> Vec<OutputEvent> {
        self.classify_tx_report(account, tx, receipt).events
    }
}
