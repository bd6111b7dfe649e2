//! `BatchEngine`: chunked, parallel classification.

use crate::request::BatchRequest;
use buchfink_core::{BatchError, Diagnostic, OutputEvent, Receipt, Transaction, TxClassifier};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a batch classification job.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Every event, stable-sorted by timestamp
    pub events: Vec<OutputEvent>,
    /// (tx hash hex, diagnostic) pairs in input order
    pub diagnostics: Vec<(String, Diagnostic)>,
    /// Total transactions processed
    pub transactions: usize,
}

/// Batch classification engine.
pub struct BatchEngine {
    classifier: Arc<dyn TxClassifier>,
}

impl BatchEngine {
    pub fn new(classifier: Arc<dyn TxClassifier>) -> Self {
        Self { classifier }
    }

    /// Execute a batch request.
    ///
    /// Every item must carry its receipt; a missing one fails the whole
    /// batch before any classification starts.
    pub fn classify(&self, req: BatchRequest) -> Result<BatchResult, BatchError> {
        let items = ensure_receipts(&req.items)?;
        let total = items.len();
        info!(
            account = %req.account.name,
            transactions = total,
            chunk_size = req.chunk_size,
            "batch classification started"
        );

        let mut result = BatchResult {
            transactions: total,
            ..BatchResult::default()
        };
        let mut done = 0usize;

        for chunk in items.chunks(req.chunk_size.max(1)) {
            // collect() on an indexed parallel iterator keeps input order
            let reports: Vec<_> = chunk
                .par_iter()
                .map(|(tx, receipt)| {
                    (tx.link(), self.classifier.classify_tx_report(&req.account, tx, receipt))
                })
                .collect();

            for (tx_hash, report) in reports {
                result.events.extend(report.events);
                result
                    .diagnostics
                    .extend(report.diagnostics.into_iter().map(|d| (tx_hash.clone(), d)));
            }

            done += chunk.len();
            debug!(done, total, "chunk classified");
            if let Some(cb) = &req.on_progress {
                cb(done, total);
            }
        }

        result.events.sort_by_key(|e| e.timestamp);

        info!(
            events = result.events.len(),
            diagnostics = result.diagnostics.len(),
            "batch classification complete"
        );
        Ok(result)
    }
}

/// Borrow every (transaction, receipt) pair, or report the first
/// transaction that arrived without one.
fn ensure_receipts(
    items: &[(Transaction, Option<Receipt>)],
) -> Result<Vec<(&Transaction, &Receipt)>, BatchError> {
    items
        .iter()
        .map(|(tx, receipt)| {
            receipt
                .as_ref()
                .map(|r| (tx, r))
                .ok_or_else(|| BatchError::MissingReceipt {
                    tx_hash: tx.link(),
                })
        })
        .collect()
}
