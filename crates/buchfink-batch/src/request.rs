//! Batch classification request configuration.

use buchfink_core::{Account, Receipt, Transaction};

/// Default number of transactions per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000;

/// Configuration for a batch classification job.
pub struct BatchRequest {
    /// Whose transactions these are
    pub account: Account,
    /// Transactions paired with their receipts, in any order
    pub items: Vec<(Transaction, Option<Receipt>)>,
    /// Max transactions per chunk
    pub chunk_size: usize,
    /// Called after each chunk with (transactions done, total)
    pub on_progress: Option<Box<dyn Fn(usize, usize) + Send + Sync>>,
}

impl BatchRequest {
    pub fn new(account: Account, items: Vec<(Transaction, Option<Receipt>)>) -> Self {
        Self {
            account,
            items,
            chunk_size: DEFAULT_CHUNK_SIZE,
            on_progress: None,
        }
    }

    /// Set the chunk size. Zero is treated as one.
    pub fn chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = n.max(1);
        self
    }

    pub fn on_progress<F: Fn(usize, usize) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for BatchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRequest")
            .field("account", &self.account.name)
            .field("items", &self.items.len())
            .field("chunk_size", &self.chunk_size)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}
