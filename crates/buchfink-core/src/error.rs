//! Error types for the classification pipeline.

use thiserror::Error;

/// Errors raised while reading hex-encoded log fields or slicing words out
/// of log data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Invalid hex in {field}: {reason}")]
    InvalidHex { field: String, reason: String },

    #[error("Bad length for {field}: expected {expected} bytes, got {got}")]
    BadLength {
        field: String,
        expected: usize,
        got: usize,
    },

    #[error("Slice {start}..{end} out of bounds for {len}-byte buffer")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Missing topic {index} (log has {available})")]
    MissingTopic { index: usize, available: usize },

    #[error("Too many topics: {count}")]
    TooManyTopics { count: usize },
}

/// The injected asset resolver could not map a key to an asset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No asset known for {key}")]
    Unresolved { key: String },
}

/// Per-log classification failures. These never escape `classify_tx`; the
/// classifier turns them into diagnostics and moves on to the next log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("Malformed log data: {0}")]
    MalformedLogData(#[from] DecodeError),

    #[error("Unresolved asset: {0}")]
    UnresolvedAsset(#[from] ResolveError),
}

/// Errors from building a signature catalog or parsing rule files.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Rule '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("Invalid rule '{name}': {reason}")]
    InvalidRule { name: String, reason: String },

    #[error("Parse error in rule file: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from turning an account definition into an [`crate::Account`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Invalid account definition '{0}'")]
    InvalidDefinition(String),

    #[error("ENS names must be resolved before classification: '{0}'")]
    EnsUnsupported(String),

    #[error("Invalid address for account '{name}': {source}")]
    InvalidAddress {
        name: String,
        #[source]
        source: DecodeError,
    },
}

/// Errors that abort a whole batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The caller handed over a transaction without its receipt. This points
    /// at a bug in the fetch layer and is never swallowed. `tx_hash` is
    /// unprefixed hex, the same form batch diagnostics use.
    #[error("Missing receipt for transaction {tx_hash}")]
    MissingReceipt { tx_hash: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),
}

impl ClassifyError {
    /// Short machine-readable label, used in log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MalformedLogData(_) => "malformed_log_data",
            Self::UnresolvedAsset(_) => "unresolved_asset",
        }
    }
}
