//! Classifier configuration, read from YAML.
//!
//! ```yaml
//! log:
//!   level: info
//!   components: { buchfink-evm: debug }
//! builtin_rules: true
//! rule_files: [rules/extra.yaml]
//! chunk_size: 500
//! accounts:
//!   - name: hot-wallet
//!     ethereum: "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
//!   - name: kraken
//!     exchange: kraken
//! ```

use buchfink_catalog::{builtin, SignatureCatalog};
use buchfink_core::{
    encoding::parse_address, Account, AccountError, AccountKind, Address, AssetResolver,
    BatchError,
};
use buchfink_evm::Classifier;
use buchfink_observability::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::engine::BatchEngine;
use crate::request::DEFAULT_CHUNK_SIZE;

/// One configured account. Exactly one of the typed keys is expected; when
/// several are given the first in the order ethereum, bitcoin, exchange,
/// file wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethereum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitcoin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl AccountConfig {
    pub fn kind(&self) -> Option<AccountKind> {
        if self.ethereum.is_some() {
            Some(AccountKind::Ethereum)
        } else if self.bitcoin.is_some() {
            Some(AccountKind::Bitcoin)
        } else if self.exchange.is_some() {
            Some(AccountKind::Exchange)
        } else if self.file.is_some() {
            Some(AccountKind::File)
        } else {
            None
        }
    }

    pub fn to_account(&self) -> Result<Account, AccountError> {
        let kind = self
            .kind()
            .ok_or_else(|| AccountError::InvalidDefinition(self.name.clone()))?;
        let address = match (&kind, self.ethereum.as_deref()) {
            (AccountKind::Ethereum, Some(addr)) => Some(self.parse_ethereum(addr)?),
            _ => None,
        };
        Ok(Account::new(self.name.clone(), kind, address))
    }

    fn parse_ethereum(&self, addr: &str) -> Result<Address, AccountError> {
        if addr.trim().to_ascii_lowercase().ends_with(".eth") {
            return Err(AccountError::EnsUnsupported(addr.trim().to_string()));
        }
        parse_address(addr, "ethereum").map_err(|source| AccountError::InvalidAddress {
            name: self.name.clone(),
            source,
        })
    }
}

/// Top-level classifier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub log: LogConfig,
    /// Register the built-in mainnet rules before any rule file
    #[serde(default = "bool_true")]
    pub builtin_rules: bool,
    /// YAML rule files; relative paths resolve against the config file
    #[serde(default)]
    pub rule_files: Vec<PathBuf>,
    /// Transactions per parallel chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

fn bool_true() -> bool { true }
fn default_chunk_size() -> usize { DEFAULT_CHUNK_SIZE }

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            builtin_rules: true,
            rule_files: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            accounts: Vec::new(),
        }
    }
}

impl ClassifierConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, BatchError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| BatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file. Relative `rule_files` entries are rewritten to be
    /// relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self, BatchError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BatchError::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_yaml_str(&text)?;
        if let Some(base) = path.parent() {
            for file in &mut config.rule_files {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }
        debug!(path = %path.display(), accounts = config.accounts.len(), "config loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<(), BatchError> {
        if self.chunk_size == 0 {
            return Err(BatchError::Config("chunk_size must be at least 1".into()));
        }
        if !self.builtin_rules && self.rule_files.is_empty() {
            return Err(BatchError::Config(
                "no rules: builtin_rules is off and rule_files is empty".into(),
            ));
        }
        Ok(())
    }

    /// Built-in rules (if enabled) followed by every rule file, in order.
    pub fn build_catalog(&self) -> Result<SignatureCatalog, BatchError> {
        let mut builder = SignatureCatalog::builder();
        if self.builtin_rules {
            builtin::register(&mut builder)?;
        }
        for file in &self.rule_files {
            builder.load_file(file)?;
        }
        Ok(builder.build())
    }

    pub fn accounts(&self) -> Result<Vec<Account>, BatchError> {
        self.accounts
            .iter()
            .map(|a| a.to_account().map_err(BatchError::from))
            .collect()
    }

    /// A classifier over `build_catalog()`.
    pub fn classifier(&self, resolver: Arc<dyn AssetResolver>) -> Result<Classifier, BatchError> {
        Ok(Classifier::new(Arc::new(self.build_catalog()?), resolver))
    }

    /// A batch engine over `classifier()`.
    pub fn engine(&self, resolver: Arc<dyn AssetResolver>) -> Result<BatchEngine, BatchError> {
        Ok(BatchEngine::new(Arc::new(self.classifier(resolver)?)))
    }
}
