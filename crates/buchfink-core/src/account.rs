//! Watched accounts.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::encoding::parse_address;
use crate::error::AccountError;

/// What kind of account a name refers to. Only Ethereum accounts have
/// transactions this crate family can classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Ethereum,
    Bitcoin,
    Exchange,
    File,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::Ethereum => write!(f, "ethereum"),
            AccountKind::Bitcoin => write!(f, "bitcoin"),
            AccountKind::Exchange => write!(f, "exchange"),
            AccountKind::File => write!(f, "file"),
        }
    }
}

/// An account whose transactions are classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub kind: AccountKind,
    /// On-chain address; `None` for exchange and file accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Account {
    pub fn new(name: impl Into<String>, kind: AccountKind, address: Option<Address>) -> Self {
        Self {
            name: name.into(),
            kind,
            address,
        }
    }

    pub fn ethereum(name: impl Into<String>, address: Address) -> Self {
        Self::new(name, AccountKind::Ethereum, Some(address))
    }

    /// Build an account from a bare definition such as `0x1234…`.
    ///
    /// The definition doubles as the account name. `.eth` names are refused;
    /// resolving them needs a node, which lives outside this crate.
    pub fn from_definition(definition: &str) -> Result<Self, AccountError> {
        let def = definition.trim();
        if def.to_ascii_lowercase().ends_with(".eth") {
            return Err(AccountError::EnsUnsupported(def.to_string()));
        }
        if def.starts_with("0x") || def.starts_with("0X") {
            let address =
                parse_address(def, "account").map_err(|source| AccountError::InvalidAddress {
                    name: def.to_string(),
                    source,
                })?;
            return Ok(Self::ethereum(def, address));
        }
        Err(AccountError::InvalidDefinition(def.to_string()))
    }

    /// The address whose transactions get classified, if this account has one.
    pub fn watched_address(&self) -> Option<Address> {
        match self.kind {
            AccountKind::Ethereum => self.address,
            _ => None,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
