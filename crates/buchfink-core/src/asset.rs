//! Asset identity and the resolver seam.
//!
//! Rules never decide what an asset *is*. They hand an [`AssetKey`] to an
//! injected [`AssetResolver`], which owns the mapping to whatever identifier
//! the accounting side uses.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::encoding::to_hex_prefixed;
use crate::error::ResolveError;

/// A resolved asset, e.g. `eip155:1/erc20:0x1f98…` / `UNI`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    /// Identifier understood by the downstream accounting layer
    pub identifier: String,
    /// Ticker symbol used in human-readable amounts
    pub symbol: String,
}

impl AssetRef {
    pub fn new(identifier: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// What a rule asks the resolver about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetKey {
    /// A well-known symbol such as `UNI`
    Symbol(String),
    /// A token contract address
    Token(Address),
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKey::Symbol(s) => write!(f, "{s}"),
            AssetKey::Token(a) => write!(f, "{}", to_hex_prefixed(a)),
        }
    }
}

/// Maps symbols and token addresses to asset identities.
///
/// # Thread Safety
/// Shared by every classification call, possibly from many Rayon workers.
pub trait AssetResolver: Send + Sync {
    fn resolve(&self, key: &AssetKey) -> Result<AssetRef, ResolveError>;
}

/// A resolver backed by two fixed lookup tables.
#[derive(Debug, Clone, Default)]
pub struct StaticAssetResolver {
    symbols: HashMap<String, AssetRef>,
    tokens: HashMap<Address, AssetRef>,
}

impl StaticAssetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token under both its symbol and its contract address.
    pub fn with_token(mut self, symbol: &str, address: Address, identifier: &str) -> Self {
        self.insert_token(symbol, address, identifier);
        self
    }

    /// Register an asset that is only known by symbol (e.g. native ETH).
    pub fn with_symbol(mut self, symbol: &str, identifier: &str) -> Self {
        self.symbols
            .insert(symbol.to_ascii_uppercase(), AssetRef::new(identifier, symbol));
        self
    }

    pub fn insert_token(&mut self, symbol: &str, address: Address, identifier: &str) {
        let asset = AssetRef::new(identifier, symbol);
        self.symbols.insert(symbol.to_ascii_uppercase(), asset.clone());
        self.tokens.insert(address, asset);
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl AssetResolver for StaticAssetResolver {
    fn resolve(&self, key: &AssetKey) -> Result<AssetRef, ResolveError> {
        let found = match key {
            AssetKey::Symbol(s) => self.symbols.get(&s.to_ascii_uppercase()),
            AssetKey::Token(a) => self.tokens.get(a),
        };
        found.cloned().ok_or_else(|| ResolveError::Unresolved {
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> StaticAssetResolver {
        StaticAssetResolver::new()
            .with_token("UNI", Address::repeat_byte(0x1f), "eip155:1/erc20:uni")
            .with_symbol("ETH", "ETH")
    }

    #[test]
    fn resolves_by_symbol_case_insensitively() {
        let r = resolver();
        let asset = r.resolve(&AssetKey::Symbol("uni".into())).unwrap();
        assert_eq!(asset.symbol, "UNI");
        assert_eq!(asset.identifier, "eip155:1/erc20:uni");
    }

    #[test]
    fn resolves_by_token_address() {
        let r = resolver();
        let asset = r.resolve(&AssetKey::Token(Address::repeat_byte(0x1f))).unwrap();
        assert_eq!(asset.symbol, "UNI");
    }

    #[test]
    fn unknown_token_is_unresolved() {
        let r = resolver();
        let err = r
            .resolve(&AssetKey::Token(Address::repeat_byte(0x02)))
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::Unresolved {
                key: "0x0202020202020202020202020202020202020202".into()
            }
        );
    }
}
