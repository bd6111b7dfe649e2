//! Classification rules: declarative data in place of branching on
//! topic hashes.
//!
//! An [`EventRule`] is pure data: which signature it answers to, which
//! contracts may emit it, which secondary checks must hold, where the amount
//! and the asset come from, and what kind of event it produces. Rules are
//! stored in a [`RuleCatalog`]; concrete catalogs live in `buchfink-catalog`.

use alloy_primitives::{Address, B256, U256};

use crate::error::CatalogError;
use crate::event::{EventKind, EventSubtype};

/// Which emitting contracts a rule accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressPredicate {
    /// Any contract
    Any,
    /// One of a fixed set of contracts
    OneOf(Vec<Address>),
}

impl AddressPredicate {
    pub fn matches(&self, address: &Address) -> bool {
        match self {
            AddressPredicate::Any => true,
            AddressPredicate::OneOf(list) => list.contains(address),
        }
    }

    /// Whether some address would satisfy both predicates.
    pub fn overlaps(&self, other: &AddressPredicate) -> bool {
        match (self, other) {
            (AddressPredicate::Any, _) | (_, AddressPredicate::Any) => true,
            (AddressPredicate::OneOf(a), AddressPredicate::OneOf(b)) => {
                a.iter().any(|x| b.contains(x))
            }
        }
    }
}

/// A secondary check on the primary log, evaluated after the address
/// predicate. A failed guard means "different variant", not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// topics[topic] holds the watched account's address
    TopicIsAccount { topic: usize },
    /// data word `word` holds the watched account's address
    DataWordIsAccount { word: usize },
    /// topics[topic] holds one of the listed addresses
    TopicOneOf { topic: usize, addresses: Vec<Address> },
}

/// Which contract a companion log must come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanionToken {
    Any,
    Address(Address),
}

/// Describes the sibling log that carries the amount for a primary log,
/// typically an ERC-20 `Transfer` to the watched account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionSpec {
    /// topic0 of the companion
    pub signature: B256,
    pub token: CompanionToken,
    /// Topic holding the recipient; must equal the watched account
    pub recipient_topic: usize,
    /// Data word holding the amount
    pub amount_word: usize,
}

impl CompanionSpec {
    /// An ERC-20 `Transfer(from, to, value)` to the watched account.
    pub fn erc20_transfer(token: CompanionToken) -> Self {
        Self {
            signature: crate::fingerprint::TRANSFER,
            token,
            recipient_topic: 2,
            amount_word: 0,
        }
    }
}

/// Where the raw integer amount comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountSource {
    /// A 32-byte word of the primary log's data
    DataWord(usize),
    /// An indexed topic of the primary log
    Topic(usize),
    /// A constant, for events that carry no amount
    Fixed(U256),
    /// A word of a companion log found elsewhere in the receipt
    Companion(CompanionSpec),
}

/// Where the asset identity comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Symbol(String),
    Token(Address),
    /// The contract that emitted the primary log
    EmittingContract,
    /// The contract that emitted the companion log
    CompanionContract,
}

/// A single classification rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRule {
    /// Unique rule name, e.g. "UniswapAirdrop"
    pub name: String,
    /// topic0 this rule answers to
    pub signature: B256,
    pub contracts: AddressPredicate,
    pub guards: Vec<Guard>,
    pub amount: AmountSource,
    pub asset: AssetSource,
    /// Decimal exponent the raw amount is divided by
    pub decimals: u8,
    pub kind: EventKind,
    pub subtype: EventSubtype,
    /// Notes template; `{account}`, `{contract}` and `{tx}` are substituted
    pub notes: String,
}

impl EventRule {
    /// A rule with permissive defaults: any contract, amount in data word 0,
    /// asset = emitting contract, 18 decimals, plain receive.
    pub fn new(name: impl Into<String>, signature: B256) -> Self {
        Self {
            name: name.into(),
            signature,
            contracts: AddressPredicate::Any,
            guards: Vec::new(),
            amount: AmountSource::DataWord(0),
            asset: AssetSource::EmittingContract,
            decimals: 18,
            kind: EventKind::Receive,
            subtype: EventSubtype::None,
            notes: String::new(),
        }
    }

    pub fn contracts(mut self, contracts: impl IntoIterator<Item = Address>) -> Self {
        self.contracts = AddressPredicate::OneOf(contracts.into_iter().collect());
        self
    }

    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn amount(mut self, amount: AmountSource) -> Self {
        self.amount = amount;
        self
    }

    pub fn asset(mut self, asset: AssetSource) -> Self {
        self.asset = asset;
        self
    }

    pub fn decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn classify_as(mut self, kind: EventKind, subtype: EventSubtype) -> Self {
        self.kind = kind;
        self.subtype = subtype;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Whether the amount has to be looked up in a companion log.
    pub fn needs_companion(&self) -> bool {
        matches!(self.amount, AmountSource::Companion(_))
    }

    /// Reject rules that can never produce an event.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidRule {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("rule name is empty"));
        }
        if self.signature == B256::ZERO {
            return Err(invalid("signature is zero"));
        }
        if matches!(&self.contracts, AddressPredicate::OneOf(list) if list.is_empty()) {
            return Err(invalid("contract list is empty"));
        }
        if self.asset == AssetSource::CompanionContract && !self.needs_companion() {
            return Err(invalid("companion asset requires a companion amount"));
        }
        for guard in &self.guards {
            if let Guard::TopicIsAccount { topic } | Guard::TopicOneOf { topic, .. } = guard {
                if *topic == 0 || *topic > 3 {
                    return Err(invalid("guard topic must be 1..=3"));
                }
            }
        }
        Ok(())
    }
}

/// A read-only view of a rule catalog, keyed by topic0.
///
/// # Thread Safety
/// Catalogs are built once and then shared across classification calls and
/// Rayon workers, so implementations must be `Send + Sync` and immutable.
pub trait RuleCatalog: Send + Sync {
    /// All rules registered for `signature`, in registration order.
    fn lookup(&self, signature: &B256) -> &[EventRule];

    /// Whether any rule answers to `signature`.
    fn contains(&self, signature: &B256) -> bool {
        !self.lookup(signature).is_empty()
    }

    /// Every rule, in registration order.
    fn rules(&self) -> Vec<&EventRule>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
