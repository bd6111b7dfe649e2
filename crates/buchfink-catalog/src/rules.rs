//! YAML rule files.
//!
//! A rule file holds one or more YAML documents separated by `---`. Each
//! document maps `rule <Name>` keys to rule bodies:
//!
//! ```yaml
//! rule UniswapAirdrop:
//!   signature: "Claimed(uint256,address,uint256)"
//!   contracts: "0x090D4613473dEE047c3f2706764f49E0821D256e"
//!   guards:
//!     - data_word_is_account: 1
//!   amount:
//!     data_word: 2
//!   asset: UNI
//!   decimals: 18
//!   kind: receive
//!   subtype: airdrop
//! ```
//!
//! `signature` takes either the canonical event signature or its hash;
//! `fingerprint` takes only the hash. `asset` is a symbol, a token address,
//! `emitting_contract` or `companion_contract`. An omitted `contracts`
//! accepts any emitter; an omitted `amount` reads data word 0.

use alloy_primitives::{Address, B256, U256};
use buchfink_core::{
    encoding::{parse_address, parse_word},
    fingerprint::{self, keccak256_signature},
    AmountSource, AssetSource, CatalogError, CompanionSpec, CompanionToken, EventKind, EventRule,
    EventSubtype, Guard,
};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

// ─── Raw serde types ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleRaw {
    #[serde(default)]
    signature: Option<String>,
    #[serde(default)]
    fingerprint: Option<String>,
    #[serde(default)]
    contracts: Option<serde_yaml::Value>,
    #[serde(default)]
    guards: Vec<GuardRaw>,
    #[serde(default)]
    amount: Option<AmountRaw>,
    #[serde(default)]
    asset: Option<String>,
    #[serde(default = "default_decimals")]
    decimals: u8,
    kind: String,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    notes: String,
}

fn default_decimals() -> u8 {
    18
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GuardRaw {
    #[serde(default)]
    topic_is_account: Option<usize>,
    #[serde(default)]
    data_word_is_account: Option<usize>,
    #[serde(default)]
    topic_one_of: Option<TopicOneOfRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TopicOneOfRaw {
    topic: usize,
    addresses: serde_yaml::Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AmountRaw {
    #[serde(default)]
    data_word: Option<usize>,
    #[serde(default)]
    topic: Option<usize>,
    #[serde(default)]
    fixed: Option<serde_yaml::Value>,
    #[serde(default)]
    companion: Option<CompanionRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CompanionRaw {
    #[serde(default)]
    signature: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default = "default_recipient_topic")]
    recipient_topic: usize,
    #[serde(default)]
    amount_word: usize,
}

fn default_recipient_topic() -> usize {
    2
}

// ─── Parser ──────────────────────────────────────────────────────────────────

pub struct RuleFile;

impl RuleFile {
    /// Parse every rule in a YAML string, in file order.
    pub fn parse_all(yaml: &str) -> Result<Vec<EventRule>, CatalogError> {
        use serde::de::Deserialize as _;

        let mut rules = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            let value = serde_yaml::Value::deserialize(doc)
                .map_err(|e| CatalogError::Parse(e.to_string()))?;
            // trailing `---` yields an empty document
            if value.is_null() {
                continue;
            }
            let entries: IndexMap<String, RuleRaw> = serde_yaml::from_value(value)
                .map_err(|e| CatalogError::Parse(e.to_string()))?;
            for (key, raw) in entries {
                let name = key
                    .strip_prefix("rule ")
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| CatalogError::Parse(format!("expected 'rule <Name>', got '{key}'")))?;
                rules.push(build_rule(name, raw)?);
            }
        }
        Ok(rules)
    }

    /// Read and parse a rule file.
    pub fn load(path: &Path) -> Result<Vec<EventRule>, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_all(&content)
            .map_err(|e| CatalogError::Parse(format!("{}: {e}", path.display())))
    }
}

fn build_rule(name: &str, raw: RuleRaw) -> Result<EventRule, CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidRule {
        name: name.to_string(),
        reason,
    };

    let signature = match (raw.signature.as_deref(), raw.fingerprint.as_deref()) {
        (Some(_), Some(_)) => return Err(invalid("give either signature or fingerprint".into())),
        (None, None) => return Err(invalid("missing signature".into())),
        (Some(sig), None) => parse_signature(sig).map_err(&invalid)?,
        (None, Some(fp)) => parse_word(fp, "fingerprint").map_err(|e| invalid(e.to_string()))?,
    };

    let mut rule = EventRule::new(name, signature)
        .decimals(raw.decimals)
        .notes(raw.notes);

    if let Some(contracts) = &raw.contracts {
        rule = rule.contracts(address_list(contracts, "contracts").map_err(&invalid)?);
    }

    for guard in &raw.guards {
        rule = rule.guard(parse_guard(guard).map_err(&invalid)?);
    }

    if let Some(amount) = &raw.amount {
        rule = rule.amount(parse_amount(amount).map_err(&invalid)?);
    }

    if let Some(asset) = &raw.asset {
        rule = rule.asset(parse_asset(asset).map_err(&invalid)?);
    }

    let kind = EventKind::from_str(&raw.kind).map_err(&invalid)?;
    let subtype = match raw.subtype.as_deref() {
        Some(s) => EventSubtype::from_str(s).map_err(&invalid)?,
        None => EventSubtype::None,
    };
    Ok(rule.classify_as(kind, subtype))
}

/// Canonical signature text is hashed; anything else must be a 32-byte hex hash.
fn parse_signature(input: &str) -> Result<B256, String> {
    if fingerprint::is_signature_text(input) {
        let canonical: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        Ok(keccak256_signature(&canonical))
    } else {
        parse_word(input, "signature").map_err(|e| e.to_string())
    }
}

fn address_list(value: &serde_yaml::Value, field: &str) -> Result<Vec<Address>, String> {
    match value {
        serde_yaml::Value::String(s) => Ok(vec![parse_address(s, field).map_err(|e| e.to_string())?]),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| format!("{field}: addresses must be strings"))
                    .and_then(|s| parse_address(s, field).map_err(|e| e.to_string()))
            })
            .collect(),
        _ => Err(format!("{field}: expected an address or a list of addresses")),
    }
}

fn parse_guard(raw: &GuardRaw) -> Result<Guard, String> {
    match (raw.topic_is_account, raw.data_word_is_account, &raw.topic_one_of) {
        (Some(topic), None, None) => Ok(Guard::TopicIsAccount { topic }),
        (None, Some(word), None) => Ok(Guard::DataWordIsAccount { word }),
        (None, None, Some(one_of)) => Ok(Guard::TopicOneOf {
            topic: one_of.topic,
            addresses: address_list(&one_of.addresses, "topic_one_of.addresses")?,
        }),
        _ => Err("each guard needs exactly one of topic_is_account, data_word_is_account, topic_one_of".into()),
    }
}

fn parse_amount(raw: &AmountRaw) -> Result<AmountSource, String> {
    match (raw.data_word, raw.topic, &raw.fixed, &raw.companion) {
        (Some(word), None, None, None) => Ok(AmountSource::DataWord(word)),
        (None, Some(topic), None, None) => Ok(AmountSource::Topic(topic)),
        (None, None, Some(fixed), None) => parse_fixed(fixed).map(AmountSource::Fixed),
        (None, None, None, Some(companion)) => parse_companion(companion).map(AmountSource::Companion),
        _ => Err("amount needs exactly one of data_word, topic, fixed, companion".into()),
    }
}

/// Fixed amounts are raw integers; large ones must be quoted in YAML.
fn parse_fixed(value: &serde_yaml::Value) -> Result<U256, String> {
    match value {
        serde_yaml::Value::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| format!("fixed amount {n} is not an unsigned integer")),
        serde_yaml::Value::String(s) => {
            U256::from_str(s.trim()).map_err(|e| format!("fixed amount '{s}': {e}"))
        }
        _ => Err("fixed amount must be an integer".into()),
    }
}

fn parse_companion(raw: &CompanionRaw) -> Result<CompanionSpec, String> {
    let token = match raw.token.as_deref().map(str::trim) {
        None | Some("any") => CompanionToken::Any,
        Some(addr) => CompanionToken::Address(
            parse_address(addr, "companion.token").map_err(|e| e.to_string())?,
        ),
    };
    let mut spec = CompanionSpec::erc20_transfer(token);
    if let Some(sig) = raw.signature.as_deref() {
        spec.signature = parse_signature(sig)?;
    }
    spec.recipient_topic = raw.recipient_topic;
    spec.amount_word = raw.amount_word;
    Ok(spec)
}

fn parse_asset(input: &str) -> Result<AssetSource, String> {
    let input = input.trim();
    match input {
        "" => Err("asset is empty".into()),
        "emitting_contract" => Ok(AssetSource::EmittingContract),
        "companion_contract" => Ok(AssetSource::CompanionContract),
        s if s.starts_with("0x") || s.starts_with("0X") => parse_address(s, "asset")
            .map(AssetSource::Token)
            .map_err(|e| e.to_string()),
        s => Ok(AssetSource::Symbol(s.to_string())),
    }
}
