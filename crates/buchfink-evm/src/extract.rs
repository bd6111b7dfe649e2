//! Applies one `EventRule` to one normalized log.
//!
//! The outcome distinguishes three cases the classifier reports
//! differently: the rule matched, the log is a different variant of the
//! same signature, or the rule matched but its companion log is missing.
//! A log too short for the recipe surfaces as `Err(DecodeError)`.

use alloy_primitives::{Address, U256};
use buchfink_core::{
    AmountSource, AssetKey, AssetSource, DecodeError, EventRule, Guard, LogEntry,
};

use crate::correlate;
use crate::word::{data_word, word_to_address, word_to_uint};

/// Everything a rule may look at besides its own definition.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The watched account's address
    pub account: &'a Address,
    /// The primary log
    pub log: &'a LogEntry,
    /// Every successfully normalized log of the receipt, primary included
    pub siblings: &'a [LogEntry],
}

/// The values a matched rule pulled out of the receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<'a> {
    pub raw: U256,
    pub asset_key: AssetKey,
    pub companion: Option<&'a LogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<'a> {
    Matched(Extracted<'a>),
    /// Contract predicate or a guard did not hold
    Unmatched,
    CompanionNotFound,
}

/// Evaluate `rule` against the primary log in `ctx`.
pub fn extract<'a>(rule: &EventRule, ctx: &RuleContext<'a>) -> Result<Extraction<'a>, DecodeError> {
    if !rule.contracts.matches(&ctx.log.address) {
        return Ok(Extraction::Unmatched);
    }
    for guard in &rule.guards {
        if !guard_holds(guard, ctx)? {
            return Ok(Extraction::Unmatched);
        }
    }

    let (raw, companion) = match &rule.amount {
        AmountSource::DataWord(index) => (word_to_uint(&data_word(&ctx.log.data, *index)?), None),
        AmountSource::Topic(index) => (word_to_uint(ctx.log.topic(*index)?), None),
        AmountSource::Fixed(value) => (*value, None),
        AmountSource::Companion(spec) => {
            match correlate::find_for_account(ctx.log, ctx.siblings, spec, ctx.account) {
                Some(found) => (word_to_uint(&data_word(&found.data, spec.amount_word)?), Some(found)),
                None => return Ok(Extraction::CompanionNotFound),
            }
        }
    };

    let asset_key = match &rule.asset {
        AssetSource::Symbol(symbol) => AssetKey::Symbol(symbol.clone()),
        AssetSource::Token(address) => AssetKey::Token(*address),
        AssetSource::EmittingContract => AssetKey::Token(ctx.log.address),
        AssetSource::CompanionContract => match companion {
            Some(found) => AssetKey::Token(found.address),
            None => return Ok(Extraction::CompanionNotFound),
        },
    };

    Ok(Extraction::Matched(Extracted {
        raw,
        asset_key,
        companion,
    }))
}

fn guard_holds(guard: &Guard, ctx: &RuleContext<'_>) -> Result<bool, DecodeError> {
    Ok(match guard {
        Guard::TopicIsAccount { topic } => word_to_address(ctx.log.topic(*topic)?) == *ctx.account,
        Guard::DataWordIsAccount { word } => {
            word_to_address(&data_word(&ctx.log.data, *word)?) == *ctx.account
        }
        Guard::TopicOneOf { topic, addresses } => {
            addresses.contains(&word_to_address(ctx.log.topic(*topic)?))
        }
    })
}
