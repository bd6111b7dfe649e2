//! Converts a JSON-RPC `RawLog` into a canonical `LogEntry`.
//!
//! Hex fields are parsed into typed bytes, so case and prefix differences
//! disappear here. The input log is borrowed and never modified.

use buchfink_core::{
    encoding::{decode_hex, parse_address, parse_word},
    DecodeError, LogEntry, RawLog,
};

/// EVM logs carry at most four topics (LOG0..LOG4).
pub const MAX_TOPICS: usize = 4;

/// Normalize one raw log.
pub fn normalize(raw: &RawLog) -> Result<LogEntry, DecodeError> {
    if raw.topics.len() > MAX_TOPICS {
        return Err(DecodeError::TooManyTopics {
            count: raw.topics.len(),
        });
    }
    let address = parse_address(&raw.address, "address")?;
    let topics = raw
        .topics
        .iter()
        .enumerate()
        .map(|(i, t)| parse_word(t, &format!("topics[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    let data = decode_hex(&raw.data, "data")?;
    Ok(LogEntry::new(address, topics, data))
}

/// Normalize every log of a receipt, keeping failures in place so indices
/// still line up with the receipt.
pub fn normalize_all(logs: &[RawLog]) -> Vec<Result<LogEntry, DecodeError>> {
    logs.iter().map(normalize).collect()
}
