//! Raw and normalized logs, receipts, and transactions.

use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::encoding::to_hex_prefixed;
use crate::error::DecodeError;

/// A log exactly as a JSON-RPC node or cache hands it over.
/// Hex fields may be in any case, with or without `0x`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    /// Contract address that emitted the log
    pub address: String,
    /// topics[0] is the event signature hash; topics[1..] are indexed params
    pub topics: Vec<String>,
    /// ABI-encoded non-indexed params
    #[serde(default)]
    pub data: String,
}

impl RawLog {
    pub fn new(address: impl Into<String>, topics: Vec<String>, data: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            topics,
            data: data.into(),
        }
    }
}

/// A normalized log. Built once per receipt, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

impl LogEntry {
    pub fn new(address: Address, topics: Vec<B256>, data: impl Into<Bytes>) -> Self {
        Self {
            address,
            topics,
            data: data.into(),
        }
    }

    /// topics[0], if the log is not anonymous.
    pub fn signature(&self) -> Option<&B256> {
        self.topics.first()
    }

    /// Topic at `index`, or `MissingTopic` when the log is too short.
    pub fn topic(&self, index: usize) -> Result<&B256, DecodeError> {
        self.topics.get(index).ok_or(DecodeError::MissingTopic {
            index,
            available: self.topics.len(),
        })
    }

    /// Canonical lower-case `0x` form of the emitting address.
    pub fn address_hex(&self) -> String {
        to_hex_prefixed(self.address)
    }

    pub fn data_hex(&self) -> String {
        to_hex_prefixed(&self.data)
    }
}

/// All logs emitted by one transaction, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub logs: Vec<RawLog>,
}

impl Receipt {
    pub fn new(logs: Vec<RawLog>) -> Self {
        Self { logs }
    }
}

/// The transaction fields the classifier needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: B256,
    #[serde(alias = "from")]
    pub from_address: Address,
    /// Block timestamp (Unix seconds, UTC)
    pub timestamp: u64,
}

impl Transaction {
    pub fn new(hash: B256, from_address: Address, timestamp: u64) -> Self {
        Self {
            hash,
            from_address,
            timestamp,
        }
    }

    /// The transaction hash as lower-case hex without a `0x` prefix.
    pub fn link(&self) -> String {
        hex::encode(self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_out_of_range() {
        let log = LogEntry::new(Address::ZERO, vec![B256::ZERO], Bytes::new());
        assert!(log.topic(0).is_ok());
        assert_eq!(
            log.topic(2),
            Err(DecodeError::MissingTopic {
                index: 2,
                available: 1
            })
        );
    }

    #[test]
    fn link_has_no_prefix() {
        let tx = Transaction::new(B256::repeat_byte(0xab), Address::ZERO, 0);
        assert_eq!(tx.link(), "ab".repeat(32));
    }

    #[test]
    fn receipt_from_rpc_json() {
        let json = r#"{
            "transactionHash": "0x01",
            "status": "0x1",
            "logs": [{
                "address": "0x090D4613473dEE047c3f2706764f49E0821D256e",
                "topics": ["0x4ec90e965519d92681267467f775ada5bd214aa92c0dc93d90a5e880ce9ed026"],
                "data": "0x",
                "logIndex": "0x3"
            }]
        }"#;
        let receipt: Receipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.logs[0].topics.len(), 1);
    }

    #[test]
    fn transaction_accepts_rpc_from_field() {
        let json = r#"{
            "hash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "from": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "timestamp": 1600000000
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.from_address, Address::repeat_byte(0xaa));
        assert_eq!(tx.timestamp, 1_600_000_000);
    }
}
