//! Golden fixture integration tests.
//!
//! Each fixture in `fixtures/receipts/` holds an account, a transaction, its
//! JSON-RPC receipt and the events the built-in catalog must produce for it.

use bigdecimal::BigDecimal;
use buchfink_catalog::builtin;
use buchfink_core::{Account, EventKind, EventSubtype, Receipt, Transaction, TxClassifier};
use buchfink_evm::Classifier;
use std::str::FromStr;
use std::sync::Arc;

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// The fixtures live two levels above the crate root.
fn fixture_path(name: &str) -> std::path::PathBuf {
    let mut p = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("../../fixtures/receipts");
    p.push(name);
    p
}

struct Fixture {
    account: Account,
    tx: Transaction,
    receipt: Receipt,
    expected: Vec<serde_json::Value>,
}

fn load(name: &str) -> Fixture {
    let text = std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("fixture {name} not found: {e}"));
    let f: serde_json::Value = serde_json::from_str(&text).expect("fixture is not JSON");
    Fixture {
        account: Account::from_definition(f["account"].as_str().unwrap()).unwrap(),
        tx: serde_json::from_value(f["transaction"].clone()).unwrap(),
        receipt: serde_json::from_value(f["receipt"].clone()).unwrap(),
        expected: f["expected"].as_array().unwrap().clone(),
    }
}

fn classifier() -> Classifier {
    Classifier::new(
        Arc::new(builtin::catalog().unwrap()),
        Arc::new(builtin::asset_resolver()),
    )
}

/// Classify a fixture and compare every event against its expectations.
fn check(name: &str) {
    let f = load(name);
    let events = classifier().classify_tx(&f.account, &f.tx, &f.receipt);
    assert_eq!(events.len(), f.expected.len(), "{name}: event count");

    for (event, want) in events.iter().zip(&f.expected) {
        assert_eq!(event.rule, want["rule"].as_str().unwrap(), "{name}: rule");
        assert_eq!(
            event.kind,
            EventKind::from_str(want["kind"].as_str().unwrap()).unwrap(),
            "{name}: kind"
        );
        assert_eq!(
            event.subtype,
            EventSubtype::from_str(want["subtype"].as_str().unwrap()).unwrap(),
            "{name}: subtype"
        );
        assert_eq!(event.asset.symbol, want["symbol"].as_str().unwrap(), "{name}: symbol");
        assert_eq!(
            event.amount,
            BigDecimal::from_str(want["amount"].as_str().unwrap()).unwrap(),
            "{name}: amount"
        );
        assert_eq!(event.timestamp, f.tx.timestamp);
        assert_eq!(event.link, f.tx.link());
    }
}

// ─── Fixtures ─────────────────────────────────────────────────────────────────

#[test]
fn uniswap_airdrop_golden() {
    check("uniswap-airdrop.json");
}

#[test]
fn uniswap_reward_golden() {
    check("uniswap-reward.json");
}

#[test]
fn curve_mint_golden() {
    check("curve-mint.json");
}

#[test]
fn curve_mint_without_transfer_golden() {
    check("curve-mint-no-transfer.json");
}

#[test]
fn hex_stake_end_golden() {
    check("hex-stake-end.json");
}

#[test]
fn dai_mint_upper_case_golden() {
    check("dai-mint.json");
}

#[test]
fn airdrop_display_amount() {
    let f = load("uniswap-airdrop.json");
    let events = classifier().classify_tx(&f.account, &f.tx, &f.receipt);
    assert_eq!(events[0].display_amount(), "400 UNI");
    assert_eq!(
        events[0].asset.identifier,
        "eip155:1/erc20:0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984"
    );
}
