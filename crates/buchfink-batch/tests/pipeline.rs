//! Config file → catalog → batch engine, over every receipt fixture.

use buchfink_batch::{BatchRequest, ClassifierConfig};
use buchfink_catalog::builtin;
use buchfink_core::{AccountKind, DiagnosticKind, Receipt, Transaction};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

fn load_config() -> ClassifierConfig {
    ClassifierConfig::load(&fixtures().join("config/buchfink.yaml")).expect("config fixture")
}

/// Every receipt fixture, in file-name order.
fn receipt_items() -> Vec<(Transaction, Option<Receipt>)> {
    let mut paths: Vec<_> = std::fs::read_dir(fixtures().join("receipts"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    paths
        .iter()
        .map(|p| {
            let f: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(p).unwrap()).unwrap();
            (
                serde_json::from_value(f["transaction"].clone()).unwrap(),
                Some(serde_json::from_value(f["receipt"].clone()).unwrap()),
            )
        })
        .collect()
}

#[test]
fn config_fixture_loads() {
    let config = load_config();
    assert_eq!(config.chunk_size, 2);
    assert_eq!(config.log.directives(), "warn,buchfink_evm=debug");
    assert!(config.rule_files[0].is_absolute() || config.rule_files[0].exists());
    assert!(config.build_catalog().unwrap().overlaps().is_empty());

    let accounts = config.accounts().unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].kind, AccountKind::Ethereum);
    assert_eq!(accounts[1].kind, AccountKind::Exchange);
}

#[test]
fn whole_history_classified_in_time_order() {
    let config = load_config();
    let engine = config.engine(Arc::new(builtin::asset_resolver())).unwrap();
    let account = config.accounts().unwrap().remove(0);

    let progress = Arc::new(Mutex::new(Vec::new()));
    let sink = progress.clone();
    let req = BatchRequest::new(account, receipt_items())
        .chunk_size(config.chunk_size)
        .on_progress(move |done, total| sink.lock().unwrap().push((done, total)));
    let result = engine.classify(req).unwrap();

    assert_eq!(result.transactions, 6);
    assert_eq!(*progress.lock().unwrap(), vec![(2, 6), (4, 6), (6, 6)]);

    let rules: Vec<_> = result.events.iter().map(|e| e.rule.as_str()).collect();
    assert_eq!(
        rules,
        [
            "UniswapAirdrop",
            "UniswapLiquidityReward",
            "CurveMint",
            "HexStakeEnd",
            "HexMint",
            "DaiMint",
        ]
    );
    assert!(result
        .events
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));

    let airdrops = result.events.iter().filter(|e| e.link == "11".repeat(32)).count();
    assert_eq!(airdrops, 1, "one claim books one airdrop");

    let hex_mint = result.events.iter().find(|e| e.rule == "HexMint").unwrap();
    assert_eq!(hex_mint.display_amount(), "1234.56789012 HEX");
    assert_eq!(hex_mint.notes, "HEX minted to main");
}

#[test]
fn missing_companion_reported_against_its_transaction() {
    let config = load_config();
    let engine = config.engine(Arc::new(builtin::asset_resolver())).unwrap();
    let account = config.accounts().unwrap().remove(0);

    let result = engine
        .classify(BatchRequest::new(account, receipt_items()))
        .unwrap();
    let (tx_hash, _) = result
        .diagnostics
        .iter()
        .find(|(_, d)| {
            matches!(&d.kind, DiagnosticKind::CompanionNotFound { rule } if rule == "CurveMint")
        })
        .expect("CurveMint companion diagnostic");
    assert_eq!(tx_hash, &"66".repeat(32));
}

#[test]
fn exchange_account_yields_nothing() {
    let config = load_config();
    let engine = config.engine(Arc::new(builtin::asset_resolver())).unwrap();
    let account = config.accounts().unwrap().remove(1);

    let result = engine
        .classify(BatchRequest::new(account, receipt_items()))
        .unwrap();
    assert!(result.events.is_empty());
    assert!(result.diagnostics.is_empty());
}
