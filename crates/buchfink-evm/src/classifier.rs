//! `Classifier`: the `TxClassifier` implementation for EVM receipts.

use alloy_primitives::Address;
use buchfink_core::{
    encoding::{parse_address, parse_word},
    Account, AssetResolver, ClassifyError, ClassifyReport, DecodeError,
    Diagnostic, DiagnosticKind, EventRule, LogEntry, RawLog, Receipt, RuleCatalog, Transaction,
    TxClassifier,
};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::extract::{extract, Extracted, Extraction, RuleContext};
use crate::normalizer::normalize_all;
use crate::synth::{synthesize, NoteVars};

/// Classifies receipts against a shared, read-only rule catalog.
/// Cheap to clone; all state is behind `Arc`.
#[derive(Clone)]
pub struct Classifier {
    catalog: Arc<dyn RuleCatalog>,
    resolver: Arc<dyn AssetResolver>,
}

impl Classifier {
    pub fn new(catalog: Arc<dyn RuleCatalog>, resolver: Arc<dyn AssetResolver>) -> Self {
        Self { catalog, resolver }
    }

    /// Run every rule registered for the log's topic0.
    fn classify_log(
        &self,
        index: usize,
        log: &LogEntry,
        ctx: &TxContext<'_>,
        report: &mut ClassifyReport,
    ) {
        let Some(signature) = log.signature() else {
            trace!(log_index = index, "anonymous log skipped");
            return;
        };
        let rules = self.catalog.lookup(signature);
        if rules.is_empty() {
            trace!(log_index = index, %signature, "unrecognized signature");
            return;
        }

        let rule_ctx = RuleContext {
            account: &ctx.watched,
            log,
            siblings: &ctx.siblings,
        };
        let mut matched = false;
        for rule in rules {
            match extract(rule, &rule_ctx) {
                Ok(Extraction::Unmatched) => {}
                Ok(Extraction::CompanionNotFound) => {
                    matched = true;
                    debug!(log_index = index, rule = %rule.name, "no companion log in receipt");
                    report.diagnostics.push(Diagnostic::new(
                        index,
                        DiagnosticKind::CompanionNotFound {
                            rule: rule.name.clone(),
                        },
                    ));
                }
                Ok(Extraction::Matched(found)) => {
                    matched = true;
                    self.emit(index, rule, log, found, ctx, report);
                }
                Err(err) => {
                    matched = true;
                    self.report_malformed(index, Some(rule), err, report);
                }
            }
        }

        if !matched {
            debug!(
                log_index = index,
                %signature,
                contract = %log.address_hex(),
                "recognized signature, unmatched variant"
            );
            report.diagnostics.push(Diagnostic::new(
                index,
                DiagnosticKind::RecognizedUnmatched {
                    signature: *signature,
                },
            ));
        }
    }

    fn emit(
        &self,
        index: usize,
        rule: &EventRule,
        log: &LogEntry,
        found: Extracted<'_>,
        ctx: &TxContext<'_>,
        report: &mut ClassifyReport,
    ) {
        match self.resolver.resolve(&found.asset_key) {
            Ok(asset) => {
                let vars = NoteVars {
                    account: &ctx.account.name,
                    contract: &log.address,
                };
                let event = synthesize(rule, found.raw, asset, ctx.tx, vars);
                debug!(
                    log_index = index,
                    rule = %rule.name,
                    amount = %event.display_amount(),
                    "classified"
                );
                report.events.push(event);
            }
            Err(source) => {
                let err = ClassifyError::from(source);
                warn!(
                    log_index = index,
                    rule = %rule.name,
                    kind = err.label(),
                    error = %err,
                    "asset not resolved, log skipped"
                );
                report.diagnostics.push(Diagnostic::new(
                    index,
                    DiagnosticKind::UnresolvedAsset {
                        rule: rule.name.clone(),
                        asset: found.asset_key.to_string(),
                    },
                ));
            }
        }
    }

    fn report_malformed(
        &self,
        index: usize,
        rule: Option<&EventRule>,
        source: DecodeError,
        report: &mut ClassifyReport,
    ) {
        let err = ClassifyError::from(source);
        warn!(
            log_index = index,
            rule = rule.map(|r| r.name.as_str()).unwrap_or("-"),
            kind = err.label(),
            error = %err,
            "malformed log skipped"
        );
        report.diagnostics.push(Diagnostic::new(
            index,
            DiagnosticKind::Malformed {
                rule: rule.map(|r| r.name.clone()),
                reason: err.to_string(),
            },
        ));
    }

    /// A log that failed normalization is only worth a diagnostic when its
    /// topic0 still parses and is known to the catalog. If its address still
    /// parses too, some rule must accept that contract for the log to count
    /// as malformed; otherwise it is a recognized, unmatched variant.
    fn handle_unparseable(
        &self,
        index: usize,
        raw: &RawLog,
        err: &DecodeError,
        report: &mut ClassifyReport,
    ) {
        let Some(signature) = raw
            .topics
            .first()
            .and_then(|t| parse_word(t, "topics[0]").ok())
            .filter(|sig| self.catalog.contains(sig))
        else {
            trace!(log_index = index, error = %err, "unparseable log with unknown signature skipped");
            return;
        };

        let claimed = match parse_address(&raw.address, "address") {
            Ok(contract) => self
                .catalog
                .lookup(&signature)
                .iter()
                .any(|rule| rule.contracts.matches(&contract)),
            Err(_) => true,
        };
        if claimed {
            self.report_malformed(index, None, err.clone(), report);
        } else {
            debug!(
                log_index = index,
                %signature,
                contract = %raw.address,
                error = %err,
                "unparseable log from a contract no rule accepts"
            );
            report.diagnostics.push(Diagnostic::new(
                index,
                DiagnosticKind::RecognizedUnmatched { signature },
            ));
        }
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("rules", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

/// Per-call state shared by every log of one receipt.
struct TxContext<'a> {
    account: &'a Account,
    watched: Address,
    tx: &'a Transaction,
    siblings: Vec<LogEntry>,
}

impl TxClassifier for Classifier {
    fn classify_tx_report(
        &self,
        account: &Account,
        tx: &Transaction,
        receipt: &Receipt,
    ) -> ClassifyReport {
        let mut report = ClassifyReport::default();

        let Some(watched) = account.watched_address() else {
            trace!(account = %account.name, "account has no ethereum address");
            return report;
        };
        if tx.from_address != watched {
            trace!(tx = %tx.link(), "transaction not sent by account");
            return report;
        }

        let normalized = normalize_all(&receipt.logs);
        let ctx = TxContext {
            account,
            watched,
            tx,
            siblings: normalized.iter().filter_map(|r| r.as_ref().ok()).cloned().collect(),
        };

        for (index, (raw, entry)) in receipt.logs.iter().zip(&normalized).enumerate() {
            match entry {
                Ok(log) => self.classify_log(index, log, &ctx, &mut report),
                Err(err) => self.handle_unparseable(index, raw, err, &mut report),
            }
        }

        debug!(
            tx = %tx.link(),
            logs = receipt.logs.len(),
            events = report.events.len(),
            diagnostics = report.diagnostics.len(),
            "transaction classified"
        );
        report
    }
}
