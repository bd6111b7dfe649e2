//! Builds `OutputEvent`s from a matched rule and its extracted values.

use alloy_primitives::{Address, U256};
use buchfink_core::{encoding::to_hex_prefixed, AssetRef, EventRule, OutputEvent, Transaction};

use crate::amount;

/// Values substituted into a rule's notes template.
#[derive(Debug, Clone, Copy)]
pub struct NoteVars<'a> {
    /// `{account}`: the account's name
    pub account: &'a str,
    /// `{contract}`: the emitting contract of the primary log
    pub contract: &'a Address,
}

/// Assemble the event for one rule match.
pub fn synthesize(
    rule: &EventRule,
    raw_amount: U256,
    asset: AssetRef,
    tx: &Transaction,
    vars: NoteVars<'_>,
) -> OutputEvent {
    OutputEvent {
        kind: rule.kind,
        subtype: rule.subtype,
        asset,
        amount: amount::scale(raw_amount, rule.decimals),
        timestamp: tx.timestamp,
        link: tx.link(),
        notes: render_notes(&rule.notes, tx, vars),
        rule: rule.name.clone(),
    }
}

/// Substitute `{account}`, `{contract}` and `{tx}` in `template`.
/// Unknown placeholders are left as written.
pub fn render_notes(template: &str, tx: &Transaction, vars: NoteVars<'_>) -> String {
    if !template.contains('{') {
        return template.to_string();
    }
    template
        .replace("{account}", vars.account)
        .replace("{contract}", &to_hex_prefixed(vars.contract))
        .replace("{tx}", &tx.link())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use bigdecimal::BigDecimal;
    use buchfink_core::{fingerprint, EventKind, EventSubtype};
    use std::str::FromStr;

    fn tx() -> Transaction {
        Transaction::new(B256::repeat_byte(0x12), Address::repeat_byte(0xaa), 1_600_000_000)
    }

    fn vars(contract: &Address) -> NoteVars<'_> {
        NoteVars {
            account: "hot-wallet",
            contract,
        }
    }

    #[test]
    fn event_fields() {
        let rule = EventRule::new("UniswapAirdrop", fingerprint::CLAIMED)
            .classify_as(EventKind::Receive, EventSubtype::Airdrop);
        let contract = Address::repeat_byte(0x09);
        let ev = synthesize(
            &rule,
            U256::from(400_000_000_000_000_000_000u128),
            AssetRef::new("eip155:1/erc20:uni", "UNI"),
            &tx(),
            vars(&contract),
        );
        assert_eq!(ev.kind, EventKind::Receive);
        assert_eq!(ev.subtype, EventSubtype::Airdrop);
        assert_eq!(ev.amount, BigDecimal::from_str("400").unwrap());
        assert_eq!(ev.link, "12".repeat(32));
        assert!(!ev.link.starts_with("0x"));
        assert_eq!(ev.timestamp, 1_600_000_000);
        assert_eq!(ev.rule, "UniswapAirdrop");
        assert_eq!(ev.display_amount(), "400 UNI");
        assert!(ev.notes.is_empty());
    }

    #[test]
    fn notes_template() {
        let contract = Address::repeat_byte(0x09);
        let notes = render_notes("{account} claimed from {contract} in {tx} {other}", &tx(), vars(&contract));
        assert_eq!(
            notes,
            format!(
                "hot-wallet claimed from 0x{} in {} {{other}}",
                "09".repeat(20),
                "12".repeat(32)
            )
        );
    }
}
