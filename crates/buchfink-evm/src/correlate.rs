//! Companion log lookup.
//!
//! Some events only announce that a payout happened; the amount travels in
//! a separate ERC-20 `Transfer` emitted by the same transaction. The lookup
//! scans the whole receipt, before and after the primary log.

use alloy_primitives::{Address, B256};
use buchfink_core::{CompanionSpec, CompanionToken, LogEntry};

use crate::word::word_to_address;

/// First log in `siblings` with topic0 `signature` for which `predicate`
/// holds. `siblings` is the full normalized receipt, primary included.
pub fn find_companion<'a, F>(
    primary: &LogEntry,
    siblings: &'a [LogEntry],
    signature: &B256,
    predicate: F,
) -> Option<&'a LogEntry>
where
    F: Fn(&LogEntry, &LogEntry) -> bool,
{
    siblings
        .iter()
        .find(|log| log.signature() == Some(signature) && predicate(primary, log))
}

/// Whether `candidate` comes from `spec.token` and names
/// `account` in its recipient topic.
pub fn matches_spec(spec: &CompanionSpec, account: &Address, candidate: &LogEntry) -> bool {
    if let CompanionToken::Address(token) = &spec.token {
        if candidate.address != *token {
            return false;
        }
    }
    candidate
        .topics
        .get(spec.recipient_topic)
        .is_some_and(|topic| word_to_address(topic) == *account)
}

/// Find the companion described by `spec` for the watched `account`.
pub fn find_for_account<'a>(
    primary: &LogEntry,
    siblings: &'a [LogEntry],
    spec: &CompanionSpec,
    account: &Address,
) -> Option<&'a LogEntry> {
    find_companion(primary, siblings, &spec.signature, |_, candidate| {
        matches_spec(spec, account, candidate)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::address_to_word;
    use alloy_primitives::{Bytes, U256};
    use buchfink_core::fingerprint::TRANSFER;

    const ACCOUNT: Address = Address::repeat_byte(0xaa);
    const TOKEN: Address = Address::repeat_byte(0x11);

    fn transfer(token: Address, to: Address, amount: u64) -> LogEntry {
        LogEntry::new(
            token,
            vec![TRANSFER, address_to_word(&Address::ZERO), address_to_word(&to)],
            Bytes::from(U256::from(amount).to_be_bytes::<32>().to_vec()),
        )
    }

    fn primary() -> LogEntry {
        LogEntry::new(Address::repeat_byte(0x22), vec![B256::repeat_byte(0x01)], Bytes::new())
    }

    #[test]
    fn finds_companion_before_primary() {
        let logs = vec![transfer(TOKEN, ACCOUNT, 7), primary()];
        let spec = CompanionSpec::erc20_transfer(CompanionToken::Address(TOKEN));
        let found = find_for_account(&logs[1], &logs, &spec, &ACCOUNT).unwrap();
        assert_eq!(found, &logs[0]);
    }

    #[test]
    fn skips_transfer_to_someone_else() {
        let other = Address::repeat_byte(0xbb);
        let logs = vec![primary(), transfer(TOKEN, other, 1), transfer(TOKEN, ACCOUNT, 2)];
        let spec = CompanionSpec::erc20_transfer(CompanionToken::Any);
        let found = find_for_account(&logs[0], &logs, &spec, &ACCOUNT).unwrap();
        assert_eq!(found, &logs[2]);
    }

    #[test]
    fn wrong_token_is_no_companion() {
        let logs = vec![primary(), transfer(Address::repeat_byte(0x33), ACCOUNT, 1)];
        let spec = CompanionSpec::erc20_transfer(CompanionToken::Address(TOKEN));
        assert!(find_for_account(&logs[0], &logs, &spec, &ACCOUNT).is_none());
    }

    #[test]
    fn first_match_wins() {
        let logs = vec![primary(), transfer(TOKEN, ACCOUNT, 1), transfer(TOKEN, ACCOUNT, 2)];
        let found = find_companion(&logs[0], &logs, &TRANSFER, |_, _| true).unwrap();
        assert_eq!(found, &logs[1]);
    }
}
