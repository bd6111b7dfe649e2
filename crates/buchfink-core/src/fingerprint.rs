//! Event signature fingerprints.
//!
//! The fingerprint of an EVM event is the keccak256 hash of its canonical
//! signature string, e.g.:
//!   keccak256("Transfer(address,address,uint256)")
//!   → 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef
//!
//! For logs, topics[0] IS the fingerprint; it is never recomputed.

use alloy_primitives::{b256, B256};
use tiny_keccak::{Hasher, Keccak};

/// `Transfer(address,address,uint256)`
pub const TRANSFER: B256 =
    b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");

/// `Claimed(uint256,address,uint256)` (Merkle distributor airdrops)
pub const CLAIMED: B256 =
    b256!("4ec90e965519d92681267467f775ada5bd214aa92c0dc93d90a5e880ce9ed026");

/// Compute the keccak256 fingerprint of an event signature string.
/// Input: `"EventName(type1,type2,...)"`, the canonical ABI signature.
pub fn keccak256_signature(signature: &str) -> B256 {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(signature.as_bytes());
    hasher.finalize(&mut output);
    B256::from(output)
}

/// Whether `s` looks like a canonical signature (`Name(types)`) rather than
/// a hex fingerprint.
pub fn is_signature_text(s: &str) -> bool {
    let s = s.trim();
    s.ends_with(')') && s.contains('(') && !s.starts_with("0x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erc20_transfer_fingerprint() {
        assert_eq!(
            keccak256_signature("Transfer(address,address,uint256)"),
            TRANSFER
        );
    }

    #[test]
    fn merkle_claimed_fingerprint() {
        assert_eq!(keccak256_signature("Claimed(uint256,address,uint256)"), CLAIMED);
    }

    #[test]
    fn stake_end_fingerprint() {
        assert_eq!(
            keccak256_signature("StakeEnd(uint256,uint256,address,uint40)"),
            b256!("72d9c5a7ab13846e08d9c838f9e866a1bb4a66a2fd3ba3c9e7da3cf9e394dfd7")
        );
    }

    #[test]
    fn signature_text_detection() {
        assert!(is_signature_text("Minted(address,address,uint256)"));
        assert!(!is_signature_text(
            "0x9d228d69b5fdb8d273a2336f8fb8612d039631024ea9bf09c424a9503aa078f0"
        ));
    }
}
