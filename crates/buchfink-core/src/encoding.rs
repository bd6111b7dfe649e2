//! Hex parsing helpers shared by the log normalizer, account parsing, and
//! rule files.
//!
//! Input hex may carry a `0x`/`0X` prefix and any letter case. Output is
//! always lower-case with a `0x` prefix.

use alloy_primitives::{Address, B256};

use crate::error::DecodeError;

const ADDRESS_LEN: usize = 20;

/// Decode a hex string into bytes. `field` names the input in errors.
pub fn decode_hex(input: &str, field: &str) -> Result<Vec<u8>, DecodeError> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(body).map_err(|e| DecodeError::InvalidHex {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a 20-byte address from hex. Checksums are not enforced.
pub fn parse_address(input: &str, field: &str) -> Result<Address, DecodeError> {
    let bytes = decode_hex(input, field)?;
    if bytes.len() != ADDRESS_LEN {
        return Err(DecodeError::BadLength {
            field: field.to_string(),
            expected: ADDRESS_LEN,
            got: bytes.len(),
        });
    }
    Ok(Address::from_slice(&bytes))
}

/// Parse a 32-byte word (topic, hash, fingerprint) from hex.
pub fn parse_word(input: &str, field: &str) -> Result<B256, DecodeError> {
    let bytes = decode_hex(input, field)?;
    if bytes.len() != 32 {
        return Err(DecodeError::BadLength {
            field: field.to_string(),
            expected: 32,
            got: bytes.len(),
        });
    }
    Ok(B256::from_slice(&bytes))
}

/// Lower-case `0x`-prefixed hex of arbitrary bytes.
pub fn to_hex_prefixed(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_parse_ignores_case_and_prefix() {
        let lower = parse_address("0x090d4613473dee047c3f2706764f49e0821d256e", "a").unwrap();
        let upper = parse_address("0X090D4613473DEE047C3F2706764F49E0821D256E", "a").unwrap();
        let bare = parse_address("090D4613473dEE047c3f2706764f49E0821D256e", "a").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, bare);
    }

    #[test]
    fn address_wrong_length_rejected() {
        let err = parse_address("0x1234", "contract").unwrap_err();
        assert_eq!(
            err,
            DecodeError::BadLength {
                field: "contract".into(),
                expected: 20,
                got: 2
            }
        );
    }

    #[test]
    fn word_rejects_odd_hex() {
        assert!(matches!(
            parse_word("0xabc", "topic0"),
            Err(DecodeError::InvalidHex { .. })
        ));
    }

    #[test]
    fn hex_output_is_lowercase_prefixed() {
        assert_eq!(to_hex_prefixed([0xAB, 0xCD]), "0xabcd");
        assert_eq!(to_hex_prefixed(Vec::<u8>::new()), "0x");
    }
}
