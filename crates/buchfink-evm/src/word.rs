//! Fixed-width word helpers.
//!
//! EVM log data is a concatenation of 32-byte words and every topic is one
//! word. Integers are big-endian and unsigned; an address occupies the low
//! 20 bytes of its word. Nothing here allocates or panics on short input.

use alloy_primitives::{Address, B256, U256};
use buchfink_core::DecodeError;

/// Size of one ABI word in bytes.
pub const WORD_SIZE: usize = 32;

/// Big-endian unsigned interpretation of a 32-byte word.
pub fn word_to_uint(word: &B256) -> U256 {
    U256::from_be_bytes(word.0)
}

/// The low 20 bytes of a word.
pub fn word_to_address(word: &B256) -> Address {
    Address::from_slice(&word[12..])
}

/// Left-pad an address to a full word, the way indexed address topics
/// are encoded.
pub fn address_to_word(address: &Address) -> B256 {
    address.into_word()
}

/// `data[start..end]`, or `data[start..]` when `end` is `None`.
pub fn slice_data(data: &[u8], start: usize, end: Option<usize>) -> Result<&[u8], DecodeError> {
    let end = end.unwrap_or(data.len());
    if start > end || end > data.len() {
        return Err(DecodeError::OutOfBounds {
            start,
            end,
            len: data.len(),
        });
    }
    Ok(&data[start..end])
}

/// The `index`-th 32-byte word of `data`.
pub fn data_word(data: &[u8], index: usize) -> Result<B256, DecodeError> {
    let start = index.checked_mul(WORD_SIZE).ok_or(DecodeError::OutOfBounds {
        start: usize::MAX,
        end: usize::MAX,
        len: data.len(),
    })?;
    let end = start.checked_add(WORD_SIZE).ok_or(DecodeError::OutOfBounds {
        start,
        end: usize::MAX,
        len: data.len(),
    })?;
    slice_data(data, start, Some(end)).map(B256::from_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    #[test]
    fn uint_from_word() {
        let word = b256!("0000000000000000000000000000000000000000000000004563918244f40000");
        assert_eq!(word_to_uint(&word), U256::from(5_000_000_000_000_000_000u128));
    }

    #[test]
    fn uint_from_max_word() {
        assert_eq!(word_to_uint(&B256::repeat_byte(0xff)), U256::MAX);
    }

    #[test]
    fn address_from_padded_topic() {
        let topic = b256!("000000000000000000000000d8da6bf26964af9d7eed9e03e53415d37aa96045");
        assert_eq!(
            word_to_address(&topic),
            address!("d8da6bf26964af9d7eed9e03e53415d37aa96045")
        );
        assert_eq!(address_to_word(&word_to_address(&topic)), topic);
    }

    #[test]
    fn slice_within_bounds() {
        let data = [1u8, 2, 3, 4];
        assert_eq!(slice_data(&data, 1, Some(3)).unwrap(), &[2, 3]);
        assert_eq!(slice_data(&data, 2, None).unwrap(), &[3, 4]);
        assert!(slice_data(&data, 4, None).unwrap().is_empty());
    }

    #[test]
    fn slice_out_of_bounds_is_error() {
        let data = [0u8; 4];
        assert_eq!(
            slice_data(&data, 2, Some(8)),
            Err(DecodeError::OutOfBounds {
                start: 2,
                end: 8,
                len: 4
            })
        );
        assert!(slice_data(&data, 3, Some(2)).is_err());
    }

    #[test]
    fn data_word_indexing() {
        let mut data = vec![0u8; 64];
        data[63] = 7;
        assert_eq!(word_to_uint(&data_word(&data, 1).unwrap()), U256::from(7));
        assert!(data_word(&data, 2).is_err());
        assert!(data_word(&data, usize::MAX).is_err());
    }
}
