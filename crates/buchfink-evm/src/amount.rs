//! Raw integer → decimal amount scaling.

use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use buchfink_core::event::strip_trailing_zeros;
use num_bigint::{BigInt, Sign};

/// `raw / 10^decimals`, exact. The result carries no trailing zeros.
pub fn scale(raw: U256, decimals: u8) -> BigDecimal {
    let digits = BigInt::from_bytes_be(Sign::Plus, &raw.to_be_bytes::<32>());
    strip_trailing_zeros(&BigDecimal::new(digits, i64::from(decimals)))
}
