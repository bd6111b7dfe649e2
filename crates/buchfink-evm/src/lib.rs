//! # buchfink-evm
//!
//! Classification of EVM transaction receipts into financial events.
//!
//! ## Pipeline
//! - `normalizer`: raw JSON-RPC logs → typed `LogEntry` values, once per receipt
//! - `extract`: one rule against one log (contract check, guards, amount, asset)
//! - `correlate`: companion `Transfer` lookup across the receipt
//! - `amount`: exact `U256` → `BigDecimal` scaling
//! - `synth`: rule + values → `OutputEvent`
//! - `classifier`: the `TxClassifier` implementation tying it together

pub mod amount;
pub mod classifier;
pub mod correlate;
pub mod extract;
pub mod normalizer;
pub mod synth;
pub mod word;

pub use amount::scale;
pub use classifier::Classifier;
pub use correlate::find_companion;
pub use normalizer::normalize;
pub use synth::synthesize;
pub use word::{slice_data, word_to_address, word_to_uint};
