//! # Webcash Core
//!
//! Pure primitives for webcash: amounts, secrets, public hashes, wallet
//! derivation and proof-of-work hashing.
//!
//! This crate contains no I/O, no storage, no networking. Everything here is
//! synchronous, bounded computation that may be called from any thread.
//!
//! ## Key Types
//!
//! - [`Amount`] - Fixed-point value, 8 decimal places in an `i64`
//! - [`Secret`] - A bearer token: amount plus secret serial
//! - [`PublicHash`] - The server-visible SHA-256 commitment to a secret
//! - [`DerivationRoot`] / [`DerivationContext`] - Deterministic serial generation
//! - [`MiningJob`] - Nonce search over a fixed preimage prefix
//!
//! ## Text Forms
//!
//! | Value | Canonical text |
//! |---|---|
//! | amount | `-?[0-9]+(\.[0-9]{1,8})?` |
//! | secret | `e<amount>:secret:<serial>` |
//! | public hash | `e<amount>:public:<64 lowercase hex>` |
//!
//! Parsers accept a handful of non-canonical spellings and report them via
//! [`Parsed::noncanonical`] instead of failing.
//!
//! ```rust
//! use webcash_core::{Amount, PublicHash, Secret};
//!
//! let secret = Secret::from_text(Amount::from_raw(1_234_567_800), "abc");
//! assert_eq!(secret.to_claim_code().unwrap().as_str(), "e12.345678:secret:abc");
//!
//! let public = PublicHash::from_secret(&secret).unwrap();
//! assert!(public.to_string().starts_with("e12.345678:public:ba7816bf"));
//! ```

pub mod amount;
pub mod crypto;
pub mod derive;
pub mod error;
pub mod mining;
pub mod public;
pub mod secret;
pub mod types;

pub use amount::Amount;
pub use crypto::{Sha256Hash, Sha256Midstate, LANES};
pub use derive::{
    derive_batch, derive_one, derive_secret, ChainCode, DerivationContext, DerivationRoot,
    SerialHex, SERIAL_HEX_LEN, WALLET_TAG,
};
pub use error::{Error, Result};
pub use mining::{hash_8way, MiningJob, Solution, MINING_FINAL, MINING_NONCES};
pub use public::PublicHash;
pub use secret::Secret;
pub use types::Parsed;

/// Build the process-wide derivation state now rather than on first use.
///
/// Safe to call any number of times, from any thread.
pub fn init() -> &'static DerivationContext {
    DerivationContext::global()
}
