//! # Webcash Testkit
//!
//! Testing utilities for webcash.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known inputs with expected outputs for cross-implementation verification
//! - **Generators**: Proptest strategies for amounts, roots and secrets
//! - **Fixtures**: Scripted server and prompt plus a ready-made wallet
//!
//! ## Golden Vectors
//!
//! ```rust
//! use webcash_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, actual) in verify_all_vectors() {
//!     assert!(matches, "{name}: {actual}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use webcash_testkit::generators::secret;
//!
//! proptest! {
//!     #[test]
//!     fn claim_code_roundtrips(s in secret()) {
//!         let code = s.to_claim_code().unwrap();
//!         prop_assert_eq!(webcash_core::Secret::parse(&code).unwrap().value, s);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use webcash_testkit::fixtures::WalletFixture;
//!
//! async fn example() {
//!     let fixture = WalletFixture::new("terms of service");
//!     fixture.wallet.ensure_terms_accepted().await.unwrap();
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{ScriptedPrompt, ScriptedServer, TestWallet, WalletFixture};
pub use vectors::{
    amount_vectors, derivation_vectors, public_vectors, verify_all_vectors, AmountOutcome,
    AmountVector, DerivationVector, PublicVector, COUNTING_ROOT,
};
