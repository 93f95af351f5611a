//! # Webcash Wallet
//!
//! The wallet context that sits on top of `webcash-core`. It owns a
//! derivation root, mints secrets on demand, and sequences the
//! terms-of-service handshake between three pluggable collaborators.
//!
//! ## Key Types
//!
//! - [`Wallet`] - Root key, per-chain depth cursors, terms flow
//! - [`Storage`] - Async trait for persisted wallet state
//! - [`Server`] - Async trait for the value-issuing server
//! - [`Prompt`] - Async trait for the interactive UI
//! - [`MemoryStorage`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use webcash_core::{Amount, ChainCode, DerivationRoot};
//! use webcash_wallet::{MemoryStorage, Prompt, Server, Wallet, WalletConfig};
//!
//! async fn example<V: Server, P: Prompt>(server: V, prompt: P) {
//!     let wallet = Wallet::new(
//!         DerivationRoot::generate(),
//!         MemoryStorage::new(),
//!         server,
//!         prompt,
//!         WalletConfig::default(),
//!     );
//!
//!     wallet.ensure_terms_accepted().await.unwrap();
//!     let secret = wallet
//!         .next_secret(ChainCode::Receive, Amount::from_raw(100_000_000))
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod error;
pub mod memory;
pub mod terms;
pub mod traits;
pub mod wallet;

pub use error::{Result, WalletError};
pub use memory::MemoryStorage;
pub use terms::{AcceptedTerms, TermsRecord};
pub use traits::{Prompt, Server, Storage};
pub use wallet::{Wallet, WalletConfig};
