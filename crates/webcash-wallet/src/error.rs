//! Error types for the wallet context.

use thiserror::Error;

/// Errors that can occur while the wallet sequences its collaborators.
#[derive(Debug, Error)]
pub enum WalletError {
    /// A codec or derivation failure from the core.
    #[error("core error: {0}")]
    Core(#[from] webcash_core::Error),

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// The issuing server could not be reached or answered badly.
    #[error("server error: {0}")]
    Server(String),

    /// The user-interface prompt failed.
    #[error("prompt error: {0}")]
    Prompt(String),

    /// The user declined the current terms of service.
    #[error("terms of service were rejected")]
    TermsRejected,
}

/// Result type for wallet operations.
pub type Result<T> = std::result::Result<T, WalletError>;
