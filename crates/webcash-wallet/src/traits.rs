//! Collaborator traits: the wallet's view of storage, server and UI.
//!
//! Opening and closing are the implementor's constructor and `Drop`.

use async_trait::async_trait;

use crate::error::Result;
use crate::terms::TermsRecord;

/// Persistent wallet state.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Whether any terms have ever been accepted.
    async fn any_terms_accepted(&self) -> Result<bool>;

    /// Every accepted terms text, oldest first.
    async fn accepted_terms(&self) -> Result<Vec<TermsRecord>>;

    /// When `text` was accepted, if it ever was.
    async fn terms_acceptance(&self, text: &str) -> Result<Option<i64>>;

    /// Record that `text` was accepted at `timestamp` (Unix seconds).
    ///
    /// Recording the same text again keeps the earlier timestamp.
    async fn record_acceptance(&self, text: &str, timestamp: i64) -> Result<()>;
}

/// The value-issuing server.
#[async_trait]
pub trait Server: Send + Sync {
    /// The terms of service currently in force.
    async fn current_terms(&self) -> Result<String>;
}

/// Interactive prompt shown to the wallet owner.
#[async_trait]
pub trait Prompt: Send + Sync {
    /// Show `text` and return whether the user accepted it.
    async fn show_terms(&self, text: &str) -> Result<bool>;
}
