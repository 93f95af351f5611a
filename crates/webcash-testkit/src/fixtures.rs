//! Test fixtures and helpers.
//!
//! Scripted collaborators for exercising the wallet without a network or a
//! human at the keyboard.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use webcash_core::DerivationRoot;
use webcash_wallet::{MemoryStorage, Prompt, Result, Server, Wallet, WalletConfig, WalletError};

use crate::vectors::COUNTING_ROOT;

/// A server that serves fixed terms, or fails when it has none.
#[derive(Debug, Default)]
pub struct ScriptedServer {
    terms: Mutex<Option<String>>,
}

impl ScriptedServer {
    pub fn new(terms: impl Into<String>) -> Self {
        Self {
            terms: Mutex::new(Some(terms.into())),
        }
    }

    /// A server that is never reachable.
    pub fn offline() -> Self {
        Self::default()
    }

    /// Publish new terms.
    pub fn set_terms(&self, terms: impl Into<String>) {
        if let Ok(mut current) = self.terms.lock() {
            *current = Some(terms.into());
        }
    }
}

#[async_trait]
impl Server for ScriptedServer {
    async fn current_terms(&self) -> Result<String> {
        let terms = self
            .terms
            .lock()
            .map_err(|_| WalletError::Server("scripted server poisoned".into()))?;
        terms
            .clone()
            .ok_or_else(|| WalletError::Server("server offline".into()))
    }
}

/// A prompt that always gives the same answer and counts how often it ran.
#[derive(Debug)]
pub struct ScriptedPrompt {
    accept: bool,
    shown: AtomicUsize,
}

impl ScriptedPrompt {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            shown: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: false,
            shown: AtomicUsize::new(0),
        }
    }

    /// How many times the terms were shown.
    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn show_terms(&self, _text: &str) -> Result<bool> {
        self.shown.fetch_add(1, Ordering::SeqCst);
        Ok(self.accept)
    }
}

/// The wallet type every fixture builds.
pub type TestWallet = Wallet<MemoryStorage, ScriptedServer, ScriptedPrompt>;

/// A wallet over in-memory storage with scripted collaborators.
pub struct WalletFixture {
    pub wallet: TestWallet,
}

impl WalletFixture {
    /// Counting root, accepting prompt, the given terms.
    pub fn new(terms: &str) -> Self {
        Self::build(
            DerivationRoot::from_bytes(COUNTING_ROOT),
            ScriptedServer::new(terms),
            ScriptedPrompt::accepting(),
        )
    }

    /// Counting root, rejecting prompt.
    pub fn rejecting(terms: &str) -> Self {
        Self::build(
            DerivationRoot::from_bytes(COUNTING_ROOT),
            ScriptedServer::new(terms),
            ScriptedPrompt::rejecting(),
        )
    }

    /// Random root, accepting prompt, offline server.
    pub fn offline() -> Self {
        Self::build(
            DerivationRoot::generate(),
            ScriptedServer::offline(),
            ScriptedPrompt::accepting(),
        )
    }

    pub fn build(root: DerivationRoot, server: ScriptedServer, prompt: ScriptedPrompt) -> Self {
        Self {
            wallet: Wallet::new(
                root,
                MemoryStorage::new(),
                server,
                prompt,
                WalletConfig::default(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webcash_core::{Amount, ChainCode};
    use webcash_wallet::Storage;

    use crate::vectors::derivation_vectors;

    #[tokio::test]
    async fn test_fixture_accepts_terms() {
        let fixture = WalletFixture::new("terms v1");
        let accepted = fixture.wallet.ensure_terms_accepted().await.unwrap();
        assert_eq!(accepted.terms, "terms v1");

        // A second call finds the acceptance in storage.
        let again = fixture.wallet.ensure_terms_accepted().await.unwrap();
        assert_eq!(again, accepted);
        assert!(fixture.wallet.storage().any_terms_accepted().await.unwrap());
    }

    #[tokio::test]
    async fn test_fixture_rejects_terms() {
        let fixture = WalletFixture::rejecting("terms v1");
        let err = fixture.wallet.ensure_terms_accepted().await.unwrap_err();
        assert!(matches!(err, WalletError::TermsRejected));
    }

    #[tokio::test]
    async fn test_fixture_offline() {
        let fixture = WalletFixture::offline();
        let err = fixture.wallet.ensure_terms_accepted().await.unwrap_err();
        assert!(matches!(err, WalletError::Server(_)));
    }

    #[tokio::test]
    async fn test_fixture_mints_golden_serials() {
        let fixture = WalletFixture::new("terms v1");
        let amount = Amount::from_raw(1);
        for vector in derivation_vectors()
            .iter()
            .filter(|v| v.root == COUNTING_ROOT && v.chaincode == 3)
        {
            fixture.wallet.set_depth(ChainCode::Mining, vector.depth).await;
            let secret = fixture
                .wallet
                .next_secret(ChainCode::Mining, amount)
                .await
                .unwrap();
            assert_eq!(secret.serial(), vector.serial.as_bytes(), "{}", vector.name);
        }
    }

    #[tokio::test]
    async fn test_new_terms_prompt_again() {
        let fixture = WalletFixture::new("v1");
        fixture.wallet.ensure_terms_accepted().await.unwrap();
        fixture.wallet.ensure_terms_accepted().await.unwrap();
        assert_eq!(fixture.wallet.prompt().shown(), 1);

        fixture.wallet.server().set_terms("v2");
        let accepted = fixture.wallet.ensure_terms_accepted().await.unwrap();
        assert_eq!(accepted.terms, "v2");
        assert_eq!(fixture.wallet.prompt().shown(), 2);

        let all = fixture.wallet.accepted_terms().await.unwrap();
        let texts: Vec<_> = all.iter().map(|t| t.terms.as_str()).collect();
        assert_eq!(texts, ["v1", "v2"]);
    }
}
