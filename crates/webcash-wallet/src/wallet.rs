//! The Wallet: sequences storage, server and prompt around the core.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use zeroize::Zeroizing;

use webcash_core::{
    derive_batch, derive_secret, Amount, ChainCode, DerivationRoot, Secret, SerialHex,
    SERIAL_HEX_LEN,
};

use crate::error::{Result, WalletError};
use crate::terms::{now_secs, AcceptedTerms};
use crate::traits::{Prompt, Server, Storage};

/// Configuration for the Wallet.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Show the terms even when the current text was accepted before.
    pub always_prompt: bool,
    /// Upper bound on secrets minted by one [`Wallet::secrets`] call.
    pub max_batch: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            always_prompt: false,
            max_batch: 4096,
        }
    }
}

/// A webcash wallet bound to one derivation root.
pub struct Wallet<S: Storage, V: Server, P: Prompt> {
    root: DerivationRoot,
    storage: Arc<S>,
    server: Arc<V>,
    prompt: Arc<P>,
    config: WalletConfig,
    /// Next unused depth per chain.
    /// Keyed by `ChainCode::as_u64`, so `Receive` and `Other(0)` share a cursor.
    depths: Mutex<HashMap<u64, u64>>,
}

impl<S: Storage, V: Server, P: Prompt> Wallet<S, V, P> {
    pub fn new(
        root: DerivationRoot,
        storage: S,
        server: V,
        prompt: P,
        config: WalletConfig,
    ) -> Self {
        Self {
            root,
            storage: Arc::new(storage),
            server: Arc::new(server),
            prompt: Arc::new(prompt),
            config,
            depths: Mutex::new(HashMap::new()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn server(&self) -> &V {
        &self.server
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Terms of Service
    // ─────────────────────────────────────────────────────────────────────────

    /// Make sure the server's current terms have been accepted.
    ///
    /// Fetches the terms, returns early if storage already has them, and
    /// otherwise prompts and records the acceptance with the current time.
    pub async fn ensure_terms_accepted(&self) -> Result<AcceptedTerms> {
        let text = match self.server.current_terms().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "could not fetch terms of service");
                return Err(e);
            }
        };

        let previous = self.storage.terms_acceptance(&text).await?;
        if let (Some(timestamp), false) = (previous, self.config.always_prompt) {
            tracing::debug!(timestamp, "terms of service already accepted");
            return Ok(AcceptedTerms {
                terms: text,
                timestamp,
            });
        }

        if !self.prompt.show_terms(&text).await? {
            tracing::warn!("terms of service rejected");
            return Err(WalletError::TermsRejected);
        }

        let now = now_secs();
        self.storage.record_acceptance(&text, now).await?;
        let timestamp = previous.unwrap_or(now);
        tracing::info!(timestamp, "terms of service accepted");
        Ok(AcceptedTerms {
            terms: text,
            timestamp,
        })
    }

    /// Every accepted terms text, oldest first.
    pub async fn accepted_terms(&self) -> Result<Vec<AcceptedTerms>> {
        let records = self.storage.accepted_terms().await?;
        Ok(records.into_iter().map(AcceptedTerms::from).collect())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Secrets
    // ─────────────────────────────────────────────────────────────────────────

    /// The next unused depth on `chain`.
    pub async fn depth(&self, chain: ChainCode) -> u64 {
        self.depths.lock().await.get(&chain.as_u64()).copied().unwrap_or(0)
    }

    /// Move the cursor for `chain`, e.g. after recovering from storage.
    pub async fn set_depth(&self, chain: ChainCode, depth: u64) {
        self.depths.lock().await.insert(chain.as_u64(), depth);
    }

    /// Derive the next secret on `chain` and advance its depth.
    pub async fn next_secret(&self, chain: ChainCode, amount: Amount) -> Result<Secret> {
        check_amount(amount)?;
        let mut depths = self.depths.lock().await;
        let depth = depths.entry(chain.as_u64()).or_insert(0);
        let secret = derive_secret(&self.root, chain, *depth, amount)?;
        *depth = depth.wrapping_add(1);
        Ok(secret)
    }

    /// Derive `count` consecutive secrets on `chain` in one batch.
    pub async fn secrets(
        &self,
        chain: ChainCode,
        amount: Amount,
        count: usize,
    ) -> Result<Vec<Secret>> {
        check_amount(amount)?;
        if count > self.config.max_batch {
            return Err(webcash_core::Error::InvalidArgument(format!(
                "batch of {count} exceeds the configured maximum of {}",
                self.config.max_batch
            ))
            .into());
        }

        let mut depths = self.depths.lock().await;
        let depth = depths.entry(chain.as_u64()).or_insert(0);
        let mut serials: Zeroizing<Vec<SerialHex>> =
            Zeroizing::new(vec![[0u8; SERIAL_HEX_LEN]; count]);
        derive_batch(&self.root, chain, *depth, &mut serials);
        *depth = depth.wrapping_add(count as u64);

        Ok(serials
            .iter()
            .map(|serial| Secret::from_slice(amount, serial))
            .collect())
    }
}

fn check_amount(amount: Amount) -> Result<()> {
    if !amount.is_positive() {
        return Err(webcash_core::Error::InvalidArgument(format!(
            "cannot mint a secret worth {amount}"
        ))
        .into());
    }
    Ok(())
}
