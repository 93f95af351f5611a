//! In-memory implementation of the Storage trait.
//!
//! Primarily for testing. Same semantics as a persistent backend, no
//! persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Result, WalletError};
use crate::terms::TermsRecord;
use crate::traits::Storage;

/// In-memory wallet storage. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<MemoryStorageInner>,
}

#[derive(Default)]
struct MemoryStorageInner {
    /// Accepted terms in acceptance order.
    terms: Vec<TermsRecord>,
    /// Text -> index into `terms`.
    index: HashMap<String, usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds the given acceptances.
    pub fn with_terms(records: impl IntoIterator<Item = TermsRecord>) -> Self {
        let mut inner = MemoryStorageInner::default();
        for record in records {
            inner.insert(record);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }
}

impl MemoryStorageInner {
    fn insert(&mut self, record: TermsRecord) {
        if self.index.contains_key(&record.text) {
            return;
        }
        self.index.insert(record.text.clone(), self.terms.len());
        self.terms.push(record);
    }
}

fn poisoned<T>(_: T) -> WalletError {
    WalletError::Storage("memory storage lock poisoned".into())
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn any_terms_accepted(&self) -> Result<bool> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(!inner.terms.is_empty())
    }

    async fn accepted_terms(&self) -> Result<Vec<TermsRecord>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.terms.clone())
    }

    async fn terms_acceptance(&self, text: &str) -> Result<Option<i64>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.index.get(text).map(|&i| inner.terms[i].accepted_at))
    }

    async fn record_acceptance(&self, text: &str, timestamp: i64) -> Result<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.insert(TermsRecord::new(text, timestamp));
        Ok(())
    }
}
