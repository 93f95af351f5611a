//! Terms-of-service records.
//!
//! Storage keeps [`TermsRecord`]s; the wallet reports [`AcceptedTerms`].
//! The two are distinct types joined by `From`.

use serde::{Deserialize, Serialize};

/// A stored acceptance: the exact terms text and when it was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TermsRecord {
    pub text: String,
    /// Unix seconds.
    pub accepted_at: i64,
}

impl TermsRecord {
    pub fn new(text: impl Into<String>, accepted_at: i64) -> Self {
        Self {
            text: text.into(),
            accepted_at,
        }
    }
}

/// Terms the user has agreed to, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedTerms {
    pub terms: String,
    /// Unix seconds.
    pub timestamp: i64,
}

impl From<TermsRecord> for AcceptedTerms {
    fn from(record: TermsRecord) -> Self {
        Self {
            terms: record.text,
            timestamp: record.accepted_at,
        }
    }
}

/// Current time in Unix seconds.
pub(crate) fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_converts() {
        let record = TermsRecord::new("be nice", 1_700_000_000);
        let accepted = AcceptedTerms::from(record.clone());
        assert_eq!(accepted.terms, record.text);
        assert_eq!(accepted.timestamp, record.accepted_at);
    }

    #[test]
    fn test_accepted_serializes() {
        let accepted = AcceptedTerms {
            terms: "t".into(),
            timestamp: 5,
        };
        let json = serde_json::to_string(&accepted).unwrap();
        assert_eq!(json, r#"{"terms":"t","timestamp":5}"#);
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(now_secs() > 1_577_836_800);
    }
}
