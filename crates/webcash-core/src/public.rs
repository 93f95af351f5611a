//! Public hashes: the server-visible commitment to a secret.
//!
//! Format: `e<amount>:public:<64 lowercase hex>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::amount::Amount;
use crate::crypto::Sha256Hash;
use crate::error::{Error, Result};
use crate::secret::{split_token, Secret};
use crate::types::Parsed;

const PUBLIC_TAG: &str = "public";

/// An amount and the SHA-256 of the secret serial that protects it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PublicHash {
    pub amount: Amount,
    pub hash: Sha256Hash,
}

impl PublicHash {
    pub const fn new(amount: Amount, hash: Sha256Hash) -> Self {
        Self { amount, hash }
    }

    /// Hash the secret's serial and copy its amount.
    ///
    /// An invalid secret has no meaningful commitment and is rejected.
    pub fn from_secret(secret: &Secret) -> Result<Self> {
        secret.validate()?;
        Ok(Self {
            amount: secret.amount,
            hash: Sha256Hash::hash(secret.serial()),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(Error::invalid("public hash amount must be positive"));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Parse `e<amount>:public:<hex>`.
    ///
    /// Uppercase hex digits are accepted but flagged as non-canonical.
    pub fn parse(text: &str) -> Result<Parsed<Self>> {
        let fields = split_token(text.as_bytes(), PUBLIC_TAG)?;
        let digits = fields.body;
        if digits.len() != 64 {
            return Err(Error::invalid(format!(
                "public hash must be 64 hex characters, found {}",
                digits.len()
            )));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| Error::invalid(e.to_string()))?;
        let uppercase = digits.iter().any(u8::is_ascii_uppercase);

        let mut parsed = fields
            .amount
            .map(|amount| Self::new(amount, Sha256Hash(bytes)));
        parsed.noncanonical |= uppercase;
        Ok(parsed)
    }
}

impl fmt::Display for PublicHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}:{PUBLIC_TAG}:{}", self.amount, self.hash)
    }
}

impl FromStr for PublicHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).map(Parsed::into_value)
    }
}

impl TryFrom<&Secret> for PublicHash {
    type Error = Error;

    fn try_from(secret: &Secret) -> Result<Self> {
        Self::from_secret(secret)
    }
}

impl Serialize for PublicHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
