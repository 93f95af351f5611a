//! Webcash secrets and their claim-code encoding.
//!
//! A [`Secret`] is the bearer half of a webcash token: whoever knows the
//! serial can spend the amount. The server only ever sees its
//! [`PublicHash`](crate::PublicHash).
//!
//! Claim code format: `e<amount>:secret:<serial>`.

use std::fmt;
use std::str::FromStr;

use zeroize::{Zeroize, Zeroizing};

use crate::amount::{parse_decimal_bytes, Amount};
use crate::error::{Error, Result};
use crate::public::PublicHash;
use crate::types::Parsed;

/// Capacity reserved by [`Secret::new`], enough for a derived serial.
pub const DEFAULT_SERIAL_CAPACITY: usize = 64;

/// An amount protected by a secret serial.
///
/// The serial is arbitrary text without NUL bytes. It is held in a
/// zeroizing buffer, so the bytes are wiped when the secret is destroyed or
/// dropped.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret {
    pub amount: Amount,
    serial: Zeroizing<Vec<u8>>,
}

impl Secret {
    /// An empty secret with room for a derived serial.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SERIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            amount: Amount::ZERO,
            serial: Zeroizing::new(Vec::with_capacity(capacity)),
        }
    }

    /// Copy a borrowed serial.
    pub fn from_text(amount: Amount, serial: &str) -> Self {
        Self::from_slice(amount, serial.as_bytes())
    }

    /// Take ownership of a serial buffer.
    pub fn from_vec(amount: Amount, serial: Vec<u8>) -> Self {
        Self {
            amount,
            serial: Zeroizing::new(serial),
        }
    }

    /// Clone a borrowed serial buffer.
    pub fn from_slice(amount: Amount, serial: &[u8]) -> Self {
        Self::from_vec(amount, serial.to_vec())
    }

    /// The raw serial bytes.
    pub fn serial(&self) -> &[u8] {
        &self.serial
    }

    /// Replace the serial, wiping the old one.
    pub fn set_serial(&mut self, serial: &[u8]) {
        self.serial.zeroize();
        self.serial.extend_from_slice(serial);
    }

    /// Check the validity rules: positive amount, non-empty NUL-free serial.
    ///
    /// UTF-8 well-formedness of the serial is not checked.
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(Error::invalid("secret amount must be positive"));
        }
        validate_serial(&self.serial)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Wipe and release the serial and reset the amount.
    ///
    /// Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.amount = Amount::ZERO;
        self.serial.zeroize();
        *self.serial = Vec::new();
    }

    /// Encode as `e<amount>:secret:<serial>`.
    ///
    /// The serial must be valid and, to fit a Rust string, UTF-8.
    pub fn to_claim_code(&self) -> Result<Zeroizing<String>> {
        validate_serial(&self.serial)?;
        let serial = std::str::from_utf8(&self.serial)
            .map_err(|_| Error::invalid("secret serial is not UTF-8"))?;

        let mut amount = [0u8; Amount::MAX_DECIMAL_LEN];
        let amount_len = self.amount.encode_to_slice(&mut amount)?;
        let amount = std::str::from_utf8(&amount[..amount_len])
            .map_err(|_| Error::invalid("amount text is not UTF-8"))?;

        let mut code = Zeroizing::new(String::new());
        code.try_reserve_exact(1 + amount.len() + SECRET_TAG.len() + 2 + serial.len())?;
        code.push('e');
        code.push_str(amount);
        code.push(':');
        code.push_str(SECRET_TAG);
        code.push(':');
        code.push_str(serial);
        Ok(code)
    }

    /// Parse a claim code.
    pub fn parse(text: &str) -> Result<Parsed<Self>> {
        Self::parse_bytes(text.as_bytes())
    }

    /// Parse a claim code from raw bytes.
    ///
    /// The serial is taken verbatim; call [`Secret::validate`] to check it.
    pub fn parse_bytes(text: &[u8]) -> Result<Parsed<Self>> {
        let fields = split_token(text, SECRET_TAG)?;
        let mut serial = Vec::new();
        serial.try_reserve_exact(fields.body.len())?;
        serial.extend_from_slice(fields.body);
        Ok(fields.amount.map(|amount| Self::from_vec(amount, serial)))
    }

    /// The public hash committing to this secret.
    pub fn to_public(&self) -> Result<PublicHash> {
        PublicHash::from_secret(self)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("amount", &self.amount)
            .field("serial", &format_args!("<{} bytes>", self.serial.len()))
            .finish()
    }
}

impl FromStr for Secret {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).map(Parsed::into_value)
    }
}

pub(crate) const SECRET_TAG: &str = "secret";

fn validate_serial(serial: &[u8]) -> Result<()> {
    if serial.is_empty() {
        return Err(Error::invalid("secret serial is empty"));
    }
    if serial.contains(&0) {
        return Err(Error::invalid("secret serial contains a NUL byte"));
    }
    Ok(())
}

/// The three fields of an `e<amount>:<tag>:<body>` token.
pub(crate) struct TokenFields<'a> {
    pub amount: Parsed<Amount>,
    pub body: &'a [u8],
}

/// Split a token at its first two colons and check the middle tag.
///
/// A missing `e` prefix is accepted and flagged as non-canonical, OR'd with
/// the amount's own flag.
pub(crate) fn split_token<'a>(text: &'a [u8], tag: &str) -> Result<TokenFields<'a>> {
    let (text, missing_prefix) = match text.strip_prefix(b"e") {
        Some(rest) => (rest, false),
        None => (text, true),
    };
    let mut parts = text.splitn(3, |&b| b == b':');
    let (Some(amount), Some(middle), Some(body)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::invalid(format!("expected e<amount>:{tag}:<value>")));
    };
    if middle != tag.as_bytes() {
        return Err(Error::invalid(format!(
            "expected {tag:?} token, found {:?}",
            String::from_utf8_lossy(middle)
        )));
    }
    let mut amount = parse_decimal_bytes(amount)?;
    amount.noncanonical |= missing_prefix;
    Ok(TokenFields { amount, body })
}
