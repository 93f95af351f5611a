//! Fixed-point decimal amounts.
//!
//! An [`Amount`] is a signed 64-bit count of the smallest webcash unit, with
//! eight implied decimal places. The text form is
//! `-?[0-9]+(\.[0-9]{1,8})?` in canonical output; parsing additionally
//! accepts a few harmless variants (leading zeros, trailing fractional zeros,
//! a bare trailing `.`, `-0`) and reports them through
//! [`Parsed::noncanonical`].
//!
//! Nothing is ever clamped: a value outside the `i64` range after scaling is
//! [`Error::Overflow`].

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::types::Parsed;

/// A webcash value in units of 10^-8.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Raw units per whole webcash.
    pub const SCALE: i64 = 100_000_000;

    /// Number of fractional decimal digits.
    pub const DECIMALS: usize = 8;

    /// Longest possible canonical text, `"-92233720368.54775808"`.
    pub const MAX_DECIMAL_LEN: usize = 21;

    pub const ZERO: Self = Self(0);
    pub const MIN: Self = Self(i64::MIN);
    pub const MAX: Self = Self(i64::MAX);

    /// Wrap a raw fixed-point value.
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw fixed-point value.
    pub const fn raw(&self) -> i64 {
        self.0
    }

    /// Build from a count of whole webcash.
    pub fn from_units(units: i64) -> Result<Self> {
        units
            .checked_mul(Self::SCALE)
            .map(Self)
            .ok_or(Error::Overflow)
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.0.checked_add(rhs.0).map(Self).ok_or(Error::Overflow)
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self> {
        self.0.checked_sub(rhs.0).map(Self).ok_or(Error::Overflow)
    }

    /// Parse decimal text, reporting whether it was canonical.
    pub fn parse_decimal(text: &str) -> Result<Parsed<Self>> {
        parse_decimal_bytes(text.as_bytes())
    }

    /// Canonical decimal text.
    pub fn to_decimal_string(&self) -> String {
        self.to_string()
    }

    /// Write canonical decimal text into `buf` without allocating.
    ///
    /// Returns the number of bytes written. `buf` is left untouched when it
    /// is too small.
    pub fn encode_to_slice(&self, buf: &mut [u8]) -> Result<usize> {
        let mut scratch = StackText::default();
        // StackText holds MAX_DECIMAL_LEN bytes, enough for every i64.
        write!(scratch, "{self}").map_err(|_| Error::invalid("amount text exceeds bound"))?;
        let text = scratch.as_bytes();
        if buf.len() < text.len() {
            return Err(Error::InsufficientCapacity {
                required: text.len(),
                available: buf.len(),
            });
        }
        buf[..text.len()].copy_from_slice(text);
        Ok(text.len())
    }
}

/// Parse the amount grammar over raw bytes.
pub(crate) fn parse_decimal_bytes(s: &[u8]) -> Result<Parsed<Amount>> {
    let mut noncanonical = false;
    let negative = s.first() == Some(&b'-');
    let mut pos = usize::from(negative);

    let int_start = pos;
    let mut acc: u64 = 0;
    while let Some(&c) = s.get(pos).filter(|c| c.is_ascii_digit()) {
        acc = push_digit(acc, c)?;
        pos += 1;
    }
    match pos - int_start {
        0 => return Err(Error::invalid("amount requires an integer part")),
        1 => {}
        _ => noncanonical |= s[int_start] == b'0',
    }

    let mut frac_digits = 0;
    if s.get(pos) == Some(&b'.') {
        pos += 1;
        let mut last_zero = false;
        while let Some(&c) = s.get(pos).filter(|c| c.is_ascii_digit()) {
            if frac_digits < Amount::DECIMALS {
                acc = push_digit(acc, c)?;
                frac_digits += 1;
                last_zero = c == b'0';
            } else if c == b'0' {
                noncanonical = true;
            } else {
                return Err(Error::invalid("more than 8 significant fractional digits"));
            }
            pos += 1;
        }
        // "1." and "1.10" both print differently.
        noncanonical |= frac_digits == 0 || last_zero;
    }

    if pos != s.len() {
        return Err(Error::invalid(format!(
            "unexpected character {:?} at offset {pos}",
            char::from(s[pos])
        )));
    }

    for _ in frac_digits..Amount::DECIMALS {
        acc = acc.checked_mul(10).ok_or(Error::Overflow)?;
    }

    if negative && acc == 0 {
        noncanonical = true;
    }
    let signed = if negative {
        -i128::from(acc)
    } else {
        i128::from(acc)
    };
    let raw = i64::try_from(signed).map_err(|_| Error::Overflow)?;
    Ok(Parsed::new(Amount(raw), noncanonical))
}

fn push_digit(acc: u64, digit: u8) -> Result<u64> {
    acc.checked_mul(10)
        .and_then(|v| v.checked_add(u64::from(digit - b'0')))
        .ok_or(Error::Overflow)
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // unsigned_abs covers i64::MIN, whose negation does not fit i64.
        let magnitude = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        let (quot, mut rem) = (magnitude / scale, magnitude % scale);
        if self.0 < 0 {
            f.write_char('-')?;
        }
        write!(f, "{quot}")?;
        if rem != 0 {
            let mut width = Self::DECIMALS;
            while rem % 10 == 0 {
                rem /= 10;
                width -= 1;
            }
            write!(f, ".{rem:0width$}")?;
        }
        Ok(())
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_decimal(s).map(Parsed::into_value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Fixed-size formatting target used by [`Amount::encode_to_slice`].
#[derive(Default)]
struct StackText {
    buf: [u8; Amount::MAX_DECIMAL_LEN],
    len: usize,
}

impl StackText {
    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Write for StackText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        self.buf
            .get_mut(self.len..end)
            .ok_or(fmt::Error)?
            .copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}
