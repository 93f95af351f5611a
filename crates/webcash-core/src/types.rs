//! Shared result wrappers for the text codecs.

/// A successfully parsed value together with its canonicality flag.
///
/// `noncanonical` is set when the accepted text differs from what this crate
/// would itself emit for the same value (for example `"1.10"` instead of
/// `"1.1"`). Callers that persist user-supplied text may want to re-normalize
/// it when the flag is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    pub noncanonical: bool,
}

impl<T> Parsed<T> {
    pub(crate) fn new(value: T, noncanonical: bool) -> Self {
        Self {
            value,
            noncanonical,
        }
    }

    /// Whether the input was in canonical form.
    pub fn is_canonical(&self) -> bool {
        !self.noncanonical
    }

    /// Drop the flag and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Transform the value, keeping the flag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: f(self.value),
            noncanonical: self.noncanonical,
        }
    }
}
