//! Error types for the webcash core.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors produced by the codecs, value types and derivation engine.
///
/// Non-canonical but acceptable input is never an error; see
/// [`Parsed::noncanonical`](crate::Parsed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed text, missing value, or a violated constraint.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Decimal magnitude does not fit the fixed-point range.
    #[error("amount overflows the 64-bit fixed-point range")]
    Overflow,

    /// Allocation of an owned buffer failed.
    #[error("out of memory")]
    OutOfMemory,

    /// Caller-supplied output buffer is too small.
    #[error("insufficient capacity: {required} bytes required, {available} available")]
    InsufficientCapacity { required: usize, available: usize },
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::InsufficientCapacity {
            required: 21,
            available: 4,
        };
        assert_eq!(
            e.to_string(),
            "insufficient capacity: 21 bytes required, 4 available"
        );
        assert_eq!(
            Error::invalid("bad").to_string(),
            "invalid argument: bad"
        );
    }

    #[test]
    fn test_try_reserve_maps_to_oom() {
        let mut v: Vec<u8> = Vec::new();
        let err = v.try_reserve_exact(usize::MAX).unwrap_err();
        assert_eq!(Error::from(err), Error::OutOfMemory);
    }
}
