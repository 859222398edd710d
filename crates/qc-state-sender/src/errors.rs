//! # Error Types
//!
//! All error types for the state sender.

use crate::domain::value_objects::U256;
use thiserror::Error;

/// Revert reason for an oversized payload.
pub const EXCEEDS_MAX_LENGTH: &str = "EXCEEDS_MAX_LENGTH";

/// Revert reason for a counter that cannot be incremented.
pub const COUNTER_OVERFLOW: &str = "COUNTER_OVERFLOW";

// =============================================================================
// RELAY ERRORS
// =============================================================================

/// Errors returned by `syncState` and relay construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Payload longer than the configured maximum.
    ///
    /// The display string is the stable revert reason callers match on.
    #[error("EXCEEDS_MAX_LENGTH")]
    ExceedsMaxLength {
        /// Length of the rejected payload.
        length: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Counter is already at `U256::MAX`.
    #[error("COUNTER_OVERFLOW")]
    CounterOverflow,

    /// Relay configuration rejected at construction.
    #[error("invalid relay config: {0}")]
    InvalidConfig(String),

    /// Counter store failure, passed through unmodified.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RelayError {
    /// Stable revert reason for contract-level failures.
    ///
    /// Infrastructure failures have no revert reason.
    #[must_use]
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::ExceedsMaxLength { .. } => Some(EXCEEDS_MAX_LENGTH),
            Self::CounterOverflow => Some(COUNTER_OVERFLOW),
            Self::InvalidConfig(_) | Self::Store(_) => None,
        }
    }

    /// Returns true if the caller can recover by changing its input.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ExceedsMaxLength { .. })
    }
}

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors from the counter store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backing store is unreachable.
    #[error("counter store unavailable")]
    Unavailable,

    /// Stored value could not be read back.
    #[error("counter store corrupted")]
    Corrupted,

    /// Write would move the counter backwards.
    #[error("counter regression: stored {stored}, attempted {attempted}")]
    Regression {
        /// Value currently stored.
        stored: U256,
        /// Lower value that was refused.
        attempted: U256,
    },

    /// Other store error.
    #[error("counter store error: {0}")]
    Other(String),
}

// =============================================================================
// ABI ERRORS
// =============================================================================

/// Errors from decoding calldata, revert data or logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// Calldata selector does not match any function.
    #[error("unknown selector: 0x{}", hex::encode(.0))]
    UnknownSelector([u8; 4]),

    /// Input shorter than its encoding requires.
    #[error("invalid length: expected at least {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Dynamic offset or length points outside the input.
    #[error("invalid offset: {0}")]
    InvalidOffset(U256),

    /// Address word has non-zero padding.
    #[error("invalid address encoding")]
    InvalidAddress,

    /// Log does not carry the `StateSynced` signature.
    #[error("not a StateSynced log")]
    UnexpectedLog,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceeds_max_length_display_is_stable() {
        let err = RelayError::ExceedsMaxLength {
            length: 2049,
            max: 2048,
        };
        assert_eq!(err.to_string(), EXCEEDS_MAX_LENGTH);
        assert_eq!(err.reason(), Some(EXCEEDS_MAX_LENGTH));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_store_error_passes_through() {
        let err: RelayError = StoreError::Unavailable.into();
        assert_eq!(err.to_string(), "counter store unavailable");
        assert_eq!(err.reason(), None);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_counter_overflow_reason() {
        assert_eq!(RelayError::CounterOverflow.reason(), Some(COUNTER_OVERFLOW));
        assert!(!RelayError::CounterOverflow.is_recoverable());
    }

    #[test]
    fn test_abi_error_display() {
        let err = AbiError::UnknownSelector([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(err.to_string(), "unknown selector: 0xdeadbeef");
    }
}
