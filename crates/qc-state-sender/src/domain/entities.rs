//! # Domain Entities
//!
//! Requests, records, logs and configuration for the state sender.

use crate::domain::value_objects::{Address, Bytes, Hash, U256};
use crate::errors::RelayError;
use serde::{Deserialize, Serialize};

/// Maximum payload length of the deployed contract (`MAX_LENGTH`).
pub const DEFAULT_MAX_LENGTH: usize = 2048;

// =============================================================================
// RELAY CONFIGURATION
// =============================================================================

/// Relay configuration, fixed at initialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Maximum accepted payload length in bytes.
    pub max_length: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl RelayConfig {
    /// Checks the configuration can back a relay.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `max_length` is zero.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.max_length == 0 {
            return Err(RelayError::InvalidConfig(
                "max_length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// SYNC REQUEST / RECORD
// =============================================================================

/// A caller-submitted `(receiver, data)` pair. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncRequest {
    /// Account the state is addressed to.
    pub receiver: Address,
    /// Opaque payload.
    pub data: Bytes,
}

impl SyncRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(receiver: Address, data: impl Into<Bytes>) -> Self {
        Self {
            receiver,
            data: data.into(),
        }
    }
}

/// The `StateSynced` notification for one accepted request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    /// Counter value after the increment.
    pub id: U256,
    /// Caller of `syncState`.
    pub sender: Address,
    /// Receiver from the request.
    pub receiver: Address,
    /// Payload from the request.
    pub data: Bytes,
}

// =============================================================================
// LOG
// =============================================================================

/// EVM log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    /// Contract address that emitted the log.
    pub address: Address,
    /// Indexed topics (up to 4).
    pub topics: Vec<Hash>,
    /// Non-indexed data.
    pub data: Bytes,
}

// =============================================================================
// CALL OUTCOME
// =============================================================================

/// Result of dispatching ABI calldata.
///
/// A reverted call carries no logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOutcome {
    /// Whether the call succeeded.
    pub success: bool,
    /// Return data on success, revert data on failure.
    pub output: Bytes,
    /// Logs emitted by the call.
    pub logs: Vec<Log>,
    /// Decoded revert reason, if any.
    pub revert_reason: Option<String>,
}

impl CallOutcome {
    /// Successful call.
    #[must_use]
    pub fn success(output: Bytes, logs: Vec<Log>) -> Self {
        Self {
            success: true,
            output,
            logs,
            revert_reason: None,
        }
    }

    /// Reverted call.
    #[must_use]
    pub fn revert(output: Bytes, revert_reason: Option<String>) -> Self {
        Self {
            success: false,
            output,
            logs: Vec::new(),
            revert_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.max_length, 2048);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_length_rejected() {
        let config = RelayConfig { max_length: 0 };
        assert!(matches!(
            config.validate(),
            Err(RelayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_revert_outcome_has_no_logs() {
        let outcome = CallOutcome::revert(Bytes::new(), None);
        assert!(!outcome.success);
        assert!(outcome.logs.is_empty());
    }
}
