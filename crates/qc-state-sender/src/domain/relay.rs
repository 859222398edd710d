//! # State Relay
//!
//! The record-and-notify state machine behind `syncState`.
//!
//! A call is split into [`StateRelay::prepare`], which validates and computes
//! the next record without touching state, and [`StateRelay::commit`], which
//! applies it. Callers that persist the counter elsewhere do so between the
//! two steps, so a failed write leaves the relay untouched.

use crate::domain::entities::{RelayConfig, SyncRecord, SyncRequest, DEFAULT_MAX_LENGTH};
use crate::domain::value_objects::{Address, U256};
use crate::errors::RelayError;

/// Counter plus an immutable payload bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateRelay {
    counter: U256,
    max_length: usize,
}

/// A validated record whose counter increment has not been applied yet.
#[derive(Debug)]
#[must_use = "a pending sync has no effect until committed"]
pub struct PendingSync {
    record: SyncRecord,
}

impl PendingSync {
    /// Id the record will carry once committed.
    pub fn id(&self) -> U256 {
        self.record.id
    }

    /// The record that will be emitted.
    pub fn record(&self) -> &SyncRecord {
        &self.record
    }
}

impl StateRelay {
    /// Fresh relay with counter 0 and the deployed `MAX_LENGTH`.
    #[must_use]
    pub fn initialize() -> Self {
        Self {
            counter: U256::zero(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Fresh relay with a custom bound.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration fails validation.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        Self::restore(config, U256::zero())
    }

    /// Relay resuming from a previously persisted counter.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration fails validation.
    pub fn restore(config: &RelayConfig, counter: U256) -> Result<Self, RelayError> {
        config.validate()?;
        Ok(Self {
            counter,
            max_length: config.max_length,
        })
    }

    /// Number of records emitted so far.
    #[must_use]
    pub fn counter(&self) -> U256 {
        self.counter
    }

    /// Maximum accepted payload length.
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Rejects payloads longer than `max_length`.
    ///
    /// # Errors
    ///
    /// `ExceedsMaxLength` when `data.len() > max_length`.
    pub fn check_length(&self, data: &[u8]) -> Result<(), RelayError> {
        if data.len() > self.max_length {
            return Err(RelayError::ExceedsMaxLength {
                length: data.len(),
                max: self.max_length,
            });
        }
        Ok(())
    }

    /// Validates a request and builds its record. Does not mutate.
    ///
    /// # Errors
    ///
    /// `ExceedsMaxLength` for oversized payloads, `CounterOverflow` when the
    /// counter is saturated.
    pub fn prepare(
        &self,
        sender: Address,
        request: SyncRequest,
    ) -> Result<PendingSync, RelayError> {
        self.check_length(request.data.as_slice())?;
        let id = self
            .counter
            .checked_add(U256::one())
            .ok_or(RelayError::CounterOverflow)?;

        Ok(PendingSync {
            record: SyncRecord {
                id,
                sender,
                receiver: request.receiver,
                data: request.data,
            },
        })
    }

    /// Applies a pending sync and hands back its record.
    pub fn commit(&mut self, pending: PendingSync) -> SyncRecord {
        debug_assert_eq!(
            Some(pending.record.id),
            self.counter.checked_add(U256::one()),
            "pending sync prepared against a different counter"
        );
        self.counter = pending.record.id;
        pending.record
    }

    /// `prepare` followed by `commit`.
    ///
    /// # Errors
    ///
    /// Same as [`StateRelay::prepare`]; on error the relay is unchanged.
    pub fn sync_state(
        &mut self,
        sender: Address,
        request: SyncRequest,
    ) -> Result<SyncRecord, RelayError> {
        let pending = self.prepare(sender, request)?;
        Ok(self.commit(pending))
    }
}

impl Default for StateRelay {
    fn default() -> Self {
        Self::initialize()
    }
}

// =============================================================================
// TESTS
// =============================================================================
