//! # QC State Sender - Counter-Stamped State Notifications
//!
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Accepts `syncState(receiver, data)` calls, rejects payloads longer than a
//! fixed `MAX_LENGTH`, and for every accepted call increments a counter and
//! emits one `StateSynced(id, sender, receiver, data)` record carrying the new
//! counter value. Downstream bridges consume these records in id order.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Counter advances by exactly the number of accepted calls | `domain/relay.rs` - `StateRelay::prepare()` / `commit()` |
//! | INVARIANT-2 | Record id equals the post-increment counter | `domain/invariants.rs` - `check_record_id_invariant()` |
//! | INVARIANT-3 | No record for `data.len() > MAX_LENGTH` | `domain/relay.rs` - `StateRelay::check_length()` |
//! | INVARIANT-4 | Counter write and record emission are all-or-nothing | `service.rs` - `execute_sync()` |
//!
//! ## Limits
//!
//! | Limit | Value | Purpose |
//! |-------|-------|---------|
//! | `MAX_LENGTH` | 2048 bytes | Bound on `data` per record |
//! | `event_channel_capacity` | 1024 | Per-subscriber notification buffer |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `CounterStore` | Persist the counter across calls |
//! | `EventSink` | Deliver `StateSynced` records to observers |
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_state_sender::prelude::*;
//!
//! let service = create_test_service().await?;
//! let mut events = service.sink().subscribe();
//!
//! let record = service.sync_state(caller, receiver, Bytes::zeroed(2048)).await?;
//! assert_eq!(events.recv().await?.id, record.id);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::abi::{
        decode_call, decode_revert, decode_state_synced_log, decode_uint256,
        encode_counter_call, encode_max_length_call, encode_revert, encode_state_synced_log,
        encode_sync_state_call, encode_uint256, state_synced_topic, RelayCall,
    };
    pub use crate::domain::entities::{
        CallOutcome, Log, RelayConfig, SyncRecord, SyncRequest, DEFAULT_MAX_LENGTH,
    };
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };
    pub use crate::domain::relay::{PendingSync, StateRelay};
    pub use crate::domain::value_objects::{Address, Bytes, Hash, U256};

    // Ports
    pub use crate::ports::inbound::StateSenderApi;
    pub use crate::ports::outbound::{CounterStore, EventSink};

    // Events
    pub use crate::events::{topics, StateSyncedPayload, SyncStateRequestPayload};

    // Errors
    pub use crate::errors::{AbiError, RelayError, StoreError, EXCEEDS_MAX_LENGTH};

    // Adapters
    pub use crate::adapters::{BroadcastEventSink, InMemoryCounterStore};

    // Service
    pub use crate::service::{
        create_test_service, ServiceConfig, ServiceStats, StateSenderService,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "State Sender";

/// Default per-subscriber buffer of the notification channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_exports() {
        use prelude::*;
        let _ = ServiceConfig::default();
        let _ = Address::ZERO;
        assert_eq!(DEFAULT_MAX_LENGTH, 2048);
    }
}
