//! # Driven Ports (SPI - Outbound)
//!
//! What the state sender needs from its host:
//! - Persistence of the counter across calls
//! - Delivery of `StateSynced` notifications to observers

use crate::domain::value_objects::U256;
use crate::errors::StoreError;
use crate::events::StateSyncedPayload;
use async_trait::async_trait;

// =============================================================================
// COUNTER STORE
// =============================================================================

/// Persists the relay counter between calls.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Last persisted counter (zero if never written).
    async fn load_counter(&self) -> Result<U256, StoreError>;

    /// Persist a new counter value.
    ///
    /// Implementations must reject values below the stored one.
    async fn store_counter(&self, value: U256) -> Result<(), StoreError>;
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Fan-out channel for `StateSynced` notifications.
///
/// Publishing never fails: a record with no observers is simply dropped.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publish a notification. Returns the number of observers reached.
    async fn publish(&self, event: StateSyncedPayload) -> usize;

    /// Total notifications published.
    fn events_published(&self) -> u64;
}
