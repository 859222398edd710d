//! # Driving Port (API - Inbound)
//!
//! The surface the hosting environment calls. The host supplies the caller
//! identity on every call.

use crate::domain::entities::{CallOutcome, SyncRecord};
use crate::domain::value_objects::{Address, Bytes, U256};
use crate::errors::RelayError;
use async_trait::async_trait;

/// Primary API of the state sender.
///
/// ## Usage
///
/// ```ignore
/// let record = api.sync_state(caller, receiver, data).await?;
/// assert_eq!(record.id, api.counter().await);
/// ```
#[async_trait]
pub trait StateSenderApi: Send + Sync {
    /// Validate `data`, bump the counter and emit one `StateSynced` record.
    ///
    /// # Errors
    ///
    /// * `ExceedsMaxLength` - `data` is longer than `max_length()`; nothing changes
    /// * `Store` - counter persistence failed; nothing changes
    async fn sync_state(
        &self,
        caller: Address,
        receiver: Address,
        data: Bytes,
    ) -> Result<SyncRecord, RelayError>;

    /// Current counter.
    async fn counter(&self) -> U256;

    /// Configured payload bound.
    fn max_length(&self) -> usize;

    /// Dispatch raw ABI calldata.
    ///
    /// Contract failures and malformed calldata come back as a reverted
    /// [`CallOutcome`]. Only infrastructure failures are `Err`.
    async fn call(&self, caller: Address, calldata: &[u8]) -> Result<CallOutcome, RelayError>;
}
