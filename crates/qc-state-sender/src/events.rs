//! # Event Schema
//!
//! Serializable payloads crossing the state sender's boundary.
//! Every request/response pair shares a `correlation_id`.

use crate::domain::entities::{SyncRecord, SyncRequest};
use crate::domain::value_objects::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Topic names on the event bus.
pub mod topics {
    /// Inbound `syncState` requests.
    pub const SYNC_STATE_REQUEST: &str = "state_sender.sync_state_request";
    /// Outbound `StateSynced` notifications.
    pub const STATE_SYNCED: &str = "state_sender.state_synced";
}

// =============================================================================
// INBOUND
// =============================================================================

/// `syncState` request delivered by the host.
///
/// `caller` is the identity the host authenticated for this call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStateRequestPayload {
    /// Caller identity supplied by the host.
    pub caller: Address,
    /// Receiver argument.
    pub receiver: Address,
    /// Payload argument.
    pub data: Bytes,
}

impl SyncStateRequestPayload {
    /// Splits into caller and domain request.
    #[must_use]
    pub fn into_parts(self) -> (Address, SyncRequest) {
        (self.caller, SyncRequest::new(self.receiver, self.data))
    }
}

// =============================================================================
// OUTBOUND
// =============================================================================

/// `StateSynced(id, sender, receiver, data)` notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSyncedPayload {
    /// Correlation ID of the originating call.
    pub correlation_id: Uuid,
    /// Counter value assigned to this record.
    pub id: U256,
    /// Caller of `syncState`.
    pub sender: Address,
    /// Receiver argument.
    pub receiver: Address,
    /// Payload argument.
    pub data: Bytes,
}

impl StateSyncedPayload {
    /// Wraps a record for publication.
    #[must_use]
    pub fn new(correlation_id: Uuid, record: SyncRecord) -> Self {
        Self {
            correlation_id,
            id: record.id,
            sender: record.sender,
            receiver: record.receiver,
            data: record.data,
        }
    }

    /// The record carried by this payload.
    #[must_use]
    pub fn record(&self) -> SyncRecord {
        SyncRecord {
            id: self.id,
            sender: self.sender,
            receiver: self.receiver,
            data: self.data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_synced_payload_json() {
        let record = SyncRecord {
            id: U256::from(3),
            sender: Address::new([1; 20]),
            receiver: Address::new([2; 20]),
            data: Bytes::from_slice(&[0xAB]),
        };
        let payload = StateSyncedPayload::new(Uuid::new_v4(), record.clone());

        let json = serde_json::to_string(&payload).unwrap();
        let decoded: StateSyncedPayload = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, payload);
        assert_eq!(decoded.record(), record);
    }

    #[test]
    fn test_request_into_parts() {
        let payload = SyncStateRequestPayload {
            caller: Address::new([1; 20]),
            receiver: Address::new([2; 20]),
            data: Bytes::zeroed(4),
        };
        let (caller, request) = payload.into_parts();
        assert_eq!(caller, Address::new([1; 20]));
        assert_eq!(request.receiver, Address::new([2; 20]));
        assert_eq!(request.data.len(), 4);
    }
}
