//! # State Sender Service
//!
//! Wires the relay to its counter store and event sink.
//!
//! ## Execution Model
//!
//! - Calls are serialized through one async mutex; each runs to completion
//!   (accepted or rejected) before the next starts
//! - The new counter is persisted before the record is committed, so a store
//!   failure leaves both the relay and the store untouched and emits nothing
//! - Records are published while the mutex is held, so observers see ids in
//!   increasing order

use crate::adapters::{BroadcastEventSink, InMemoryCounterStore};
use crate::domain::abi::{self, RelayCall};
use crate::domain::entities::{CallOutcome, RelayConfig, SyncRecord, SyncRequest};
#[cfg(debug_assertions)]
use crate::domain::invariants::check_all_invariants;
use crate::domain::relay::StateRelay;
use crate::domain::value_objects::{Address, Bytes, U256};
use crate::errors::RelayError;
use crate::events::{StateSyncedPayload, SyncStateRequestPayload};
use crate::ports::inbound::StateSenderApi;
use crate::ports::outbound::{CounterStore, EventSink};
use crate::DEFAULT_EVENT_CAPACITY;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Environment override for `relay.max_length`.
pub const ENV_MAX_LENGTH: &str = "QC_STATE_SENDER_MAX_LENGTH";
/// Environment override for `event_channel_capacity`.
pub const ENV_EVENT_CAPACITY: &str = "QC_STATE_SENDER_EVENT_CAPACITY";

/// State Sender Service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Relay configuration.
    pub relay: RelayConfig,
    /// Address stamped on emitted logs.
    pub contract_address: Address,
    /// Per-subscriber notification buffer.
    pub event_channel_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            relay: RelayConfig::default(),
            contract_address: Address::ZERO,
            event_channel_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ServiceConfig {
    /// Defaults with `QC_STATE_SENDER_*` environment overrides applied.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if an override does not parse or the result is invalid.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_MAX_LENGTH) {
            config.relay.max_length = raw
                .parse()
                .map_err(|e| RelayError::InvalidConfig(format!("{ENV_MAX_LENGTH}={raw}: {e}")))?;
        }
        if let Some(raw) = lookup(ENV_EVENT_CAPACITY) {
            config.event_channel_capacity = raw.parse().map_err(|e| {
                RelayError::InvalidConfig(format!("{ENV_EVENT_CAPACITY}={raw}: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a zero `max_length` or channel capacity.
    pub fn validate(&self) -> Result<(), RelayError> {
        self.relay.validate()?;
        if self.event_channel_capacity == 0 {
            return Err(RelayError::InvalidConfig(
                "event_channel_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Statistics for the State Sender Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// `syncState` calls handled, accepted or not.
    pub calls_processed: u64,
    /// Records emitted.
    pub records_emitted: u64,
    /// Calls rejected by the relay (oversized payload, overflow).
    pub rejected_requests: u64,
    /// Calls aborted by a counter store failure.
    pub store_failures: u64,
    /// Calldata that could not be decoded.
    pub malformed_calls: u64,
}

/// The state sender service.
pub struct StateSenderService<S: CounterStore, E: EventSink> {
    config: ServiceConfig,
    relay: Mutex<StateRelay>,
    store: Arc<S>,
    sink: Arc<E>,
    stats: RwLock<ServiceStats>,
}

impl<S: CounterStore, E: EventSink> StateSenderService<S, E> {
    /// Create a service, resuming from the counter in `store`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a bad configuration, `Store` if the counter
    /// cannot be loaded.
    pub async fn new(
        store: Arc<S>,
        sink: Arc<E>,
        config: ServiceConfig,
    ) -> Result<Self, RelayError> {
        config.validate()?;
        let counter = store.load_counter().await?;
        let relay = StateRelay::restore(&config.relay, counter)?;

        info!(
            %counter,
            max_length = config.relay.max_length,
            contract = %config.contract_address,
            "State sender initialized"
        );

        Ok(Self {
            config,
            relay: Mutex::new(relay),
            store,
            sink,
            stats: RwLock::new(ServiceStats::default()),
        })
    }

    /// Current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The event sink records are published to.
    pub fn sink(&self) -> &Arc<E> {
        &self.sink
    }

    /// Handle a `syncState` request delivered over the event bus.
    #[instrument(skip(self, payload), fields(correlation_id = %correlation_id))]
    pub async fn handle_sync_state_request(
        &self,
        correlation_id: Uuid,
        payload: SyncStateRequestPayload,
    ) -> Result<StateSyncedPayload, RelayError> {
        let (caller, request) = payload.into_parts();
        let record = self.execute_sync(correlation_id, caller, request).await?;
        Ok(StateSyncedPayload::new(correlation_id, record))
    }

    async fn execute_sync(
        &self,
        correlation_id: Uuid,
        caller: Address,
        request: SyncRequest,
    ) -> Result<SyncRecord, RelayError> {
        let mut relay = self.relay.lock().await;
        self.stats.write().calls_processed += 1;

        let length = request.data.len();
        #[cfg(debug_assertions)]
        let expected = request.clone();

        let pending = match relay.prepare(caller, request) {
            Ok(pending) => pending,
            Err(err) => {
                warn!(
                    error = %err,
                    length,
                    max_length = relay.max_length(),
                    "syncState rejected"
                );
                self.stats.write().rejected_requests += 1;
                return Err(err);
            }
        };

        #[cfg(debug_assertions)]
        {
            let check = check_all_invariants(
                relay.counter(),
                pending.id(),
                relay.max_length(),
                caller,
                &expected,
                pending.record(),
            );
            debug_assert!(check.is_ok(), "invariant violation: {:?}", check.violations);
        }

        if let Err(err) = self.store.store_counter(pending.id()).await {
            error!(error = %err, "Failed to persist counter, call aborted");
            self.stats.write().store_failures += 1;
            return Err(err.into());
        }

        let record = relay.commit(pending);

        let observers = self
            .sink
            .publish(StateSyncedPayload::new(correlation_id, record.clone()))
            .await;
        self.stats.write().records_emitted += 1;

        info!(
            id = %record.id,
            sender = %record.sender,
            receiver = %record.receiver,
            length = record.data.len(),
            observers,
            "StateSynced"
        );
        Ok(record)
    }

    fn revert_outcome(err: &RelayError) -> Option<CallOutcome> {
        err.reason().map(|reason| {
            CallOutcome::revert(abi::encode_revert(reason), Some(reason.to_string()))
        })
    }
}

impl<S: CounterStore> StateSenderService<S, BroadcastEventSink> {
    /// Create a service publishing to a broadcast sink sized by
    /// `config.event_channel_capacity`.
    ///
    /// # Errors
    ///
    /// Same as [`StateSenderService::new`].
    pub async fn with_broadcast_sink(
        store: Arc<S>,
        config: ServiceConfig,
    ) -> Result<Self, RelayError> {
        config.validate()?;
        let sink = BroadcastEventSink::with_capacity(config.event_channel_capacity);
        Self::new(store, Arc::new(sink), config).await
    }
}

/// Service backed by in-memory adapters, starting from counter 0.
///
/// # Errors
///
/// Never with the default configuration.
pub async fn create_test_service(
) -> Result<StateSenderService<InMemoryCounterStore, BroadcastEventSink>, RelayError> {
    StateSenderService::with_broadcast_sink(
        Arc::new(InMemoryCounterStore::new()),
        ServiceConfig::default(),
    )
    .await
}

// =============================================================================
// StateSenderApi Implementation
// =============================================================================

#[async_trait]
impl<S: CounterStore, E: EventSink> StateSenderApi for StateSenderService<S, E> {
    #[instrument(skip(self, data), fields(length = data.len()))]
    async fn sync_state(
        &self,
        caller: Address,
        receiver: Address,
        data: Bytes,
    ) -> Result<SyncRecord, RelayError> {
        self.execute_sync(Uuid::new_v4(), caller, SyncRequest::new(receiver, data))
            .await
    }

    async fn counter(&self) -> U256 {
        self.relay.lock().await.counter()
    }

    fn max_length(&self) -> usize {
        self.config.relay.max_length
    }

    #[instrument(skip(self, calldata), fields(calldata_len = calldata.len()))]
    async fn call(&self, caller: Address, calldata: &[u8]) -> Result<CallOutcome, RelayError> {
        let call = match abi::decode_call(calldata) {
            Ok(call) => call,
            Err(err) => {
                debug!(error = %err, "Malformed calldata");
                self.stats.write().malformed_calls += 1;
                return Ok(CallOutcome::revert(Bytes::new(), None));
            }
        };

        match call {
            RelayCall::SyncState { receiver, data } => {
                match self
                    .execute_sync(Uuid::new_v4(), caller, SyncRequest::new(receiver, data))
                    .await
                {
                    Ok(record) => Ok(CallOutcome::success(
                        Bytes::new(),
                        vec![abi::encode_state_synced_log(
                            self.config.contract_address,
                            &record,
                        )],
                    )),
                    Err(err) => Self::revert_outcome(&err).ok_or(err),
                }
            }
            RelayCall::Counter => Ok(CallOutcome::success(
                abi::encode_uint256(self.counter().await),
                Vec::new(),
            )),
            RelayCall::MaxLength => Ok(CallOutcome::success(
                abi::encode_uint256(U256::from(self.max_length())),
                Vec::new(),
            )),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
