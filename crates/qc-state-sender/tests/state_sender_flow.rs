//! # State Sender Flow Tests
//!
//! End-to-end runs against the in-memory adapters, driven both through the
//! typed API and through ABI calldata as a host would.

use qc_state_sender::prelude::*;
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;

// =============================================================================
// TEST HELPERS
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn account(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    Address::new(bytes)
}

async fn service() -> StateSenderService<InMemoryCounterStore, BroadcastEventSink> {
    init_tracing();
    create_test_service().await.expect("default config is valid")
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[tokio::test]
async fn test_initial_counter_is_zero() {
    let service = service().await;
    assert_eq!(service.counter().await, U256::zero());
}

#[tokio::test]
async fn test_rejects_more_than_max_length() {
    let service = service().await;
    let mut events = service.sink().subscribe();
    let max = service.max_length();

    let err = service
        .sync_state(account(0), account(2), Bytes::zeroed(max + 1))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "EXCEEDS_MAX_LENGTH");
    assert_eq!(service.counter().await, U256::zero());
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_emits_state_synced_for_max_length() {
    let service = service().await;
    let mut events = service.sink().subscribe();
    let max_data = Bytes::zeroed(service.max_length());

    let record = service
        .sync_state(account(0), account(1), max_data.clone())
        .await
        .unwrap();

    let event = events.recv().await.unwrap();
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    assert_eq!(event.id, U256::one());
    assert_eq!(event.sender, account(0));
    assert_eq!(event.receiver, account(1));
    assert_eq!(event.data, max_data);
    assert_eq!(event.record(), record);
    assert_eq!(service.counter().await, event.id);
}

#[tokio::test]
async fn test_counter_counts_successes_only() {
    let service = service().await;
    let max = service.max_length();
    let initial = service.counter().await;

    let ok = || Bytes::zeroed(max);
    let too_long = || Bytes::zeroed(max + 1);

    service.sync_state(account(0), account(1), ok()).await.unwrap();
    service.sync_state(account(0), account(1), ok()).await.unwrap();
    assert!(service.sync_state(account(0), account(1), too_long()).await.is_err());
    service.sync_state(account(0), account(1), ok()).await.unwrap();
    assert!(service.sync_state(account(0), account(1), too_long()).await.is_err());

    assert_eq!(service.counter().await, initial + U256::from(3));

    let stats = service.stats();
    assert_eq!(stats.calls_processed, 5);
    assert_eq!(stats.records_emitted, 3);
    assert_eq!(stats.rejected_requests, 2);
}

#[tokio::test]
async fn test_records_reflect_each_caller() {
    let service = service().await;
    let mut events = service.sink().subscribe();

    for n in 1..=3u8 {
        service
            .sync_state(account(n), account(10 + n), Bytes::from_slice(&[n; 3]))
            .await
            .unwrap();
    }

    for n in 1..=3u8 {
        let event = events.recv().await.unwrap();
        assert_eq!(event.id, U256::from(n));
        assert_eq!(event.sender, account(n));
        assert_eq!(event.receiver, account(10 + n));
        assert_eq!(event.data, Bytes::from_slice(&[n; 3]));
    }
}

#[tokio::test]
async fn test_abi_session() {
    let service = service().await;
    let caller = account(0);

    let max = service
        .call(caller, encode_max_length_call().as_slice())
        .await
        .unwrap();
    let max_length = decode_uint256(max.output.as_slice()).unwrap().low_u64() as usize;
    assert_eq!(max_length, DEFAULT_MAX_LENGTH);

    let accepted = service
        .call(
            caller,
            encode_sync_state_call(account(2), &vec![0u8; max_length]).as_slice(),
        )
        .await
        .unwrap();
    assert!(accepted.success);
    assert_eq!(accepted.logs.len(), 1);
    assert_eq!(accepted.logs[0].topics[0], state_synced_topic());
    let record = decode_state_synced_log(&accepted.logs[0]).unwrap();
    assert_eq!(record.id, U256::one());
    assert_eq!(record.sender, caller);

    let rejected = service
        .call(
            caller,
            encode_sync_state_call(account(2), &vec![0u8; max_length + 1]).as_slice(),
        )
        .await
        .unwrap();
    assert!(!rejected.success);
    assert!(rejected.logs.is_empty());
    assert_eq!(
        decode_revert(rejected.output.as_slice()).as_deref(),
        Some(EXCEEDS_MAX_LENGTH)
    );

    let counter = service
        .call(caller, encode_counter_call().as_slice())
        .await
        .unwrap();
    assert_eq!(decode_uint256(counter.output.as_slice()).unwrap(), U256::one());
}

#[tokio::test]
async fn test_session_resumes_from_store() {
    init_tracing();
    let store = Arc::new(InMemoryCounterStore::new());

    let first = StateSenderService::new(
        store.clone(),
        Arc::new(BroadcastEventSink::new()),
        ServiceConfig::default(),
    )
    .await
    .unwrap();
    first
        .sync_state(account(0), account(1), Bytes::new())
        .await
        .unwrap();
    first
        .sync_state(account(0), account(1), Bytes::new())
        .await
        .unwrap();
    drop(first);

    let second = StateSenderService::new(
        store,
        Arc::new(BroadcastEventSink::new()),
        ServiceConfig::default(),
    )
    .await
    .unwrap();
    assert_eq!(second.counter().await, U256::from(2));

    let record = second
        .sync_state(account(0), account(1), Bytes::new())
        .await
        .unwrap();
    assert_eq!(record.id, U256::from(3));
}

#[tokio::test]
async fn test_custom_max_length() {
    init_tracing();
    let config = ServiceConfig {
        relay: RelayConfig { max_length: 32 },
        ..ServiceConfig::default()
    };
    let service = StateSenderService::new(
        Arc::new(InMemoryCounterStore::new()),
        Arc::new(BroadcastEventSink::new()),
        config,
    )
    .await
    .unwrap();

    assert_eq!(service.max_length(), 32);
    assert!(service
        .sync_state(account(0), account(1), Bytes::zeroed(32))
        .await
        .is_ok());
    assert!(matches!(
        service
            .sync_state(account(0), account(1), Bytes::zeroed(33))
            .await,
        Err(RelayError::ExceedsMaxLength { length: 33, max: 32 })
    ));
}
