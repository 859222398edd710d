//! # Event Sink Adapter
//!
//! Broadcasts `StateSynced` notifications to in-process observers.
//!
//! Uses `tokio::sync::broadcast`: every subscriber sees every record
//! published after it subscribed. A subscriber that falls more than
//! `capacity` records behind gets `RecvError::Lagged` and skips ahead.

use crate::events::StateSyncedPayload;
use crate::ports::outbound::EventSink;
use crate::DEFAULT_EVENT_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Broadcast channel of `StateSynced` notifications.
pub struct BroadcastEventSink {
    sender: broadcast::Sender<StateSyncedPayload>,
    events_published: AtomicU64,
    capacity: usize,
}

impl BroadcastEventSink {
    /// Sink with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Sink buffering up to `capacity` records per subscriber.
    ///
    /// # Panics
    ///
    /// If `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Receive every record published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateSyncedPayload> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Per-subscriber buffer size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for BroadcastEventSink {
    async fn publish(&self, event: StateSyncedPayload) -> usize {
        let id = event.id;
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(%id, receivers, "StateSynced published");
                receivers
            }
            Err(_) => {
                debug!(%id, "StateSynced published with no subscribers");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
