//! # Counter Store Adapter
//!
//! In-memory counter persistence for single-process hosts and tests.

use crate::domain::value_objects::U256;
use crate::errors::StoreError;
use crate::ports::outbound::CounterStore;
use async_trait::async_trait;
use parking_lot::RwLock;

/// Counter held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    value: RwLock<U256>,
}

impl InMemoryCounterStore {
    /// Store starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store resuming from `value`.
    #[must_use]
    pub fn with_value(value: U256) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn load_counter(&self) -> Result<U256, StoreError> {
        Ok(*self.value.read())
    }

    async fn store_counter(&self, value: U256) -> Result<(), StoreError> {
        let mut stored = self.value.write();
        if value < *stored {
            return Err(StoreError::Regression {
                stored: *stored,
                attempted: value,
            });
        }
        *stored = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_at_zero() {
        let store = InMemoryCounterStore::new();
        assert_eq!(store.load_counter().await.unwrap(), U256::zero());
    }

    #[tokio::test]
    async fn test_store_and_load() {
        let store = InMemoryCounterStore::with_value(U256::from(4));
        store.store_counter(U256::from(5)).await.unwrap();
        assert_eq!(store.load_counter().await.unwrap(), U256::from(5));
    }

    #[tokio::test]
    async fn test_regression_rejected() {
        let store = InMemoryCounterStore::with_value(U256::from(5));
        let err = store.store_counter(U256::from(4)).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::Regression {
                stored: U256::from(5),
                attempted: U256::from(4),
            }
        );
        assert_eq!(store.load_counter().await.unwrap(), U256::from(5));
    }
}
