//! # Domain Invariants
//!
//! Invariants that must hold around every `syncState` call:
//! - INVARIANT-1: Counter after N successes equals counter before + N
//! - INVARIANT-2: A record's id is the post-increment counter
//! - INVARIANT-3: No record for a payload longer than `max_length`
//! - INVARIANT-4: A record reproduces its caller and arguments

use crate::domain::entities::{SyncRecord, SyncRequest};
use crate::domain::value_objects::{Address, U256};

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: Monotonic Counter
#[must_use]
pub fn check_counter_invariant(before: U256, after: U256, successes: u64) -> bool {
    before.checked_add(U256::from(successes)) == Some(after)
}

/// INVARIANT-2: Record Id
#[must_use]
pub fn check_record_id_invariant(record: &SyncRecord, counter_after: U256) -> bool {
    record.id == counter_after
}

/// INVARIANT-3: Payload Bound
#[must_use]
pub fn check_length_invariant(record: &SyncRecord, max_length: usize) -> bool {
    record.data.len() <= max_length
}

/// INVARIANT-4: Record Fidelity
#[must_use]
pub fn check_fidelity_invariant(
    record: &SyncRecord,
    caller: Address,
    request: &SyncRequest,
) -> bool {
    record.sender == caller && record.receiver == request.receiver && record.data == request.data
}

/// Violated invariant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Counter did not advance by exactly one.
    CounterMismatch,
    /// Record id differs from the counter.
    RecordIdMismatch,
    /// Oversized payload was emitted.
    LengthExceeded,
    /// Record does not match the call.
    FidelityMismatch,
}

/// Outcome of [`check_all_invariants`].
#[derive(Clone, Debug, Default)]
pub struct InvariantCheckResult {
    /// All violations found.
    pub violations: Vec<InvariantViolation>,
}

impl InvariantCheckResult {
    /// True if nothing was violated.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Checks one accepted call.
#[must_use]
pub fn check_all_invariants(
    counter_before: U256,
    counter_after: U256,
    max_length: usize,
    caller: Address,
    request: &SyncRequest,
    record: &SyncRecord,
) -> InvariantCheckResult {
    let mut result = InvariantCheckResult::default();

    if !check_counter_invariant(counter_before, counter_after, 1) {
        result.violations.push(InvariantViolation::CounterMismatch);
    }
    if !check_record_id_invariant(record, counter_after) {
        result.violations.push(InvariantViolation::RecordIdMismatch);
    }
    if !check_length_invariant(record, max_length) {
        result.violations.push(InvariantViolation::LengthExceeded);
    }
    if !check_fidelity_invariant(record, caller, request) {
        result.violations.push(InvariantViolation::FidelityMismatch);
    }

    result
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Bytes;

    fn request() -> SyncRequest {
        SyncRequest::new(Address::new([2; 20]), vec![0u8; 8])
    }

    fn record(id: u64) -> SyncRecord {
        SyncRecord {
            id: U256::from(id),
            sender: Address::new([1; 20]),
            receiver: Address::new([2; 20]),
            data: Bytes::zeroed(8),
        }
    }

    #[test]
    fn test_counter_invariant() {
        assert!(check_counter_invariant(U256::from(5), U256::from(8), 3));
        assert!(!check_counter_invariant(U256::from(5), U256::from(7), 3));
        assert!(!check_counter_invariant(U256::MAX, U256::MAX, 1));
    }

    #[test]
    fn test_all_invariants_hold() {
        let result = check_all_invariants(
            U256::zero(),
            U256::one(),
            8,
            Address::new([1; 20]),
            &request(),
            &record(1),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_violations_reported() {
        let result = check_all_invariants(
            U256::zero(),
            U256::one(),
            4,
            Address::new([9; 20]),
            &request(),
            &record(2),
        );
        assert_eq!(
            result.violations,
            vec![
                InvariantViolation::RecordIdMismatch,
                InvariantViolation::LengthExceeded,
                InvariantViolation::FidelityMismatch,
            ]
        );
    }
}
