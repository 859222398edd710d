//! # Domain Services
//!
//! Hashing helpers used by the ABI codec.

use crate::domain::value_objects::Hash;
use sha3::{Digest, Keccak256};

/// Computes keccak256 hash of data.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    Hash(Keccak256::digest(data).into())
}

/// First four bytes of keccak256 of a function or error signature.
#[must_use]
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash.0[0], hash.0[1], hash.0[2], hash.0[3]]
}
