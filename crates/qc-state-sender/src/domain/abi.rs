//! # ABI Codec
//!
//! Solidity ABI encoding for the state sender's external surface:
//!
//! | Item | Signature |
//! |------|-----------|
//! | function | `syncState(address,bytes)` |
//! | function | `counter()` |
//! | function | `MAX_LENGTH()` |
//! | event | `StateSynced(uint256 indexed id, address indexed sender, address indexed receiver, bytes data)` |
//! | revert | `Error(string)` |
//!
//! Only the shapes above are supported; this is not a general ABI library.

use crate::domain::entities::{Log, SyncRecord};
use crate::domain::services::{function_selector, keccak256};
use crate::domain::value_objects::{Address, Bytes, Hash, U256, WORD_SIZE};
use crate::errors::AbiError;

/// `syncState(address,bytes)`.
pub const SYNC_STATE_SIGNATURE: &str = "syncState(address,bytes)";
/// `counter()`.
pub const COUNTER_SIGNATURE: &str = "counter()";
/// `MAX_LENGTH()`.
pub const MAX_LENGTH_SIGNATURE: &str = "MAX_LENGTH()";
/// Standard revert payload.
pub const ERROR_SIGNATURE: &str = "Error(string)";
/// Event emitted per accepted request.
pub const STATE_SYNCED_SIGNATURE: &str = "StateSynced(uint256,address,address,bytes)";

/// Decoded calldata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayCall {
    /// `syncState(receiver, data)`.
    SyncState {
        /// Receiver argument.
        receiver: Address,
        /// Payload argument.
        data: Bytes,
    },
    /// `counter()`.
    Counter,
    /// `MAX_LENGTH()`.
    MaxLength,
}

// =============================================================================
// WORD HELPERS
// =============================================================================

fn read_word(input: &[u8], pos: usize) -> Result<[u8; WORD_SIZE], AbiError> {
    let end = pos
        .checked_add(WORD_SIZE)
        .ok_or_else(|| AbiError::InvalidOffset(U256::from(pos)))?;
    let slice = input.get(pos..end).ok_or(AbiError::InvalidLength {
        expected: end,
        actual: input.len(),
    })?;
    let mut word = [0u8; WORD_SIZE];
    word.copy_from_slice(slice);
    Ok(word)
}

fn word_to_usize(word: &[u8; WORD_SIZE]) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(word);
    if value.bits() > 64 {
        return Err(AbiError::InvalidOffset(value));
    }
    usize::try_from(value.low_u64()).map_err(|_| AbiError::InvalidOffset(value))
}

fn uint_word(value: U256) -> [u8; WORD_SIZE] {
    let mut word = [0u8; WORD_SIZE];
    value.to_big_endian(&mut word);
    word
}

/// Length word followed by the data, zero-padded to a word boundary.
fn encode_bytes_tail(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(&uint_word(U256::from(data.len())));
    out.extend_from_slice(data);
    let padded = data.len().div_ceil(WORD_SIZE) * WORD_SIZE;
    out.resize(out.len() + (padded - data.len()), 0);
}

/// Reads a `bytes` value whose length word sits at `offset` within `args`.
fn decode_bytes(args: &[u8], offset: usize) -> Result<Bytes, AbiError> {
    let len = word_to_usize(&read_word(args, offset)?)?;
    let start = offset + WORD_SIZE;
    let end = start
        .checked_add(len)
        .ok_or_else(|| AbiError::InvalidOffset(U256::from(len)))?;
    args.get(start..end)
        .map(Bytes::from_slice)
        .ok_or(AbiError::InvalidLength {
            expected: end,
            actual: args.len(),
        })
}

// =============================================================================
// CALLS
// =============================================================================

/// Calldata for `syncState(receiver, data)`.
#[must_use]
pub fn encode_sync_state_call(receiver: Address, data: &[u8]) -> Bytes {
    let padded = data.len().div_ceil(WORD_SIZE) * WORD_SIZE;
    let mut out = Vec::with_capacity(4 + 3 * WORD_SIZE + padded);
    out.extend_from_slice(&function_selector(SYNC_STATE_SIGNATURE));
    out.extend_from_slice(&receiver.to_word());
    out.extend_from_slice(&uint_word(U256::from(2 * WORD_SIZE)));
    encode_bytes_tail(&mut out, data);
    Bytes(out)
}

/// Calldata for `counter()`.
#[must_use]
pub fn encode_counter_call() -> Bytes {
    Bytes::from_slice(&function_selector(COUNTER_SIGNATURE))
}

/// Calldata for `MAX_LENGTH()`.
#[must_use]
pub fn encode_max_length_call() -> Bytes {
    Bytes::from_slice(&function_selector(MAX_LENGTH_SIGNATURE))
}

/// Decodes calldata into a [`RelayCall`].
///
/// # Errors
///
/// `UnknownSelector` for any other function, `InvalidLength`,
/// `InvalidOffset` or `InvalidAddress` for malformed arguments.
pub fn decode_call(calldata: &[u8]) -> Result<RelayCall, AbiError> {
    if calldata.len() < 4 {
        return Err(AbiError::InvalidLength {
            expected: 4,
            actual: calldata.len(),
        });
    }
    let selector = [calldata[0], calldata[1], calldata[2], calldata[3]];
    let args = &calldata[4..];

    if selector == function_selector(SYNC_STATE_SIGNATURE) {
        let receiver =
            Address::from_word(&read_word(args, 0)?).ok_or(AbiError::InvalidAddress)?;
        let offset = word_to_usize(&read_word(args, WORD_SIZE)?)?;
        let data = decode_bytes(args, offset)?;
        Ok(RelayCall::SyncState { receiver, data })
    } else if selector == function_selector(COUNTER_SIGNATURE) {
        Ok(RelayCall::Counter)
    } else if selector == function_selector(MAX_LENGTH_SIGNATURE) {
        Ok(RelayCall::MaxLength)
    } else {
        Err(AbiError::UnknownSelector(selector))
    }
}

/// Return data for a `uint256` accessor.
#[must_use]
pub fn encode_uint256(value: U256) -> Bytes {
    Bytes(uint_word(value).to_vec())
}

/// Decodes `uint256` return data.
///
/// # Errors
///
/// `InvalidLength` if the output is shorter than one word.
pub fn decode_uint256(output: &[u8]) -> Result<U256, AbiError> {
    Ok(U256::from_big_endian(&read_word(output, 0)?))
}

// =============================================================================
// REVERTS
// =============================================================================

/// `Error(string)` revert payload.
#[must_use]
pub fn encode_revert(reason: &str) -> Bytes {
    let mut out = Vec::with_capacity(4 + 3 * WORD_SIZE);
    out.extend_from_slice(&function_selector(ERROR_SIGNATURE));
    out.extend_from_slice(&uint_word(U256::from(WORD_SIZE)));
    encode_bytes_tail(&mut out, reason.as_bytes());
    Bytes(out)
}

/// Reason string from an `Error(string)` payload, if it is one.
#[must_use]
pub fn decode_revert(data: &[u8]) -> Option<String> {
    if data.len() < 4 || data[..4] != function_selector(ERROR_SIGNATURE) {
        return None;
    }
    let args = &data[4..];
    let offset = word_to_usize(&read_word(args, 0).ok()?).ok()?;
    let reason = decode_bytes(args, offset).ok()?;
    String::from_utf8(reason.0).ok()
}

// =============================================================================
// STATE SYNCED LOG
// =============================================================================

/// topic0 of every `StateSynced` log.
#[must_use]
pub fn state_synced_topic() -> Hash {
    keccak256(STATE_SYNCED_SIGNATURE.as_bytes())
}

/// Encodes a record as the log the contract at `contract` would emit.
#[must_use]
pub fn encode_state_synced_log(contract: Address, record: &SyncRecord) -> Log {
    let mut data = Vec::with_capacity(2 * WORD_SIZE + record.data.len());
    data.extend_from_slice(&uint_word(U256::from(WORD_SIZE)));
    encode_bytes_tail(&mut data, record.data.as_slice());

    Log {
        address: contract,
        topics: vec![
            state_synced_topic(),
            Hash::from_u256(record.id),
            Hash::from(record.sender),
            Hash::from(record.receiver),
        ],
        data: Bytes(data),
    }
}

/// Decodes a `StateSynced` log back into its record.
///
/// # Errors
///
/// `UnexpectedLog` for foreign logs, `InvalidAddress` or length/offset
/// errors for malformed ones.
pub fn decode_state_synced_log(log: &Log) -> Result<SyncRecord, AbiError> {
    if log.topics.len() != 4 || log.topics[0] != state_synced_topic() {
        return Err(AbiError::UnexpectedLog);
    }
    let sender = Address::from_word(log.topics[2].as_bytes()).ok_or(AbiError::InvalidAddress)?;
    let receiver =
        Address::from_word(log.topics[3].as_bytes()).ok_or(AbiError::InvalidAddress)?;
    let offset = word_to_usize(&read_word(log.data.as_slice(), 0)?)?;
    let data = decode_bytes(log.data.as_slice(), offset)?;

    Ok(SyncRecord {
        id: log.topics[1].to_u256(),
        sender,
        receiver,
        data,
    })
}

// =============================================================================
// TESTS
// =============================================================================
