//! Ledger Events
//!
//! Typed records decoded from raw contract logs, plus the decoding itself.
//!
//! Decoding is strict: wrong topic count, short data, or a numeric word
//! that overflows its target type is a [`DecodeError`], never a record with
//! fields defaulted to zero. Fabricating a zero-point solve would corrupt
//! every aggregate downstream.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::epoch::DayIndex;
use crate::core::hash::{event_signature_hash, Digest32};
use crate::protocol::commitment::{Commitment, PlayerAddress, ADDRESS_LEN};

/// Event signature for `Solved(address,uint256,uint256)`.
pub const SOLVED_SIGNATURE: &str = "Solved(address,uint256,uint256)";

/// Event signature for `Committed(address,uint256,bytes32)`.
pub const COMMITTED_SIGNATURE: &str = "Committed(address,uint256,bytes32)";

/// Position of a log in ledger emission order: block, then intra-block
/// index. Total order across the whole history.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LedgerPosition {
    /// Block number the log was emitted in.
    pub block: u64,
    /// Index of the log within its block.
    pub log_index: u32,
}

/// A raw log as returned by a ledger node, before decoding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawLog {
    /// Emitting contract address.
    pub address: PlayerAddress,
    /// Log topics; topic0 is the event signature hash.
    pub topics: Vec<Digest32>,
    /// ABI-encoded non-indexed fields.
    pub data: Vec<u8>,
    /// Block number.
    pub block_number: u64,
    /// Intra-block log index.
    pub log_index: u32,
}

/// Decoding failures for raw logs. Non-retryable: a malformed payload stays
/// malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// topic0 did not match the expected event signature.
    #[error("unexpected event signature")]
    WrongSignature,
    /// Wrong number of topics for the event.
    #[error("expected {expected} topics, got {got}")]
    WrongTopicCount {
        /// Topics required by the event ABI.
        expected: usize,
        /// Topics present in the log.
        got: usize,
    },
    /// Data segment shorter than the event's non-indexed fields require.
    #[error("expected {expected} data bytes, got {got}")]
    ShortData {
        /// Bytes required by the event ABI.
        expected: usize,
        /// Bytes present in the log.
        got: usize,
    },
    /// A uint256 word does not fit the target integer type.
    #[error("numeric field {field} out of range")]
    ValueOutOfRange {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// A decoded `Solved` event: the ledger's record of one awarded solve.
///
/// Immutable once observed; readers only append newly observed events to
/// their working view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveEvent {
    /// Player credited with the solve.
    pub player: PlayerAddress,
    /// Day the puzzle belonged to.
    pub day: DayIndex,
    /// Points awarded by the contract.
    pub points: u64,
    /// Emission position, used for deterministic ordering.
    pub position: LedgerPosition,
}

/// A decoded `Committed` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedEvent {
    /// Player that committed.
    pub player: PlayerAddress,
    /// Day the commitment is scoped to.
    pub day: DayIndex,
    /// The stored commitment digest.
    pub commitment: Commitment,
    /// Emission position.
    pub position: LedgerPosition,
}

impl SolveEvent {
    /// Decode a raw `Solved(address indexed, uint256, uint256)` log.
    pub fn decode(log: &RawLog) -> Result<Self, DecodeError> {
        check_header(log, SOLVED_SIGNATURE, 2, 64)?;
        let player = address_from_topic(&log.topics[1]);
        let day = word_to_u64(&log.data[0..32], "day")?;
        let points = word_to_u64(&log.data[32..64], "points")?;
        Ok(Self {
            player,
            day: DayIndex(day),
            points,
            position: LedgerPosition {
                block: log.block_number,
                log_index: log.log_index,
            },
        })
    }
}

impl CommittedEvent {
    /// Decode a raw `Committed(address indexed, uint256, bytes32)` log.
    pub fn decode(log: &RawLog) -> Result<Self, DecodeError> {
        check_header(log, COMMITTED_SIGNATURE, 2, 64)?;
        let player = address_from_topic(&log.topics[1]);
        let day = word_to_u64(&log.data[0..32], "day")?;
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&log.data[32..64]);
        Ok(Self {
            player,
            day: DayIndex(day),
            commitment: Commitment(digest),
            position: LedgerPosition {
                block: log.block_number,
                log_index: log.log_index,
            },
        })
    }
}

fn check_header(
    log: &RawLog,
    signature: &str,
    topics: usize,
    data_len: usize,
) -> Result<(), DecodeError> {
    if log.topics.len() != topics {
        return Err(DecodeError::WrongTopicCount {
            expected: topics,
            got: log.topics.len(),
        });
    }
    if log.topics[0] != event_signature_hash(signature) {
        return Err(DecodeError::WrongSignature);
    }
    if log.data.len() < data_len {
        return Err(DecodeError::ShortData {
            expected: data_len,
            got: log.data.len(),
        });
    }
    Ok(())
}

/// Indexed address topics are left-padded to 32 bytes; the address is the
/// trailing 20.
fn address_from_topic(topic: &Digest32) -> PlayerAddress {
    let mut bytes = [0u8; ADDRESS_LEN];
    bytes.copy_from_slice(&topic[32 - ADDRESS_LEN..]);
    PlayerAddress::new(bytes)
}

fn word_to_u64(word: &[u8], field: &'static str) -> Result<u64, DecodeError> {
    if word[..24].iter().any(|&b| b != 0) {
        return Err(DecodeError::ValueOutOfRange { field });
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[24..32]);
    Ok(u64::from_be_bytes(tail))
}

/// Build a well-formed `Solved` raw log. Test helper shared across the
/// ledger and service test modules.
#[cfg(test)]
pub(crate) fn solved_log(player: PlayerAddress, day: u64, points: u64, pos: (u64, u32)) -> RawLog {
    let mut topic1 = [0u8; 32];
    topic1[12..].copy_from_slice(&player.0);
    let mut data = vec![0u8; 64];
    data[24..32].copy_from_slice(&day.to_be_bytes());
    data[56..64].copy_from_slice(&points.to_be_bytes());
    RawLog {
        address: PlayerAddress::default(),
        topics: vec![event_signature_hash(SOLVED_SIGNATURE), topic1],
        data,
        block_number: pos.0,
        log_index: pos.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_solved_round_trip() {
        let player = PlayerAddress::new([7u8; 20]);
        let log = solved_log(player, 20000, 150, (42, 3));
        let event = SolveEvent::decode(&log).unwrap();
        assert_eq!(event.player, player);
        assert_eq!(event.day, DayIndex(20000));
        assert_eq!(event.points, 150);
        assert_eq!(event.position, LedgerPosition { block: 42, log_index: 3 });
    }

    #[test]
    fn test_decode_rejects_missing_topic() {
        let player = PlayerAddress::new([7u8; 20]);
        let mut log = solved_log(player, 1, 1, (1, 0));
        log.topics.pop();
        assert_eq!(
            SolveEvent::decode(&log),
            Err(DecodeError::WrongTopicCount { expected: 2, got: 1 })
        );
    }

    #[test]
    fn test_decode_rejects_short_data() {
        let player = PlayerAddress::new([7u8; 20]);
        let mut log = solved_log(player, 1, 1, (1, 0));
        log.data.truncate(32);
        assert_eq!(
            SolveEvent::decode(&log),
            Err(DecodeError::ShortData { expected: 64, got: 32 })
        );
    }

    #[test]
    fn test_decode_rejects_wrong_signature() {
        let player = PlayerAddress::new([7u8; 20]);
        let mut log = solved_log(player, 1, 1, (1, 0));
        log.topics[0] = event_signature_hash(COMMITTED_SIGNATURE);
        assert_eq!(SolveEvent::decode(&log), Err(DecodeError::WrongSignature));
    }

    #[test]
    fn test_decode_rejects_oversized_points() {
        let player = PlayerAddress::new([7u8; 20]);
        let mut log = solved_log(player, 1, 1, (1, 0));
        // Set a high-order byte in the points word
        log.data[40] = 0x01;
        assert_eq!(
            SolveEvent::decode(&log),
            Err(DecodeError::ValueOutOfRange { field: "points" })
        );
    }

    #[test]
    fn test_decode_committed_round_trip() {
        let player = PlayerAddress::new([9u8; 20]);
        let commitment = Commitment([0xcd; 32]);
        let mut topic1 = [0u8; 32];
        topic1[12..].copy_from_slice(&player.0);
        let mut data = vec![0u8; 64];
        data[24..32].copy_from_slice(&20000u64.to_be_bytes());
        data[32..64].copy_from_slice(commitment.as_bytes());
        let log = RawLog {
            address: PlayerAddress::default(),
            topics: vec![event_signature_hash(COMMITTED_SIGNATURE), topic1],
            data,
            block_number: 9,
            log_index: 1,
        };

        let event = CommittedEvent::decode(&log).unwrap();
        assert_eq!(event.player, player);
        assert_eq!(event.day, DayIndex(20000));
        assert_eq!(event.commitment, commitment);
    }

    #[test]
    fn test_position_ordering_is_block_then_index() {
        let a = LedgerPosition { block: 1, log_index: 9 };
        let b = LedgerPosition { block: 2, log_index: 0 };
        let c = LedgerPosition { block: 2, log_index: 1 };
        assert!(a < b && b < c);
    }
}
