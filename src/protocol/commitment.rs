//! Commitment Codec
//!
//! Deterministic packed encoding of (answer, salt, player, day) into the
//! 32-byte commitment digest stored on the ledger.
//!
//! The packing is Solidity `abi.encodePacked` semantics, NOT a generic
//! structured serialization: raw UTF-8 answer bytes with no length prefix,
//! then the 32 salt bytes, the 20 address bytes, and the day as a 32-byte
//! big-endian unsigned integer. The contract hashes the identical
//! concatenation at reveal time; a single byte of drift makes every reveal
//! fail with no recovery path.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use thiserror::Error;

use crate::core::epoch::DayIndex;
use crate::core::hash::Digest32;

/// Byte length of a salt.
pub const SALT_LEN: usize = 32;

/// Byte length of a player address.
pub const ADDRESS_LEN: usize = 20;

/// Codec errors.
///
/// Wrong-length salt or address input fails fast rather than being padded
/// or truncated: a short salt silently padded would collide across
/// encodings, which is a security hazard, not a formatting nit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Salt hex input did not decode to exactly 32 bytes.
    #[error("salt must be exactly {SALT_LEN} bytes, got {0}")]
    BadSaltLength(usize),
    /// Address hex input did not decode to exactly 20 bytes.
    #[error("player address must be exactly {ADDRESS_LEN} bytes, got {0}")]
    BadAddressLength(usize),
    /// Input was not valid hexadecimal.
    #[error("invalid hex: {0}")]
    BadHex(String),
    /// No cryptographically secure entropy source was available.
    #[error("secure entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}

fn decode_hex(s: &str) -> Result<Vec<u8>, CodecError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped).map_err(|e| CodecError::BadHex(e.to_string()))
}

// =============================================================================
// SALT
// =============================================================================

/// 32 bytes of client-side randomness binding a commitment.
///
/// Held only for the lifetime of one commit-reveal cycle and never sent to
/// any off-ledger store. Losing it before reveal makes the commitment
/// permanently unredeemable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt(pub [u8; SALT_LEN]);

impl Salt {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a hex string (with or without `0x` prefix).
    ///
    /// Rejects any length other than exactly 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        let bytes = decode_hex(s)?;
        let len = bytes.len();
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| CodecError::BadSaltLength(len))
    }

    /// Hex representation with `0x` prefix, as submitted to the ledger.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }

    /// Deterministic salt for tests.
    ///
    /// Named separately from [`generate_salt`] on purpose: production code
    /// must never fall back to a predictable salt when entropy is missing.
    #[cfg(test)]
    pub fn deterministic_for_tests(seed: u8) -> Self {
        let mut bytes = [0u8; SALT_LEN];
        bytes[SALT_LEN - 1] = seed;
        Self(bytes)
    }
}

/// Generate a fresh salt from the operating system's secure random source.
///
/// Fails if no such source is available; there is deliberately no
/// non-cryptographic fallback here.
pub fn generate_salt() -> Result<Salt, CodecError> {
    let mut bytes = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CodecError::EntropyUnavailable(e.to_string()))?;
    Ok(Salt(bytes))
}

// =============================================================================
// PLAYER ADDRESS
// =============================================================================

/// 20-byte player identifier, matching the ledger's address type.
///
/// Implements `Ord` for deterministic BTreeMap ordering.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PlayerAddress(pub [u8; ADDRESS_LEN]);

impl PlayerAddress {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a hex string (with or without `0x` prefix).
    ///
    /// Rejects any length other than exactly 20 bytes.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        let bytes = decode_hex(s)?;
        let len = bytes.len();
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| CodecError::BadAddressLength(len))
    }

    /// Lowercase hex representation with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// First 8 hex characters of the address, used as a referral code.
    pub fn referral_code(&self) -> String {
        hex::encode(self.0)[..8].to_string()
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl std::fmt::Display for PlayerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// =============================================================================
// COMMITMENT
// =============================================================================

/// 32-byte commitment digest, produced once per (player, day) and immutable
/// thereafter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub Digest32);

impl Commitment {
    /// Hex representation with `0x` prefix, as stored by the ledger.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &Digest32 {
        &self.0
    }
}

/// Encode a commitment exactly as the ledger contract does.
///
/// `keccak256(answer_utf8 ‖ salt[32] ‖ address[20] ‖ day_u256_be[32])`.
///
/// Normalizes nothing: the exact bytes of `answer` as supplied are packed,
/// since the contract performs no normalization either. Callers trim and
/// case-fold before calling. Stateless: identical inputs always yield an
/// identical digest.
pub fn encode_commitment(
    answer: &str,
    salt: &Salt,
    player: &PlayerAddress,
    day: DayIndex,
) -> Commitment {
    let mut hasher = Keccak256::new();
    hasher.update(answer.as_bytes());
    hasher.update(salt.0);
    hasher.update(player.0);
    hasher.update(day_to_u256_be(day));
    Commitment(hasher.finalize().into())
}

/// Day index as a 32-byte big-endian word (`uint256` packing).
fn day_to_u256_be(day: DayIndex) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&day.value().to_be_bytes());
    word
}
