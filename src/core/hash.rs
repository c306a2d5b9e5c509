//! Keccak-256 Hashing
//!
//! Digest primitives shared by the commitment codec, event decoding, and
//! puzzle answer storage. Keccak-256 (not NIST SHA-3) because that is what
//! the EVM ledger computes; mixing the two silently breaks every reveal.

use sha3::{Digest, Keccak256};

/// Hash output type (256 bits / 32 bytes).
pub type Digest32 = [u8; 32];

/// Keccak-256 of a byte slice.
pub fn keccak256(bytes: &[u8]) -> Digest32 {
    let mut hasher = Keccak256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// One-way digest of a puzzle answer, as stored by the operator tooling.
///
/// `keccak256(utf8(answer))` — the plaintext never leaves the seeding
/// process. Callers are responsible for trimming/casing first; the ledger
/// performs no normalization either.
pub fn answer_digest(answer: &str) -> Digest32 {
    keccak256(answer.as_bytes())
}

/// Keccak-256 of an event signature string, used as the log topic0 filter.
pub fn event_signature_hash(signature: &str) -> Digest32 {
    keccak256(signature.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty_vector() {
        // Canonical Keccak-256 empty-input vector
        let digest = keccak256(b"");
        assert_eq!(
            hex::encode(digest),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_answer_digest_is_deterministic() {
        assert_eq!(answer_digest("hello"), answer_digest("hello"));
        assert_ne!(answer_digest("hello"), answer_digest("Hello"));
    }

    #[test]
    fn test_answer_digest_matches_raw_keccak() {
        assert_eq!(answer_digest("hello"), keccak256(b"hello"));
    }
}
