//! Commit-Reveal Protocol
//!
//! Client-side half of the ledger's commit-reveal scheme.
//!
//! A player commits `keccak256(answer ‖ salt ‖ address ‖ day)` before
//! revealing the answer. The ledger re-derives the digest at reveal time
//! and rejects on any mismatch, so the packing here must be byte-identical
//! to the contract's `abi.encodePacked` — this is the single highest-risk
//! surface in the crate.
//!
//! - `commitment`: packed encoding, salt generation, field validation
//! - `reveal`: local pre-check so a doomed reveal fails client-side first

pub mod commitment;
pub mod reveal;

// Re-export key types
pub use commitment::{
    encode_commitment, generate_salt, CodecError, Commitment, PlayerAddress, Salt,
};
pub use reveal::{check_reveal, RevealError};
