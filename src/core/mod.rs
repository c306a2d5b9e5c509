//! Core deterministic primitives.
//!
//! Day-index derivation and Keccak-256 hashing. Everything here is a pure
//! function of its inputs: no clocks, no I/O, no randomness. The ledger
//! contract performs the same computations on-chain, so any drift in this
//! module corrupts commitments, not just display.

pub mod epoch;
pub mod hash;

// Re-export core types
pub use epoch::DayIndex;
pub use hash::{keccak256, Digest32};
