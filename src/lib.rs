//! # CipherTrail Core
//!
//! Commit-reveal integrity protocol and scoring/progression engine for the
//! CipherTrail daily puzzle competition.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CIPHERTRAIL CORE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── epoch.rs    - UTC day-index derivation                  │
//! │  └── hash.rs     - Keccak-256 digests                       │
//! │                                                              │
//! │  protocol/       - Commit-reveal codec                       │
//! │  ├── commitment.rs - Packed encoding, salt generation        │
//! │  └── reveal.rs   - Local reveal pre-check                    │
//! │                                                              │
//! │  ledger/         - External contract boundary                │
//! │  ├── event.rs    - Typed events, raw log decoding            │
//! │  ├── reader.rs   - Event fetching, error taxonomy            │
//! │  └── client.rs   - commit/reveal write surface               │
//! │                                                              │
//! │  limit/          - Hint & submission rate limiting           │
//! │                                                              │
//! │  game/           - Scoring and progression                   │
//! │  ├── scoring.rs  - Contract point formula mirror             │
//! │  ├── progress.rs - Streak folding, badge awards              │
//! │  ├── leaderboard.rs - Global + tournament standings          │
//! │  └── referral.rs - Inviter/invitee bookkeeping               │
//! │                                                              │
//! │  service/        - Boundary contracts (non-authoritative)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Integrity Guarantee
//!
//! The `core/` and `protocol/` modules are byte-exact mirrors of what the
//! ledger contract computes on-chain:
//! - commitment packing is raw field concatenation (Solidity
//!   `abi.encodePacked`), never a generic serialization
//! - all point arithmetic floors, never rounds
//! - day boundaries are UTC midnight by integer division
//!
//! Given identical inputs, commitment encoding produces **identical
//! digests** here and on the ledger; any drift makes reveals fail
//! unrecoverably.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod ledger;
pub mod limit;
pub mod protocol;
pub mod service;

// Re-export commonly used types
pub use crate::core::epoch::DayIndex;
pub use game::leaderboard::{
    rank, tournament_standings, Standing, TournamentStanding, TournamentWindow,
};
pub use game::progress::{PlayerProgress, ProgressTracker};
pub use ledger::event::SolveEvent;
pub use ledger::{LedgerClient, LedgerReader};
pub use protocol::commitment::{
    encode_commitment, generate_salt, Commitment, PlayerAddress, Salt,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Milliseconds in one UTC day.
pub const MS_PER_DAY: u64 = 86_400_000;

/// Seconds in one UTC day.
pub const SECONDS_PER_DAY: u64 = 86_400;
