//! Scoring & Progression
//!
//! Everything derived from the ledger's solve history. Nothing in this
//! module is authoritative: the contract awards points on-chain, and these
//! components mirror or aggregate that record.
//!
//! ## Module Structure
//!
//! - `puzzle`: puzzle metadata records and the store boundary
//! - `scoring`: point mirror of the contract formula (floor semantics)
//! - `progress`: streak tracking, idempotent solve-event folding
//! - `badges`: badge identifiers and eligibility predicates
//! - `leaderboard`: deterministic standings over the event history
//! - `referral`: off-ledger inviter/invitee bookkeeping

pub mod badges;
pub mod leaderboard;
pub mod progress;
pub mod puzzle;
pub mod referral;
pub mod scoring;

// Re-export key types
pub use badges::BadgeId;
pub use leaderboard::{rank, Standing, DEFAULT_TOP_N};
pub use progress::{PlayerProgress, ProgressTracker, ProgressUpdate};
pub use puzzle::{DifficultyTier, MemoryPuzzleStore, PuzzleRecord, PuzzleStore, StoreError};
pub use referral::{ReferralLedger, ReferralOutcome, ReferralStats};
pub use scoring::compute_points;
