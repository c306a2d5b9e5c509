//! Ledger Boundary
//!
//! The external ledger (a smart contract) is the system of record for
//! commitments, reveals, and awarded points. This module reads it as an
//! append-only event source and never mutates history.
//!
//! - `event`: typed event records and raw-log decoding
//! - `reader`: async event fetching with the retryable/fatal error split
//! - `client`: write-side contract surface (commit / reveal / queries)

pub mod client;
pub mod event;
pub mod reader;

// Re-export key types
pub use client::LedgerClient;
pub use event::{CommittedEvent, DecodeError, LedgerPosition, RawLog, SolveEvent};
pub use reader::{LedgerError, LedgerReader, MemoryLedger};
