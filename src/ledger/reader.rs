//! Ledger Reader
//!
//! Pulls solve/commit events from the external ledger over a block range
//! and decodes them into typed records, in emission order (block, then
//! intra-block index).
//!
//! Error split matters here: transport failures are retryable
//! ([`LedgerError::Unavailable`]) and must never be treated as "not
//! solved"; malformed payloads are fatal per event and are dropped and
//! logged, never fabricated into zero-value records.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

use crate::core::epoch::DayIndex;
use crate::core::hash::event_signature_hash;
use crate::ledger::client::LedgerClient;
use crate::ledger::event::{
    DecodeError, RawLog, SolveEvent, COMMITTED_SIGNATURE, SOLVED_SIGNATURE,
};
use crate::protocol::commitment::{Commitment, PlayerAddress, Salt};
use crate::protocol::reveal::{check_reveal, RevealError};

/// Ledger I/O errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Node or network failure. Transient; callers may retry with backoff.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
    /// Malformed event payload. Non-retryable.
    #[error("event decode failed: {0}")]
    Decode(#[from] DecodeError),
    /// A write was rejected by the contract.
    #[error("ledger rejected: {0}")]
    Rejected(String),
}

/// Read-side ledger surface.
///
/// A fetch produces a finite sequence ordered by ledger emission order.
/// Implementations own the transport; this crate only owns the decoding.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Fetch raw logs emitted by the contract in `[from_block, to_block]`.
    async fn fetch_raw_logs(&self, from_block: u64, to_block: u64)
        -> Result<Vec<RawLog>, LedgerError>;

    /// Fetch decoded `Solved` events for a block range.
    ///
    /// Undecodable logs are dropped and logged rather than failing the
    /// batch: streak and leaderboard aggregation degrade gracefully over
    /// partial event sets.
    async fn fetch_solve_events(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<SolveEvent>, LedgerError> {
        let raw = self.fetch_raw_logs(from_block, to_block).await?;
        Ok(decode_solve_batch(&raw))
    }
}

/// Decode a batch of raw logs into `Solved` events, preserving emission
/// order. Logs for other events are skipped silently; logs that claim to be
/// `Solved` but fail to decode are dropped with a warning.
pub fn decode_solve_batch(logs: &[RawLog]) -> Vec<SolveEvent> {
    let solved_topic = event_signature_hash(SOLVED_SIGNATURE);
    let mut events = Vec::new();
    for log in logs {
        if log.topics.first() != Some(&solved_topic) {
            continue;
        }
        match SolveEvent::decode(log) {
            Ok(event) => events.push(event),
            Err(err) => {
                warn!(
                    block = log.block_number,
                    log_index = log.log_index,
                    %err,
                    "dropping undecodable Solved log"
                );
            }
        }
    }
    events.sort_by_key(|e| e.position);
    events
}

// =============================================================================
// IN-MEMORY LEDGER (tests and demo)
// =============================================================================

struct MemoryLedgerInner {
    logs: Vec<RawLog>,
    commitments: Vec<(PlayerAddress, DayIndex, Commitment)>,
    solved: Vec<(PlayerAddress, DayIndex)>,
    answers: Vec<(DayIndex, String, u64)>,
    next_block: u64,
    /// When set, reads fail with `Unavailable` (outage simulation).
    offline: bool,
}

/// In-memory ledger implementing both halves of the boundary.
///
/// Mirrors the contract's commit-reveal rules closely enough for tests and
/// the demo binary: one commitment per (player, day), reveal re-derives the
/// commitment and checks the answer, a successful reveal emits a `Solved`
/// log.
pub struct MemoryLedger {
    inner: Mutex<MemoryLedgerInner>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryLedgerInner {
                logs: Vec::new(),
                commitments: Vec::new(),
                solved: Vec::new(),
                answers: Vec::new(),
                next_block: 1,
                offline: false,
            }),
        }
    }

    /// Register the accepted answer and point award for a day.
    pub fn set_answer(&self, day: DayIndex, answer: &str, points: u64) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.answers.push((day, answer.to_string(), points));
    }

    /// Toggle simulated node outage.
    pub fn set_offline(&self, offline: bool) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.offline = offline;
    }

    /// Inject a raw log directly (malformed-payload tests).
    pub fn push_raw_log(&self, log: RawLog) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.next_block = inner.next_block.max(log.block_number + 1);
        inner.logs.push(log);
    }

    fn emit_solved(inner: &mut MemoryLedgerInner, player: PlayerAddress, day: DayIndex, points: u64) {
        let mut topic1 = [0u8; 32];
        topic1[12..].copy_from_slice(&player.0);
        let mut data = vec![0u8; 64];
        data[24..32].copy_from_slice(&day.value().to_be_bytes());
        data[56..64].copy_from_slice(&points.to_be_bytes());
        let block = inner.next_block;
        inner.next_block += 1;
        inner.logs.push(RawLog {
            address: PlayerAddress::default(),
            topics: vec![event_signature_hash(SOLVED_SIGNATURE), topic1],
            data,
            block_number: block,
            log_index: 0,
        });
    }

    fn emit_committed(
        inner: &mut MemoryLedgerInner,
        player: PlayerAddress,
        day: DayIndex,
        commitment: &Commitment,
    ) {
        let mut topic1 = [0u8; 32];
        topic1[12..].copy_from_slice(&player.0);
        let mut data = vec![0u8; 64];
        data[24..32].copy_from_slice(&day.value().to_be_bytes());
        data[32..64].copy_from_slice(commitment.as_bytes());
        let block = inner.next_block;
        inner.next_block += 1;
        inner.logs.push(RawLog {
            address: PlayerAddress::default(),
            topics: vec![event_signature_hash(COMMITTED_SIGNATURE), topic1],
            data,
            block_number: block,
            log_index: 0,
        });
    }
}

#[async_trait]
impl LedgerReader for MemoryLedger {
    async fn fetch_raw_logs(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawLog>, LedgerError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.offline {
            return Err(LedgerError::Unavailable("node offline".to_string()));
        }
        Ok(inner
            .logs
            .iter()
            .filter(|l| l.block_number >= from_block && l.block_number <= to_block)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn commit(
        &self,
        player: PlayerAddress,
        commitment: Commitment,
        day: DayIndex,
    ) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.offline {
            return Err(LedgerError::Unavailable("node offline".to_string()));
        }
        if inner
            .commitments
            .iter()
            .any(|(p, d, _)| *p == player && *d == day)
        {
            return Err(LedgerError::Rejected("already committed".to_string()));
        }
        inner.commitments.push((player, day, commitment));
        Self::emit_committed(&mut inner, player, day, &commitment);
        Ok(())
    }

    async fn reveal(
        &self,
        player: PlayerAddress,
        answer: &str,
        salt: &Salt,
        day: DayIndex,
    ) -> Result<u64, LedgerError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.offline {
            return Err(LedgerError::Unavailable("node offline".to_string()));
        }
        let stored = inner
            .commitments
            .iter()
            .find(|(p, d, _)| *p == player && *d == day)
            .map(|(_, _, c)| *c)
            .ok_or_else(|| LedgerError::Rejected("no commitment".to_string()))?;
        if let Err(RevealError::CommitmentMismatch { .. }) =
            check_reveal(answer, salt, &player, day, &stored)
        {
            return Err(LedgerError::Rejected("commitment mismatch".to_string()));
        }
        let points = inner
            .answers
            .iter()
            .find(|(d, a, _)| *d == day && a == answer)
            .map(|(_, _, p)| *p)
            .ok_or_else(|| LedgerError::Rejected("wrong answer".to_string()))?;
        if inner.solved.iter().any(|(p, d)| *p == player && *d == day) {
            return Err(LedgerError::Rejected("already solved".to_string()));
        }
        inner.solved.push((player, day));
        Self::emit_solved(&mut inner, player, day, points);
        Ok(points)
    }

    async fn has_committed(&self, player: PlayerAddress, day: DayIndex) -> Result<bool, LedgerError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.offline {
            return Err(LedgerError::Unavailable("node offline".to_string()));
        }
        Ok(inner
            .commitments
            .iter()
            .any(|(p, d, _)| *p == player && *d == day))
    }

    async fn has_solved(&self, player: PlayerAddress, day: DayIndex) -> Result<bool, LedgerError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.offline {
            return Err(LedgerError::Unavailable("node offline".to_string()));
        }
        Ok(inner.solved.iter().any(|(p, d)| *p == player && *d == day))
    }
}
