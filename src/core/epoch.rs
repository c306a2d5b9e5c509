//! Epoch Clock
//!
//! Derives the canonical day index from wall-clock time. Every other
//! component keys its state by this index, and the ledger contract derives
//! the same value on-chain (`block.timestamp / 86400`), so the boundary is
//! UTC midnight by construction with no timezone adjustment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MS_PER_DAY;

/// Integer count of UTC days since the Unix epoch.
///
/// Two timestamps in the same UTC calendar day always map to the same
/// index. Implements `Ord` for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayIndex(pub u64);

impl DayIndex {
    /// Derive the day index from Unix-epoch milliseconds.
    ///
    /// Pure integer division; no failure modes.
    pub const fn from_unix_ms(ms: u64) -> Self {
        Self(ms / MS_PER_DAY)
    }

    /// Derive the day index from a wall-clock instant.
    pub fn from_datetime(ts: DateTime<Utc>) -> Self {
        Self::from_unix_ms(ts.timestamp_millis().max(0) as u64)
    }

    /// The current day index.
    pub fn today() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Unix-epoch milliseconds at which this day begins (UTC midnight).
    pub const fn start_ms(self) -> u64 {
        self.0 * MS_PER_DAY
    }

    /// Milliseconds elapsed between this day's UTC midnight and `ts_ms`.
    ///
    /// Saturates at zero for timestamps before the day start; callers
    /// feeding timestamps from a later day get an offset past `MS_PER_DAY`,
    /// which the scoring engine clamps.
    pub const fn offset_within_day(self, ts_ms: u64) -> u64 {
        ts_ms.saturating_sub(self.start_ms())
    }

    /// The following day.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// The preceding day, saturating at day zero.
    pub const fn prev(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Raw index value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DayIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
