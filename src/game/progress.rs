//! Streak & Badge Tracker
//!
//! Folds the ledger's solve-event stream into per-player progress:
//! streak length, totals, and the monotonic badge set.
//!
//! The fold is idempotent — re-applying an already-seen event is a no-op —
//! because the ledger reader may re-deliver events after a restart. That,
//! plus the position watermark, makes replay safe without an explicit
//! checkpoint mechanism.
//!
//! Updates are serialized per player (each player has their own lock), so
//! concurrent events for different players proceed independently. Events
//! for one player must be applied in ledger order; out-of-order delivery
//! for the same player is treated as re-delivery and ignored.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use crate::core::epoch::DayIndex;
use crate::game::badges::{newly_earned, BadgeId};
use crate::ledger::event::{LedgerPosition, SolveEvent};
use crate::protocol::commitment::PlayerAddress;

/// Milliseconds in the first-hour window used by the SpeedDemon badge.
pub const FIRST_HOUR_MS: u64 = 3_600_000;

/// Per-player progression state.
///
/// Mutated exclusively by [`ProgressTracker::apply`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerProgress {
    /// Player this record belongs to.
    pub player: PlayerAddress,
    /// Current consecutive-day streak.
    pub streak: u64,
    /// Best streak ever reached.
    pub best_streak: u64,
    /// Total recorded solves.
    pub total_solves: u64,
    /// Day of the most recent solve.
    pub last_solved_day: Option<DayIndex>,
    /// Rank among distinct first-ever solvers system-wide, assigned
    /// monotonically at first solve (1-based).
    pub solver_rank: Option<u64>,
    /// Held badges. Strictly non-decreasing over a player's lifetime.
    pub badges: BTreeSet<BadgeId>,
}

impl PlayerProgress {
    fn new(player: PlayerAddress) -> Self {
        Self {
            player,
            streak: 0,
            best_streak: 0,
            total_solves: 0,
            last_solved_day: None,
            solver_rank: None,
            badges: BTreeSet::new(),
        }
    }
}

/// Result of folding one solve event.
#[derive(Clone, Debug)]
pub struct ProgressUpdate {
    /// Whether the event mutated state (false for re-delivery).
    pub applied: bool,
    /// Badges newly added by this event.
    pub new_badges: Vec<BadgeId>,
    /// Progress snapshot after the fold.
    pub progress: PlayerProgress,
}

struct TrackerInner {
    players: BTreeMap<PlayerAddress, Arc<Mutex<PlayerProgress>>>,
    next_solver_rank: u64,
    last_position: LedgerPosition,
}

/// Folds solve events into per-player progress.
pub struct ProgressTracker {
    inner: Mutex<TrackerInner>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TrackerInner {
                players: BTreeMap::new(),
                next_solver_rank: 1,
                last_position: LedgerPosition::default(),
            }),
        }
    }

    /// Fold one solve event.
    ///
    /// `solve_ts_ms` is the raw solve timestamp (block time); the day
    /// index alone cannot distinguish a first-hour solve.
    ///
    /// Transition for a solve on day `D`:
    /// - `last_solved_day >= D`: re-delivery, no-op;
    /// - `last_solved_day == D - 1`: streak continues;
    /// - otherwise: streak resets to 1.
    pub fn apply(&self, event: &SolveEvent, solve_ts_ms: u64) -> ProgressUpdate {
        let entry = self.entry_for(event);

        let mut progress = entry.lock().unwrap_or_else(|e| e.into_inner());

        let day = event.day;
        if let Some(last) = progress.last_solved_day {
            if last >= day {
                return ProgressUpdate {
                    applied: false,
                    new_badges: Vec::new(),
                    progress: progress.clone(),
                };
            }
            if last.next() == day {
                progress.streak += 1;
            } else {
                progress.streak = 1;
            }
        } else {
            progress.streak = 1;
        }

        progress.best_streak = progress.best_streak.max(progress.streak);
        progress.total_solves += 1;
        progress.last_solved_day = Some(day);

        let first_hour = day.offset_within_day(solve_ts_ms) < FIRST_HOUR_MS
            && solve_ts_ms >= day.start_ms();
        let new_badges = newly_earned(&progress, first_hour);
        for badge in &new_badges {
            progress.badges.insert(*badge);
        }

        ProgressUpdate {
            applied: true,
            new_badges,
            progress: progress.clone(),
        }
    }

    /// Current progress for a player, if any solve has been folded.
    pub fn get(&self, player: &PlayerAddress) -> Option<PlayerProgress> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .players
            .get(player)
            .map(|entry| entry.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    /// Highest ledger position folded so far; resume ingestion from here
    /// after a restart.
    pub fn last_position(&self) -> LedgerPosition {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.last_position
    }

    /// Get or create a player's entry, assigning the system-wide solver
    /// rank at first sight. Rank assignment and the watermark update
    /// happen under the registry lock; the per-player fold happens under
    /// the player's own lock.
    fn entry_for(&self, event: &SolveEvent) -> Arc<Mutex<PlayerProgress>> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.last_position = inner.last_position.max(event.position);
        if let Some(entry) = inner.players.get(&event.player) {
            return Arc::clone(entry);
        }
        let rank = inner.next_solver_rank;
        inner.next_solver_rank += 1;
        let mut progress = PlayerProgress::new(event.player);
        progress.solver_rank = Some(rank);
        let entry = Arc::new(Mutex::new(progress));
        inner.players.insert(event.player, Arc::clone(&entry));
        entry
    }
}
