//! Badges
//!
//! Achievement flags tied to predicates over a player's progress. Badge
//! ids match the achievements contract and are monotonic: once held, a
//! badge is never revoked no matter what later solves look like.

use serde::{Deserialize, Serialize};

use crate::game::progress::PlayerProgress;

/// Number of distinct first-ever solvers eligible for [`BadgeId::Pioneer`].
pub const PIONEER_RANK_MAX: u64 = 10;

/// Badge identifiers. Values match the achievements contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BadgeId {
    /// Solved a first puzzle.
    FirstSolve = 1,
    /// 3 consecutive days.
    Streak3 = 2,
    /// 7 consecutive days.
    Streak7 = 3,
    /// 30 consecutive days.
    Streak30 = 4,
    /// 10 total solves.
    Solves10 = 5,
    /// 50 total solves.
    Solves50 = 6,
    /// 100 total solves.
    Solves100 = 7,
    /// Solved within the first hour of the day.
    SpeedDemon = 8,
    /// Among the first distinct solvers system-wide.
    Pioneer = 9,
}

impl BadgeId {
    /// All badges in predicate-evaluation order (ascending id).
    pub const ALL: [BadgeId; 9] = [
        BadgeId::FirstSolve,
        BadgeId::Streak3,
        BadgeId::Streak7,
        BadgeId::Streak30,
        BadgeId::Solves10,
        BadgeId::Solves50,
        BadgeId::Solves100,
        BadgeId::SpeedDemon,
        BadgeId::Pioneer,
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstSolve => "First Solve",
            Self::Streak3 => "3-Day Streak",
            Self::Streak7 => "Week Warrior",
            Self::Streak30 => "Monthly Master",
            Self::Solves10 => "10 Solves",
            Self::Solves50 => "50 Solves",
            Self::Solves100 => "Century Solver",
            Self::SpeedDemon => "Speed Demon",
            Self::Pioneer => "Pioneer",
        }
    }

    /// Whether this badge's predicate holds for the given progress
    /// snapshot. Predicates only ever look at the updated snapshot, so a
    /// badge that becomes true stays true.
    pub fn is_earned(self, progress: &PlayerProgress, solved_in_first_hour: bool) -> bool {
        match self {
            Self::FirstSolve => progress.total_solves >= 1,
            Self::Streak3 => progress.streak >= 3,
            Self::Streak7 => progress.streak >= 7,
            Self::Streak30 => progress.streak >= 30,
            Self::Solves10 => progress.total_solves >= 10,
            Self::Solves50 => progress.total_solves >= 50,
            Self::Solves100 => progress.total_solves >= 100,
            Self::SpeedDemon => solved_in_first_hour,
            Self::Pioneer => matches!(progress.solver_rank, Some(rank) if rank <= PIONEER_RANK_MAX),
        }
    }
}

/// Evaluate all predicates in fixed order against an updated progress
/// snapshot, returning the badges newly transitioning into the held set.
/// The caller has already updated streak/totals for the triggering solve.
pub fn newly_earned(progress: &PlayerProgress, solved_in_first_hour: bool) -> Vec<BadgeId> {
    BadgeId::ALL
        .iter()
        .copied()
        .filter(|badge| {
            !progress.badges.contains(badge) && badge.is_earned(progress, solved_in_first_hour)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::epoch::DayIndex;
    use crate::protocol::commitment::PlayerAddress;

    fn progress_with(streak: u64, total: u64, rank: Option<u64>) -> PlayerProgress {
        PlayerProgress {
            player: PlayerAddress::new([1u8; 20]),
            streak,
            best_streak: streak,
            total_solves: total,
            last_solved_day: Some(DayIndex(100)),
            solver_rank: rank,
            badges: Default::default(),
        }
    }

    #[test]
    fn test_first_solve_and_streak_thresholds() {
        let p = progress_with(3, 3, None);
        let earned = newly_earned(&p, false);
        assert_eq!(earned, vec![BadgeId::FirstSolve, BadgeId::Streak3]);
    }

    #[test]
    fn test_solve_count_thresholds() {
        let p = progress_with(1, 50, None);
        let earned = newly_earned(&p, false);
        assert!(earned.contains(&BadgeId::Solves10));
        assert!(earned.contains(&BadgeId::Solves50));
        assert!(!earned.contains(&BadgeId::Solves100));
    }

    #[test]
    fn test_held_badges_not_re_earned() {
        let mut p = progress_with(7, 7, None);
        p.badges.insert(BadgeId::FirstSolve);
        p.badges.insert(BadgeId::Streak3);
        let earned = newly_earned(&p, false);
        assert_eq!(earned, vec![BadgeId::Streak7]);
    }

    #[test]
    fn test_speed_demon_requires_first_hour() {
        let p = progress_with(1, 1, None);
        assert!(newly_earned(&p, true).contains(&BadgeId::SpeedDemon));
        assert!(!newly_earned(&p, false).contains(&BadgeId::SpeedDemon));
    }

    #[test]
    fn test_pioneer_rank_cutoff() {
        assert!(newly_earned(&progress_with(1, 1, Some(1)), false).contains(&BadgeId::Pioneer));
        assert!(newly_earned(&progress_with(1, 1, Some(PIONEER_RANK_MAX)), false)
            .contains(&BadgeId::Pioneer));
        assert!(!newly_earned(&progress_with(1, 1, Some(PIONEER_RANK_MAX + 1)), false)
            .contains(&BadgeId::Pioneer));
        assert!(!newly_earned(&progress_with(1, 1, None), false).contains(&BadgeId::Pioneer));
    }

    #[test]
    fn test_evaluation_order_is_ascending_id() {
        let p = progress_with(30, 100, Some(1));
        let earned = newly_earned(&p, true);
        let ids: Vec<u8> = earned.iter().map(|b| *b as u8).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(earned.len(), 9);
    }
}
