//! Scoring Engine
//!
//! Off-chain mirror of the contract's point formula, used for previews and
//! achievement logic. The ledger is authoritative; this copy must stay
//! numerically identical, which above all means flooring at every integer
//! division so the preview never over-credits relative to the contract.
//!
//! Formula:
//!
//! ```text
//! scaled = base_weight * multiplier_bps / 10_000
//! speed  = scaled * (MS_PER_DAY - offset) / MS_PER_DAY
//! points = scaled + speed
//! ```
//!
//! A solve at UTC midnight doubles the scaled base; the bonus decays
//! linearly to zero over the day.

use crate::game::puzzle::PuzzleRecord;
use crate::MS_PER_DAY;

/// Basis-point denominator for bonus multipliers.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Compute points for a solve.
///
/// Monotonically non-increasing in `offset_ms` and non-decreasing in
/// `base_weight` and `bonus_multiplier_bps`. Offsets past the end of the
/// day clamp to zero speed bonus.
pub fn compute_points(base_weight: u64, bonus_multiplier_bps: u32, offset_ms: u64) -> u64 {
    let scaled = base_weight * bonus_multiplier_bps as u64 / BPS_DENOMINATOR;
    let left = MS_PER_DAY.saturating_sub(offset_ms);
    let speed = scaled * left / MS_PER_DAY;
    scaled + speed
}

/// Points for solving `puzzle` at the given offset within its day.
pub fn points_for_puzzle(puzzle: &PuzzleRecord, offset_ms: u64) -> u64 {
    compute_points(
        puzzle.difficulty.base_weight(),
        puzzle.bonus_multiplier_bps,
        offset_ms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midnight_solve_doubles_base() {
        // Medium puzzle, 1.0x multiplier, instant solve
        assert_eq!(compute_points(100, 10_000, 0), 200);
    }

    #[test]
    fn test_end_of_day_solve_earns_base_only() {
        assert_eq!(compute_points(100, 10_000, MS_PER_DAY), 100);
        // Past end of day clamps rather than underflowing
        assert_eq!(compute_points(100, 10_000, MS_PER_DAY * 3), 100);
    }

    #[test]
    fn test_monotone_non_increasing_in_offset() {
        let mut prev = u64::MAX;
        for offset in (0..=MS_PER_DAY).step_by((MS_PER_DAY / 48) as usize) {
            let points = compute_points(150, 15_000, offset);
            assert!(points <= prev, "offset {offset}");
            prev = points;
        }
    }

    #[test]
    fn test_monotone_in_weight_and_multiplier() {
        let offset = MS_PER_DAY / 3;
        assert!(compute_points(150, 10_000, offset) >= compute_points(100, 10_000, offset));
        assert!(compute_points(100, 15_000, offset) >= compute_points(100, 10_000, offset));
    }

    #[test]
    fn test_floor_not_round() {
        // 0.8x on 80 base = 64 scaled; half the day left gives exactly 32.
        // One ms later the speed term must floor down, not round up.
        let half = MS_PER_DAY / 2;
        assert_eq!(compute_points(80, 8_000, half), 64 + 32);
        assert_eq!(compute_points(80, 8_000, half + 1), 64 + 31);
    }
}
