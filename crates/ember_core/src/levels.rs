//! Level Calculator
//!
//! Maps total points to a level via a cumulative threshold table.
//!
//! ## Thresholds
//!
//! `LEVEL_THRESHOLDS[i]` is the total XP required to hold level `i + 1`:
//! 0 points is level 1, 100 points is level 2, and so on. Past the end of
//! the table, each further gap is the previous gap times 3/2 in integer
//! arithmetic, so the curve keeps steepening at the pace of the table's
//! tail without an upper level cap.

use serde::{Deserialize, Serialize};

/// Cumulative XP required for each defined level (level 1 at index 0).
pub const LEVEL_THRESHOLDS: &[u64] = &[0, 100, 250, 500, 1_000, 1_750, 2_750, 4_000, 5_500, 7_500];

/// Extrapolation growth for gaps beyond the table, as a ratio.
const GAP_GROWTH_NUM: u64 = 3;
const GAP_GROWTH_DEN: u64 = 2;

/// Derived level information. Never stored; recomputed from total points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// Current level, starting at 1
    pub level: u32,
    /// Total XP the level was computed from
    pub current_xp: u64,
    /// Cumulative XP required for the current level
    pub xp_for_current_level: u64,
    /// Cumulative XP required for the next level
    pub xp_for_next_level: u64,
    /// XP earned within the current level
    pub progress: u64,
    /// Progress through the current level, 0-100
    pub progress_percentage: f64,
}

/// Compute level information for a point total.
pub fn level_info(total_points: u64) -> LevelInfo {
    let last = LEVEL_THRESHOLDS.len() - 1;

    let (level, current, next) = if total_points < LEVEL_THRESHOLDS[last] {
        // Largest defined threshold at or below the total
        let mut idx = 0;
        while idx + 1 < LEVEL_THRESHOLDS.len() && LEVEL_THRESHOLDS[idx + 1] <= total_points {
            idx += 1;
        }
        (idx as u32 + 1, LEVEL_THRESHOLDS[idx], LEVEL_THRESHOLDS[idx + 1])
    } else {
        // Extrapolate: keep growing the last defined gap by 3/2
        let mut idx = last as u32;
        let mut current = LEVEL_THRESHOLDS[last];
        let mut gap = LEVEL_THRESHOLDS[last] - LEVEL_THRESHOLDS[last - 1];
        loop {
            gap = gap * GAP_GROWTH_NUM / GAP_GROWTH_DEN;
            if current + gap > total_points {
                break;
            }
            current += gap;
            idx += 1;
        }
        (idx + 1, current, current + gap)
    };

    let progress = total_points - current;
    let span = next - current;
    LevelInfo {
        level,
        current_xp: total_points,
        xp_for_current_level: current,
        xp_for_next_level: next,
        progress,
        progress_percentage: progress as f64 / span as f64 * 100.0,
    }
}

/// True iff the new total crosses at least one level threshold.
pub fn check_level_up(prev_total: u64, new_total: u64) -> bool {
    level_info(prev_total).level < level_info(new_total).level
}
