//! Streak Tracker
//!
//! Consecutive-calendar-day engagement streaks with tiered bonuses.
//!
//! The comparison is by calendar day, not elapsed hours: activity at 23:59
//! followed by activity at 00:01 extends the streak. A gap of two or more
//! days, or a timestamp earlier than the last activity (clock skew), resets
//! the streak to 1. `longest_streak` never decreases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bonus tiers: streak length -> one-off bonus points.
pub const BONUS_TIERS: &[(u32, u32)] = &[(3, 5), (7, 10), (14, 25), (30, 50)];

/// Streak state for a single user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakState {
    /// Consecutive calendar days with tracked activity
    pub streak: u32,
    /// Timestamp of the most recent tracked activity
    pub last_activity: Option<DateTime<Utc>>,
    /// Longest streak ever reached; always >= streak
    pub longest_streak: u32,
}

/// Advance the streak for an activity at `now`.
///
/// Same calendar day: state unchanged. Exactly the next day: streak grows.
/// Anything else resets to 1 without touching `longest_streak`.
pub fn update_streak(state: &StreakState, now: DateTime<Utc>) -> StreakState {
    let Some(last) = state.last_activity else {
        // First tracked activity ever
        return StreakState {
            streak: 1,
            last_activity: Some(now),
            longest_streak: state.longest_streak.max(1),
        };
    };

    let day_delta = (now.date_naive() - last.date_naive()).num_days();
    match day_delta {
        0 => state.clone(),
        1 => {
            let streak = state.streak + 1;
            StreakState {
                streak,
                last_activity: Some(now),
                longest_streak: state.longest_streak.max(streak),
            }
        }
        _ => StreakState {
            streak: 1,
            last_activity: Some(now),
            longest_streak: state.longest_streak.max(1),
        },
    }
}

/// Bonus for the highest tier at or below `streak`, 0 below the first tier.
/// Monotonically non-decreasing in `streak`.
pub fn streak_bonus(streak: u32) -> u32 {
    let mut bonus = 0;
    for &(tier, value) in BONUS_TIERS {
        if streak >= tier {
            bonus = value;
        }
    }
    bonus
}

/// Whether `streak` sits exactly on a bonus tier boundary. The orchestrator
/// awards the tier bonus only at the boundary, so each tier pays out once
/// per run of consecutive days.
pub fn crossed_bonus_tier(streak: u32) -> bool {
    BONUS_TIERS.iter().any(|&(tier, _)| tier == streak)
}
