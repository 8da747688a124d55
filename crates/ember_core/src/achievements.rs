//! Achievement Engine
//!
//! Permanent badges unlocked from aggregate stats. The unlocked set is
//! append-only and unique by id: once earned, a badge is never revoked or
//! re-triggered, so re-running the check against identical stats is a
//! no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A permanently unlocked badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub points: u32,
    pub earned_at: DateTime<Utc>,
}

/// Aggregate stats the rules are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AchievementStats {
    pub streak: u32,
    pub total_points: u64,
    pub level: u32,
    pub completed_recommendations: u32,
    pub completed_challenges: u32,
}

/// Fixed unlock rule: a predicate over the aggregate stats.
struct AchievementRule {
    id: &'static str,
    title: &'static str,
    icon: &'static str,
    points: u32,
    unlocked: fn(&AchievementStats) -> bool,
}

const RULES: &[AchievementRule] = &[
    AchievementRule {
        id: "first-recommendation",
        title: "Getting Started",
        icon: "🌱",
        points: 10,
        unlocked: |s| s.completed_recommendations >= 1,
    },
    AchievementRule {
        id: "streak-3",
        title: "Kindling",
        icon: "🔥",
        points: 10,
        unlocked: |s| s.streak >= 3,
    },
    AchievementRule {
        id: "streak-7",
        title: "Week of Fire",
        icon: "🔥",
        points: 25,
        unlocked: |s| s.streak >= 7,
    },
    AchievementRule {
        id: "streak-30",
        title: "Monthly Flame",
        icon: "🏆",
        points: 100,
        unlocked: |s| s.streak >= 30,
    },
    AchievementRule {
        id: "points-500",
        title: "Point Collector",
        icon: "💰",
        points: 25,
        unlocked: |s| s.total_points >= 500,
    },
    AchievementRule {
        id: "points-2500",
        title: "Point Hoarder",
        icon: "💎",
        points: 75,
        unlocked: |s| s.total_points >= 2_500,
    },
    AchievementRule {
        id: "level-5",
        title: "Climbing",
        icon: "📈",
        points: 50,
        unlocked: |s| s.level >= 5,
    },
    AchievementRule {
        id: "recommendations-10",
        title: "Advice Taker",
        icon: "✅",
        points: 50,
        unlocked: |s| s.completed_recommendations >= 10,
    },
    AchievementRule {
        id: "first-challenge",
        title: "Challenger",
        icon: "🎯",
        points: 20,
        unlocked: |s| s.completed_challenges >= 1,
    },
    AchievementRule {
        id: "challenges-5",
        title: "Challenge Champion",
        icon: "🏅",
        points: 75,
        unlocked: |s| s.completed_challenges >= 5,
    },
];

/// Evaluate every rule against `stats` and append newly satisfied badges.
///
/// Idempotent: ids already present are never re-added, and nothing is ever
/// removed. `now` is supplied by the caller so the function stays pure.
pub fn check_achievements(
    current: &[Achievement],
    stats: &AchievementStats,
    now: DateTime<Utc>,
) -> Vec<Achievement> {
    let mut updated = current.to_vec();
    for rule in RULES {
        if (rule.unlocked)(stats) && !updated.iter().any(|a| a.id == rule.id) {
            updated.push(Achievement {
                id: rule.id.to_string(),
                title: rule.title.to_string(),
                icon: rule.icon.to_string(),
                points: rule.points,
                earned_at: now,
            });
        }
    }
    updated
}
