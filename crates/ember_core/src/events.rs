//! Engagement Events
//!
//! Effect-dispatch layer between the pure state transitions and whatever
//! reacts to them (toasts, analytics, a log). The engine only ever emits
//! these; it never renders or sends anything itself.

use crate::activity::ActivityKind;
use serde::{Deserialize, Serialize};

/// Something noteworthy that happened during a state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngagementEvent {
    /// Points were added to the ledger
    PointsAwarded { kind: ActivityKind, points: u32 },
    /// The streak grew by a day
    StreakExtended { streak: u32 },
    /// The streak was broken and restarted
    StreakReset { streak: u32 },
    /// The streak landed on a bonus tier
    StreakBonus { streak: u32, bonus: u32 },
    /// Total points crossed a level threshold
    LevelUp { from: u32, to: u32 },
    /// A permanent badge was unlocked
    AchievementUnlocked {
        id: String,
        title: String,
        points: u32,
    },
    /// A challenge was started
    ChallengeStarted { id: String, title: String },
    /// The active challenge was completed
    ChallengeCompleted { id: String, savings: f64 },
}

impl EngagementEvent {
    /// One-line human-readable rendering for logs and the CLI.
    pub fn to_notice_line(&self) -> String {
        match self {
            Self::PointsAwarded { kind, points } => {
                format!("+{} points ({})", points, kind.describe())
            }
            Self::StreakExtended { streak } => format!("Streak extended to {} days", streak),
            Self::StreakReset { streak } => format!("Streak reset to {} day", streak),
            Self::StreakBonus { streak, bonus } => {
                format!("{}-day streak bonus: +{} points", streak, bonus)
            }
            Self::LevelUp { from, to } => format!("Level up! {} -> {}", from, to),
            Self::AchievementUnlocked { title, points, .. } => {
                format!("Achievement unlocked: {} (+{} pts)", title, points)
            }
            Self::ChallengeStarted { title, .. } => format!("Challenge started: {}", title),
            Self::ChallengeCompleted { id, savings } => {
                format!("Challenge {} completed, ~${:.0} saved", id, savings)
            }
        }
    }
}
