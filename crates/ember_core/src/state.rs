//! Aggregate State
//!
//! The per-user aggregate read model and the persisted blob wrapping it.
//! A user's record is created with zeroed defaults on first tracked
//! activity and is only ever mutated through the recorder.

use crate::achievements::Achievement;
use crate::activity::PointsTransaction;
use crate::challenges::{ActiveChallenge, CompletedChallenge};
use crate::streak::StreakState;
use serde::{Deserialize, Serialize};

/// Aggregate gamification read model for one user. Consumed read-only by
/// presentation layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationData {
    /// Current consecutive-day streak
    #[serde(default)]
    pub streak: u32,
    /// Current level (derived from total_points)
    #[serde(default = "default_level")]
    pub level: u32,
    /// XP earned within the current level
    #[serde(default)]
    pub level_progress: u64,
    /// XP span of the current level
    #[serde(default = "default_level_max")]
    pub level_max: u64,
    /// Sum of every ledger transaction
    #[serde(default)]
    pub total_points: u64,
    /// Derived sum of currently-achieved milestone points
    #[serde(default)]
    pub milestone_points: u64,
    /// Permanently unlocked badges, unique by id
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    /// The single in-flight challenge, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_challenge: Option<ActiveChallenge>,
    /// Finished challenges, oldest first
    #[serde(default)]
    pub completed_challenges: Vec<CompletedChallenge>,
    /// Recommendations the user has completed
    #[serde(default)]
    pub completed_recommendations: u32,
}

fn default_level() -> u32 {
    1
}

fn default_level_max() -> u64 {
    100
}

impl Default for GamificationData {
    fn default() -> Self {
        Self {
            streak: 0,
            level: default_level(),
            level_progress: 0,
            level_max: default_level_max(),
            total_points: 0,
            milestone_points: 0,
            achievements: Vec::new(),
            active_challenge: None,
            completed_challenges: Vec::new(),
            completed_recommendations: 0,
        }
    }
}

/// The serialized per-user record: streak state, the full transaction
/// ledger, and the aggregate, persisted as a single blob keyed by user id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub streak: StreakState,
    #[serde(default)]
    pub transactions: Vec<PointsTransaction>,
    #[serde(default)]
    pub data: GamificationData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_defaults() {
        let data = GamificationData::default();
        assert_eq!(data.streak, 0);
        assert_eq!(data.level, 1);
        assert_eq!(data.total_points, 0);
        assert!(data.achievements.is_empty());
        assert!(data.active_challenge.is_none());
    }

    #[test]
    fn test_partial_blob_fills_defaults() {
        // A truncated record from an older build must still load
        let state: PersistedState =
            serde_json::from_str(r#"{"data": {"total_points": 75}}"#).unwrap();
        assert_eq!(state.data.total_points, 75);
        assert_eq!(state.data.level, 1);
        assert!(state.transactions.is_empty());
        assert_eq!(state.streak.streak, 0);
    }

    #[test]
    fn test_round_trip() {
        let state = PersistedState::default();
        let json = serde_json::to_string(&state).unwrap();
        let back: PersistedState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data.level, 1);
    }
}
