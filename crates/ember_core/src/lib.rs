//! Ember Core - Engagement engine for the Ember dashboard
//!
//! Streaks, points, levels, milestones, achievements and challenges.
//! Every state transition is a pure function over explicit state;
//! `ActivityRecorder` is the only mutator and persistence sits behind
//! the injected `StateStore` trait.

pub mod achievements;
pub mod activity;
pub mod challenges;
pub mod config;
pub mod error;
pub mod events;
pub mod levels;
pub mod milestones;
pub mod recorder;
pub mod state;
pub mod store;
pub mod streak;

pub use achievements::{check_achievements, Achievement, AchievementStats};
pub use activity::{award_points, total_points, ActivityKind, PointsTransaction};
pub use challenges::{
    challenge_catalog, complete_challenge, find_challenge, start_challenge, ActiveChallenge,
    Challenge, ChallengeCategory, CompletedChallenge, Difficulty,
};
pub use config::{EngineConfig, StoreBackend};
pub use error::EngineError;
pub use events::EngagementEvent;
pub use levels::{check_level_up, level_info, LevelInfo};
pub use milestones::{evaluate_milestones, milestone_points, Milestone, Persona, SignalsSnapshot};
pub use recorder::{apply_activity, ActivityOutcome, ActivityRecorder, TrackedAction};
pub use state::{GamificationData, PersistedState};
pub use store::{JsonFileStore, MemoryStore, SqliteStore, StateStore};
pub use streak::{crossed_bonus_tier, streak_bonus, update_streak, StreakState};
