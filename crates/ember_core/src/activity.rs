//! Activity Ledger
//!
//! Tracked action types and the append-only points ledger.
//!
//! ## Point Values
//!
//! | Activity                | Base Points | Notes                       |
//! |-------------------------|-------------|-----------------------------|
//! | RecommendationCompleted | 25          |                             |
//! | LessonCompleted         | 15          |                             |
//! | CalculatorUsed          | 10          |                             |
//! | DashboardReviewed       | 5           |                             |
//! | ChallengeCompleted      | 50          | fixed completion bonus      |
//! | StreakBonus             | 0           | value comes from the tier   |
//! | MilestoneBonus          | 0           | value comes from the template |
//!
//! Kinds whose value is contextual carry a base of 0 and expect an explicit
//! point override; without one the award is recorded at zero points.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tracked action types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// User completed a recommendation from the review queue
    RecommendationCompleted,
    /// User finished an education lesson
    LessonCompleted,
    /// User ran one of the financial calculators
    CalculatorUsed,
    /// User reviewed their dashboard
    DashboardReviewed,
    /// User completed the active challenge
    ChallengeCompleted,
    /// Streak reached a bonus tier
    StreakBonus,
    /// A milestone paid out a one-off bonus
    MilestoneBonus,
}

impl ActivityKind {
    /// Base point value for this activity.
    pub fn base_points(&self) -> u32 {
        match self {
            Self::RecommendationCompleted => 25,
            Self::LessonCompleted => 15,
            Self::CalculatorUsed => 10,
            Self::DashboardReviewed => 5,
            Self::ChallengeCompleted => 50,

            // Contextual kinds: the caller supplies the value
            Self::StreakBonus => 0,
            Self::MilestoneBonus => 0,
        }
    }

    /// Generated ledger description for this activity.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::RecommendationCompleted => "Completed a recommendation",
            Self::LessonCompleted => "Finished a lesson",
            Self::CalculatorUsed => "Used a calculator",
            Self::DashboardReviewed => "Reviewed the dashboard",
            Self::ChallengeCompleted => "Completed a challenge",
            Self::StreakBonus => "Streak bonus",
            Self::MilestoneBonus => "Milestone bonus",
        }
    }

    /// Stable wire label, matching the serde representation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RecommendationCompleted => "recommendation_completed",
            Self::LessonCompleted => "lesson_completed",
            Self::CalculatorUsed => "calculator_used",
            Self::DashboardReviewed => "dashboard_reviewed",
            Self::ChallengeCompleted => "challenge_completed",
            Self::StreakBonus => "streak_bonus",
            Self::MilestoneBonus => "milestone_bonus",
        }
    }

    /// Parse a wire label. Unrecognized labels map to `None`; the
    /// enumeration itself is closed.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "recommendation_completed" | "recommendation_complete" => {
                Some(Self::RecommendationCompleted)
            }
            "lesson_completed" | "lesson_complete" => Some(Self::LessonCompleted),
            "calculator_used" | "calculator_use" => Some(Self::CalculatorUsed),
            "dashboard_reviewed" => Some(Self::DashboardReviewed),
            "challenge_completed" | "challenge_complete" => Some(Self::ChallengeCompleted),
            "streak_bonus" => Some(Self::StreakBonus),
            "milestone_bonus" => Some(Self::MilestoneBonus),
            _ => None,
        }
    }
}

/// A single point-earning event. Immutable once created; the ledger is the
/// ordered sequence of all transactions for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsTransaction {
    /// What kind of activity earned the points
    pub kind: ActivityKind,
    /// Points awarded (never negative)
    pub points: u32,
    /// When the activity happened
    pub timestamp: DateTime<Utc>,
    /// Generated description for display
    pub description: String,
}

/// Create a new transaction for an activity.
///
/// `custom_points` overrides the base table when present.
pub fn award_points(
    kind: ActivityKind,
    custom_points: Option<u32>,
    at: DateTime<Utc>,
) -> PointsTransaction {
    PointsTransaction {
        kind,
        points: custom_points.unwrap_or_else(|| kind.base_points()),
        timestamp: at,
        description: kind.describe().to_string(),
    }
}

/// Sum of all points in the ledger. Empty ledger sums to 0.
pub fn total_points(transactions: &[PointsTransaction]) -> u64 {
    transactions.iter().map(|t| t.points as u64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_points_table() {
        assert_eq!(ActivityKind::RecommendationCompleted.base_points(), 25);
        assert_eq!(ActivityKind::CalculatorUsed.base_points(), 10);
        assert_eq!(ActivityKind::ChallengeCompleted.base_points(), 50);
        assert_eq!(ActivityKind::StreakBonus.base_points(), 0);
    }

    #[test]
    fn test_award_uses_base_points() {
        let tx = award_points(ActivityKind::CalculatorUsed, None, Utc::now());
        assert_eq!(tx.points, 10);
        assert_eq!(tx.description, "Used a calculator");
    }

    #[test]
    fn test_award_respects_override() {
        let tx = award_points(ActivityKind::StreakBonus, Some(25), Utc::now());
        assert_eq!(tx.points, 25);
    }

    #[test]
    fn test_contextual_kind_defaults_to_zero() {
        let tx = award_points(ActivityKind::MilestoneBonus, None, Utc::now());
        assert_eq!(tx.points, 0);
    }

    #[test]
    fn test_total_points_empty() {
        assert_eq!(total_points(&[]), 0);
    }

    #[test]
    fn test_total_points_sums() {
        let now = Utc::now();
        let txs = vec![
            award_points(ActivityKind::RecommendationCompleted, None, now),
            award_points(ActivityKind::CalculatorUsed, None, now),
            award_points(ActivityKind::StreakBonus, Some(5), now),
        ];
        assert_eq!(total_points(&txs), 40);
    }

    #[test]
    fn test_label_round_trip() {
        for kind in [
            ActivityKind::RecommendationCompleted,
            ActivityKind::LessonCompleted,
            ActivityKind::CalculatorUsed,
            ActivityKind::DashboardReviewed,
            ActivityKind::ChallengeCompleted,
            ActivityKind::StreakBonus,
            ActivityKind::MilestoneBonus,
        ] {
            assert_eq!(ActivityKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(ActivityKind::from_label("mystery_action"), None);
    }
}
