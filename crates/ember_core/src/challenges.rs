//! Challenge Tracker
//!
//! Time-boxed engagement tasks. At most one challenge is active per user at
//! any time; completing it pays the fixed completion bonus through the
//! points ledger and moves it to the completed list.

use crate::activity::{award_points, ActivityKind, PointsTransaction};
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Challenge difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Spending area a challenge targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeCategory {
    Savings,
    Subscriptions,
    Credit,
    Spending,
}

/// A challenge definition from the fixed catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_days: u32,
    pub potential_savings: f64,
    pub difficulty: Difficulty,
    pub category: ChallengeCategory,
}

/// The single in-flight challenge for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveChallenge {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub started_at: DateTime<Utc>,
    pub progress_days: u32,
}

impl ActiveChallenge {
    /// Elapsed calendar days since start, clamped to the challenge duration.
    pub fn progress_as_of(&self, now: DateTime<Utc>) -> u32 {
        let elapsed = (now.date_naive() - self.started_at.date_naive()).num_days();
        (elapsed.max(0) as u32).min(self.challenge.duration_days)
    }
}

/// Record of a finished challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedChallenge {
    pub id: String,
    pub title: String,
    pub completed_at: DateTime<Utc>,
    pub savings: f64,
}

/// Start a challenge. Rejected while another challenge is active; the
/// caller must complete or clear the existing one first.
pub fn start_challenge(
    active: Option<&ActiveChallenge>,
    challenge: &Challenge,
    now: DateTime<Utc>,
) -> Result<ActiveChallenge, EngineError> {
    if let Some(current) = active {
        return Err(EngineError::ChallengeAlreadyActive(
            current.challenge.id.clone(),
        ));
    }
    Ok(ActiveChallenge {
        challenge: challenge.clone(),
        started_at: now,
        progress_days: 0,
    })
}

/// Complete the active challenge: yields the completion record plus the
/// fixed bonus transaction. With no active challenge this is a rejected
/// result, never a crash, and nothing is awarded.
pub fn complete_challenge(
    active: Option<&ActiveChallenge>,
    now: DateTime<Utc>,
) -> Result<(CompletedChallenge, PointsTransaction), EngineError> {
    let active = active.ok_or(EngineError::NoActiveChallenge)?;
    let completed = CompletedChallenge {
        id: active.challenge.id.clone(),
        title: active.challenge.title.clone(),
        completed_at: now,
        savings: active.challenge.potential_savings,
    };
    let bonus = award_points(ActivityKind::ChallengeCompleted, None, now);
    Ok((completed, bonus))
}

/// The fixed catalog of challenges the dashboard offers.
pub fn challenge_catalog() -> Vec<Challenge> {
    vec![
        Challenge {
            id: "subscription-audit".into(),
            title: "Subscription Audit".into(),
            description: "Review every recurring charge and cancel the ones you don't use".into(),
            duration_days: 3,
            potential_savings: 25.0,
            difficulty: Difficulty::Easy,
            category: ChallengeCategory::Subscriptions,
        },
        Challenge {
            id: "cash-only-weekend".into(),
            title: "Cash-Only Weekend".into(),
            description: "Spend only cash you withdrew in advance for one weekend".into(),
            duration_days: 2,
            potential_savings: 40.0,
            difficulty: Difficulty::Easy,
            category: ChallengeCategory::Spending,
        },
        Challenge {
            id: "no-eat-out-week".into(),
            title: "No Eating Out".into(),
            description: "Cook every meal at home for a full week".into(),
            duration_days: 7,
            potential_savings: 60.0,
            difficulty: Difficulty::Medium,
            category: ChallengeCategory::Spending,
        },
        Challenge {
            id: "pay-down-sprint".into(),
            title: "Pay-Down Sprint".into(),
            description: "Put every spare dollar against your highest-rate card for two weeks"
                .into(),
            duration_days: 14,
            potential_savings: 35.0,
            difficulty: Difficulty::Hard,
            category: ChallengeCategory::Credit,
        },
        Challenge {
            id: "auto-save-month".into(),
            title: "Automatic Savings Month".into(),
            description: "Move a fixed amount to savings on every payday for a month".into(),
            duration_days: 30,
            potential_savings: 120.0,
            difficulty: Difficulty::Hard,
            category: ChallengeCategory::Savings,
        },
    ]
}

/// Look up a catalog challenge by id.
pub fn find_challenge(id: &str) -> Result<Challenge, EngineError> {
    challenge_catalog()
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| EngineError::UnknownChallenge(id.to_string()))
}
