//! Activity Recorder
//!
//! The orchestrator and only mutator. `apply_activity` is the pure
//! transition over explicit state; `ActivityRecorder` wraps it with the
//! injected store: load (defaults on missing or corrupt state), apply,
//! best-effort save. The in-memory result is authoritative for the session
//! whether or not the write landed.

use crate::achievements::{check_achievements, AchievementStats};
use crate::activity::{award_points, total_points, ActivityKind};
use crate::challenges::{self, Challenge};
use crate::error::EngineError;
use crate::events::EngagementEvent;
use crate::levels::{check_level_up, level_info, LevelInfo};
use crate::milestones::{evaluate_milestones, milestone_points, Milestone, Persona, SignalsSnapshot};
use crate::state::{GamificationData, PersistedState};
use crate::store::StateStore;
use crate::streak::{crossed_bonus_tier, streak_bonus, update_streak};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// One tracked action from the event layer.
#[derive(Debug, Clone)]
pub struct TrackedAction {
    pub kind: ActivityKind,
    /// Explicit point override; falls back to the kind's base value
    pub points_override: Option<u32>,
    /// When the action happened
    pub at: DateTime<Utc>,
}

impl TrackedAction {
    pub fn new(kind: ActivityKind, at: DateTime<Utc>) -> Self {
        Self {
            kind,
            points_override: None,
            at,
        }
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points_override = Some(points);
        self
    }
}

/// Result of one recorded action: the fresh read model plus everything a
/// presentation layer reacts to.
#[derive(Debug, Clone)]
pub struct ActivityOutcome {
    /// The new aggregate read model
    pub data: GamificationData,
    /// Milestones evaluated against the supplied snapshot
    pub milestones: Vec<Milestone>,
    /// Level detail for the new total
    pub level: LevelInfo,
    /// What happened, for the effect layer
    pub events: Vec<EngagementEvent>,
    /// Whether the best-effort persistence write succeeded
    pub persisted: bool,
}

/// Pure state transition for one tracked action.
///
/// Awards points, advances the streak (plus the tier bonus when a boundary
/// is hit), recomputes level, milestones and achievements, and assembles
/// the new aggregate. No side effects; safe to re-run against stale state.
pub fn apply_activity(
    state: &PersistedState,
    action: &TrackedAction,
    persona: Persona,
    signals: &SignalsSnapshot,
) -> (PersistedState, ActivityOutcome) {
    let mut next = state.clone();
    let mut events = Vec::new();
    let prev_total = total_points(&state.transactions);

    // 1. Points. A challenge completion routes through the tracker so the
    //    active challenge moves to the completed list with its bonus; with
    //    no active challenge there is nothing to award.
    if action.kind == ActivityKind::ChallengeCompleted {
        if let Ok((done, bonus)) =
            challenges::complete_challenge(next.data.active_challenge.as_ref(), action.at)
        {
            events.push(EngagementEvent::PointsAwarded {
                kind: action.kind,
                points: bonus.points,
            });
            events.push(EngagementEvent::ChallengeCompleted {
                id: done.id.clone(),
                savings: done.savings,
            });
            next.transactions.push(bonus);
            next.data.completed_challenges.push(done);
            next.data.active_challenge = None;
        }
    } else {
        let tx = award_points(action.kind, action.points_override, action.at);
        events.push(EngagementEvent::PointsAwarded {
            kind: action.kind,
            points: tx.points,
        });
        next.transactions.push(tx);
    }

    // 2. Streak, with a one-off bonus exactly at each tier boundary
    let prev_streak = next.streak.streak;
    next.streak = update_streak(&next.streak, action.at);
    let streak = next.streak.streak;
    if streak > prev_streak {
        events.push(EngagementEvent::StreakExtended { streak });
        if crossed_bonus_tier(streak) {
            let bonus = streak_bonus(streak);
            events.push(EngagementEvent::StreakBonus { streak, bonus });
            next.transactions
                .push(award_points(ActivityKind::StreakBonus, Some(bonus), action.at));
        }
    } else if streak < prev_streak {
        events.push(EngagementEvent::StreakReset { streak });
    }

    // 3. Level from the new ledger total
    let new_total = total_points(&next.transactions);
    let info = level_info(new_total);
    if check_level_up(prev_total, new_total) {
        events.push(EngagementEvent::LevelUp {
            from: level_info(prev_total).level,
            to: info.level,
        });
    }

    // 4. Milestones, fresh from the snapshot
    let milestones = evaluate_milestones(persona, signals);
    let m_points = milestone_points(&milestones);

    // 5. Achievements from the freshly combined stats
    if action.kind == ActivityKind::RecommendationCompleted {
        next.data.completed_recommendations += 1;
    }
    let stats = AchievementStats {
        streak,
        total_points: new_total,
        level: info.level,
        completed_recommendations: next.data.completed_recommendations,
        completed_challenges: next.data.completed_challenges.len() as u32,
    };
    let before = next.data.achievements.len();
    next.data.achievements = check_achievements(&next.data.achievements, &stats, action.at);
    for unlocked in &next.data.achievements[before..] {
        events.push(EngagementEvent::AchievementUnlocked {
            id: unlocked.id.clone(),
            title: unlocked.title.clone(),
            points: unlocked.points,
        });
    }

    // 6. Assemble the aggregate
    next.data.streak = streak;
    next.data.level = info.level;
    next.data.level_progress = info.progress;
    next.data.level_max = info.xp_for_next_level - info.xp_for_current_level;
    next.data.total_points = new_total;
    next.data.milestone_points = m_points;

    let outcome = ActivityOutcome {
        data: next.data.clone(),
        milestones,
        level: info,
        events,
        persisted: false,
    };
    (next, outcome)
}

/// Per-user orchestration service over an injected store.
pub struct ActivityRecorder<S: StateStore> {
    store: S,
    user_id: String,
}

impl<S: StateStore> ActivityRecorder<S> {
    pub fn new(store: S, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Load the user's state, falling back to zeroed defaults when the
    /// record is missing or the store fails.
    pub fn load_state(&self) -> PersistedState {
        match self.store.load(&self.user_id) {
            Ok(Some(state)) => state,
            Ok(None) => PersistedState::default(),
            Err(e) => {
                warn!(user = %self.user_id, error = %e, "state load failed, starting from defaults");
                PersistedState::default()
            }
        }
    }

    /// Record one tracked action: load, apply the pure transition, persist
    /// best-effort. The returned outcome is authoritative regardless of
    /// whether the write landed.
    pub fn record(
        &self,
        action: TrackedAction,
        persona: Persona,
        signals: &SignalsSnapshot,
    ) -> ActivityOutcome {
        let state = self.load_state();
        let (next, mut outcome) = apply_activity(&state, &action, persona, signals);
        debug!(
            user = %self.user_id,
            kind = action.kind.label(),
            total = outcome.data.total_points,
            streak = outcome.data.streak,
            "recorded activity"
        );
        outcome.persisted = self.persist(&next);
        outcome
    }

    /// Start a catalog challenge. Rejected while one is active.
    pub fn start_challenge(
        &self,
        challenge: &Challenge,
        now: DateTime<Utc>,
    ) -> Result<ActivityOutcome, EngineError> {
        let mut state = self.load_state();
        let active =
            challenges::start_challenge(state.data.active_challenge.as_ref(), challenge, now)?;
        let events = vec![EngagementEvent::ChallengeStarted {
            id: active.challenge.id.clone(),
            title: active.challenge.title.clone(),
        }];
        state.data.active_challenge = Some(active);

        let persisted = self.persist(&state);
        let total = total_points(&state.transactions);
        Ok(ActivityOutcome {
            data: state.data.clone(),
            milestones: Vec::new(),
            level: level_info(total),
            events,
            persisted,
        })
    }

    /// Complete the active challenge as a tracked action. Rejected, with
    /// no state change, when nothing is active.
    pub fn complete_challenge(
        &self,
        persona: Persona,
        signals: &SignalsSnapshot,
        now: DateTime<Utc>,
    ) -> Result<ActivityOutcome, EngineError> {
        let state = self.load_state();
        if state.data.active_challenge.is_none() {
            return Err(EngineError::NoActiveChallenge);
        }
        let action = TrackedAction::new(ActivityKind::ChallengeCompleted, now);
        let (next, mut outcome) = apply_activity(&state, &action, persona, signals);
        outcome.persisted = self.persist(&next);
        Ok(outcome)
    }

    fn persist(&self, state: &PersistedState) -> bool {
        match self.store.save(&self.user_id, state) {
            Ok(()) => true,
            Err(e) => {
                warn!(user = %self.user_id, error = %e, "state save failed, continuing in memory");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, d, h, 0, 0).unwrap()
    }

    fn recorder() -> ActivityRecorder<MemoryStore> {
        ActivityRecorder::new(MemoryStore::new(), "user-1")
    }

    #[test]
    fn test_first_activity_creates_state() {
        let rec = recorder();
        let outcome = rec.record(
            TrackedAction::new(ActivityKind::CalculatorUsed, at(1, 9)),
            Persona::Unclassified,
            &SignalsSnapshot::default(),
        );
        assert_eq!(outcome.data.total_points, 10);
        assert_eq!(outcome.data.streak, 1);
        assert_eq!(outcome.data.level, 1);
        assert!(outcome.persisted);
    }

    #[test]
    fn test_points_override() {
        let rec = recorder();
        let outcome = rec.record(
            TrackedAction::new(ActivityKind::CalculatorUsed, at(1, 9)).with_points(99),
            Persona::Unclassified,
            &SignalsSnapshot::default(),
        );
        assert_eq!(outcome.data.total_points, 99);
    }

    #[test]
    fn test_three_day_streak_awards_tier_bonus_once() {
        let rec = recorder();
        let signals = SignalsSnapshot::default();
        rec.record(
            TrackedAction::new(ActivityKind::DashboardReviewed, at(1, 9)),
            Persona::Unclassified,
            &signals,
        );
        rec.record(
            TrackedAction::new(ActivityKind::DashboardReviewed, at(2, 9)),
            Persona::Unclassified,
            &signals,
        );
        let third = rec.record(
            TrackedAction::new(ActivityKind::DashboardReviewed, at(3, 9)),
            Persona::Unclassified,
            &signals,
        );
        assert_eq!(third.data.streak, 3);
        // 3 x 5 activity points + 5 tier bonus
        assert_eq!(third.data.total_points, 20);
        assert!(third
            .events
            .iter()
            .any(|e| matches!(e, EngagementEvent::StreakBonus { streak: 3, bonus: 5 })));

        // Same-day follow-up must not re-award the tier
        let again = rec.record(
            TrackedAction::new(ActivityKind::DashboardReviewed, at(3, 20)),
            Persona::Unclassified,
            &signals,
        );
        assert_eq!(again.data.streak, 3);
        assert!(!again
            .events
            .iter()
            .any(|e| matches!(e, EngagementEvent::StreakBonus { .. })));
    }

    #[test]
    fn test_level_up_event() {
        let rec = recorder();
        let outcome = rec.record(
            TrackedAction::new(ActivityKind::RecommendationCompleted, at(1, 9)).with_points(120),
            Persona::Unclassified,
            &SignalsSnapshot::default(),
        );
        assert_eq!(outcome.data.level, 2);
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, EngagementEvent::LevelUp { from: 1, to: 2 })));
    }

    #[test]
    fn test_milestone_points_in_read_model() {
        let rec = recorder();
        let mut signals = SignalsSnapshot::default();
        signals.savings.emergency_fund_months = 4.0;
        let outcome = rec.record(
            TrackedAction::new(ActivityKind::DashboardReviewed, at(1, 9)),
            Persona::SavingsBuilder,
            &signals,
        );
        // Safety Net (50) achieved; ledger untouched by milestone points
        assert_eq!(outcome.data.milestone_points, 50);
        assert_eq!(outcome.data.total_points, 5);
    }

    #[test]
    fn test_challenge_lifecycle_through_recorder() {
        let rec = recorder();
        let signals = SignalsSnapshot::default();
        let challenge = challenges::find_challenge("subscription-audit").unwrap();

        rec.start_challenge(&challenge, at(1, 9)).unwrap();
        let err = rec.start_challenge(&challenge, at(1, 10)).unwrap_err();
        assert!(matches!(err, EngineError::ChallengeAlreadyActive(_)));

        let outcome = rec
            .complete_challenge(Persona::Unclassified, &signals, at(2, 9))
            .unwrap();
        assert!(outcome.data.active_challenge.is_none());
        assert_eq!(outcome.data.completed_challenges.len(), 1);
        // 50 completion bonus, and first-challenge badge unlocked
        assert!(outcome.data.total_points >= 50);
        assert!(outcome
            .data
            .achievements
            .iter()
            .any(|a| a.id == "first-challenge"));
    }

    #[test]
    fn test_complete_without_active_mutates_nothing() {
        let rec = recorder();
        let signals = SignalsSnapshot::default();
        let err = rec
            .complete_challenge(Persona::Unclassified, &signals, at(1, 9))
            .unwrap_err();
        assert!(matches!(err, EngineError::NoActiveChallenge));

        let state = rec.load_state();
        assert!(state.data.completed_challenges.is_empty());
        assert_eq!(total_points(&state.transactions), 0);
    }

    #[test]
    fn test_apply_is_pure() {
        let state = PersistedState::default();
        let action = TrackedAction::new(ActivityKind::LessonCompleted, at(1, 9));
        let signals = SignalsSnapshot::default();
        let (a, _) = apply_activity(&state, &action, Persona::Unclassified, &signals);
        let (b, _) = apply_activity(&state, &action, Persona::Unclassified, &signals);
        assert_eq!(total_points(&a.transactions), total_points(&b.transactions));
        assert_eq!(state.transactions.len(), 0);
    }
}
