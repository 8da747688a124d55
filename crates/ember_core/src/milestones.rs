//! Milestone Evaluator
//!
//! Persona-scoped milestones evaluated against the current signals
//! snapshot. Nothing here is persisted: every evaluation recomputes the
//! `achieved` flags from scratch, so a signals update is reflected
//! immediately.
//!
//! The persona label and the snapshot both arrive from the upstream
//! analytics pipeline. Label parsing is tolerant: an unrecognized label maps
//! to `Persona::Unclassified`, whose template list is empty.

use serde::{Deserialize, Serialize};

/// Dominant financial-behavior pattern for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Carries high credit utilization
    HighUtilization,
    /// Actively building savings
    SavingsBuilder,
    /// Heavy recurring-subscription spend
    SubscriptionHeavy,
    /// Irregular income pattern
    VariableIncome,
    /// No dominant pattern detected upstream
    Unclassified,
}

impl Persona {
    /// Tolerant label parsing: anything unrecognized is `Unclassified`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "high_utilization" => Self::HighUtilization,
            "savings_builder" => Self::SavingsBuilder,
            "subscription_heavy" => Self::SubscriptionHeavy,
            "variable_income" => Self::VariableIncome,
            _ => Self::Unclassified,
        }
    }

    /// Stable wire label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighUtilization => "high_utilization",
            Self::SavingsBuilder => "savings_builder",
            Self::SubscriptionHeavy => "subscription_heavy",
            Self::VariableIncome => "variable_income",
            Self::Unclassified => "unclassified",
        }
    }
}

/// Credit metrics from the upstream pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditSignals {
    /// Revolving credit utilization, percent
    #[serde(default)]
    pub utilization_pct: f64,
    /// Share of payments made on time, percent
    #[serde(default)]
    pub on_time_payment_pct: f64,
    /// Open revolving accounts
    #[serde(default)]
    pub open_accounts: u32,
}

/// Savings metrics from the upstream pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavingsSignals {
    /// Emergency fund coverage in months of expenses
    #[serde(default)]
    pub emergency_fund_months: f64,
    /// Share of monthly income saved, percent
    #[serde(default)]
    pub monthly_savings_rate_pct: f64,
}

/// Subscription metrics from the upstream pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionSignals {
    /// Active recurring subscriptions
    #[serde(default)]
    pub active_count: u32,
    /// Total monthly subscription spend
    #[serde(default)]
    pub monthly_spend: f64,
    /// Subscriptions with no usage in the observation window
    #[serde(default)]
    pub unused_count: u32,
}

/// Income metrics from the upstream pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeSignals {
    /// Month-over-month income variability, percent
    #[serde(default)]
    pub variability_pct: f64,
    /// Average monthly net income
    #[serde(default)]
    pub monthly_net: f64,
}

/// Structured behavioral metrics computed upstream. Every field defaults,
/// so a partial or missing snapshot still evaluates deterministically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalsSnapshot {
    #[serde(default)]
    pub credit: CreditSignals,
    #[serde(default)]
    pub savings: SavingsSignals,
    #[serde(default)]
    pub subscriptions: SubscriptionSignals,
    #[serde(default)]
    pub income: IncomeSignals,
}

/// A persona-scoped milestone with its evaluation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub achieved: bool,
}

/// Fixed milestone template: a named threshold predicate over the snapshot.
struct MilestoneTemplate {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    points: u32,
    achieved: fn(&SignalsSnapshot) -> bool,
}

const HIGH_UTILIZATION_MILESTONES: &[MilestoneTemplate] = &[
    MilestoneTemplate {
        id: "utilization-under-30",
        title: "Breathing Room",
        description: "Credit utilization below 30%",
        points: 50,
        achieved: |s| s.credit.utilization_pct < 30.0,
    },
    MilestoneTemplate {
        id: "utilization-under-10",
        title: "Light Touch",
        description: "Credit utilization below 10%",
        points: 75,
        achieved: |s| s.credit.utilization_pct < 10.0,
    },
    MilestoneTemplate {
        id: "on-time-95",
        title: "Reliable Payer",
        description: "At least 95% of payments on time",
        points: 40,
        achieved: |s| s.credit.on_time_payment_pct >= 95.0,
    },
];

const SAVINGS_BUILDER_MILESTONES: &[MilestoneTemplate] = &[
    MilestoneTemplate {
        id: "emergency-fund-3mo",
        title: "Safety Net",
        description: "Emergency fund covers 3 months",
        points: 50,
        achieved: |s| s.savings.emergency_fund_months >= 3.0,
    },
    MilestoneTemplate {
        id: "emergency-fund-6mo",
        title: "Fortress",
        description: "Emergency fund covers 6 months",
        points: 75,
        achieved: |s| s.savings.emergency_fund_months >= 6.0,
    },
    MilestoneTemplate {
        id: "savings-rate-10",
        title: "Steady Saver",
        description: "Saving at least 10% of income",
        points: 40,
        achieved: |s| s.savings.monthly_savings_rate_pct >= 10.0,
    },
];

const SUBSCRIPTION_HEAVY_MILESTONES: &[MilestoneTemplate] = &[
    MilestoneTemplate {
        id: "no-unused-subscriptions",
        title: "Nothing Wasted",
        description: "No unused subscriptions left",
        points: 40,
        achieved: |s| s.subscriptions.unused_count == 0,
    },
    MilestoneTemplate {
        id: "subscription-spend-50",
        title: "Trimmed Down",
        description: "Subscription spend at or below $50/month",
        points: 50,
        achieved: |s| s.subscriptions.monthly_spend <= 50.0,
    },
    MilestoneTemplate {
        id: "subscription-count-5",
        title: "Short List",
        description: "At most 5 active subscriptions",
        points: 30,
        achieved: |s| s.subscriptions.active_count <= 5,
    },
];

const VARIABLE_INCOME_MILESTONES: &[MilestoneTemplate] = &[
    MilestoneTemplate {
        id: "variability-under-25",
        title: "Smoother Months",
        description: "Income variability below 25%",
        points: 40,
        achieved: |s| s.income.variability_pct < 25.0,
    },
    MilestoneTemplate {
        id: "buffer-6mo",
        title: "Deep Buffer",
        description: "Emergency fund covers 6 months",
        points: 75,
        achieved: |s| s.savings.emergency_fund_months >= 6.0,
    },
    MilestoneTemplate {
        id: "savings-rate-15",
        title: "Feast Saver",
        description: "Saving at least 15% of income",
        points: 50,
        achieved: |s| s.savings.monthly_savings_rate_pct >= 15.0,
    },
];

fn templates_for(persona: Persona) -> &'static [MilestoneTemplate] {
    match persona {
        Persona::HighUtilization => HIGH_UTILIZATION_MILESTONES,
        Persona::SavingsBuilder => SAVINGS_BUILDER_MILESTONES,
        Persona::SubscriptionHeavy => SUBSCRIPTION_HEAVY_MILESTONES,
        Persona::VariableIncome => VARIABLE_INCOME_MILESTONES,
        Persona::Unclassified => &[],
    }
}

/// Evaluate the persona's milestone templates against a snapshot.
/// Pure; `achieved` flags are derived fresh on every call.
pub fn evaluate_milestones(persona: Persona, signals: &SignalsSnapshot) -> Vec<Milestone> {
    templates_for(persona)
        .iter()
        .map(|t| Milestone {
            id: t.id.to_string(),
            title: t.title.to_string(),
            description: t.description.to_string(),
            points: t.points,
            achieved: (t.achieved)(signals),
        })
        .collect()
}

/// Sum of points over achieved milestones only.
pub fn milestone_points(milestones: &[Milestone]) -> u64 {
    milestones
        .iter()
        .filter(|m| m.achieved)
        .map(|m| m.points as u64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_label_parsing() {
        assert_eq!(Persona::from_label("high_utilization"), Persona::HighUtilization);
        assert_eq!(Persona::from_label("High-Utilization"), Persona::HighUtilization);
        assert_eq!(Persona::from_label("savings_builder"), Persona::SavingsBuilder);
        assert_eq!(Persona::from_label("not-a-persona"), Persona::Unclassified);
        assert_eq!(Persona::from_label(""), Persona::Unclassified);
    }

    #[test]
    fn test_unclassified_has_no_milestones() {
        let signals = SignalsSnapshot::default();
        assert!(evaluate_milestones(Persona::Unclassified, &signals).is_empty());
    }

    #[test]
    fn test_high_utilization_thresholds() {
        let mut signals = SignalsSnapshot::default();
        signals.credit.utilization_pct = 22.0;
        signals.credit.on_time_payment_pct = 96.0;

        let milestones = evaluate_milestones(Persona::HighUtilization, &signals);
        assert_eq!(milestones.len(), 3);

        let by_id = |id: &str| milestones.iter().find(|m| m.id == id).unwrap();
        assert!(by_id("utilization-under-30").achieved);
        assert!(!by_id("utilization-under-10").achieved);
        assert!(by_id("on-time-95").achieved);
    }

    #[test]
    fn test_flags_follow_signal_updates() {
        let mut signals = SignalsSnapshot::default();
        signals.savings.emergency_fund_months = 1.0;

        let before = evaluate_milestones(Persona::SavingsBuilder, &signals);
        assert!(!before.iter().any(|m| m.id == "emergency-fund-3mo" && m.achieved));

        signals.savings.emergency_fund_months = 4.0;
        let after = evaluate_milestones(Persona::SavingsBuilder, &signals);
        assert!(after.iter().any(|m| m.id == "emergency-fund-3mo" && m.achieved));
    }

    #[test]
    fn test_default_snapshot_evaluates() {
        // Absent upstream data must still produce a defined result
        let signals = SignalsSnapshot::default();
        let milestones = evaluate_milestones(Persona::SubscriptionHeavy, &signals);
        assert_eq!(milestones.len(), 3);
        // Zeroed subscriptions trivially satisfy the trimming milestones
        assert!(milestones.iter().all(|m| m.achieved));
    }

    #[test]
    fn test_milestone_points_counts_achieved_only() {
        let milestones = vec![
            Milestone {
                id: "a".into(),
                title: "A".into(),
                description: String::new(),
                points: 40,
                achieved: true,
            },
            Milestone {
                id: "b".into(),
                title: "B".into(),
                description: String::new(),
                points: 75,
                achieved: false,
            },
            Milestone {
                id: "c".into(),
                title: "C".into(),
                description: String::new(),
                points: 10,
                achieved: true,
            },
        ];
        assert_eq!(milestone_points(&milestones), 50);
        assert_eq!(milestone_points(&[]), 0);
    }

    #[test]
    fn test_snapshot_tolerates_partial_json() {
        let snapshot: SignalsSnapshot =
            serde_json::from_str(r#"{"credit": {"utilization_pct": 12.5}}"#).unwrap();
        assert_eq!(snapshot.credit.utilization_pct, 12.5);
        assert_eq!(snapshot.savings.emergency_fund_months, 0.0);
        assert_eq!(snapshot.subscriptions.active_count, 0);
    }
}
