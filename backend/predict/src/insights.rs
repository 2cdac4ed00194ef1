//! Dashboard insights derived from bulk debt and call data by fixed rules.

use chrono::{DateTime, Utc};
use collectiq_core::{CallRecord, DebtRecord, DebtStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// More than this many high-risk accounts raises a risk insight.
const HIGH_RISK_ACCOUNT_LIMIT: usize = 5;
const HIGH_SUCCESS_RATE: f64 = 0.6;
const LOW_SUCCESS_RATE: f64 = 0.3;
const MIN_ENGAGED_ACCOUNTS: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Trend,
    Opportunity,
    Risk,
    Anomaly,
}

impl InsightCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            InsightCategory::Trend => "trend",
            InsightCategory::Opportunity => "opportunity",
            InsightCategory::Risk => "risk",
            InsightCategory::Anomaly => "anomaly",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: Uuid,
    pub category: InsightCategory,
    pub title: String,
    pub description: String,
    pub impact: ImpactLevel,
    pub action_required: bool,
    pub recommended_actions: Vec<String>,
    pub confidence: f64,
    pub generated_at: DateTime<Utc>,
}

impl Insight {
    fn new(
        category: InsightCategory,
        title: String,
        description: String,
        impact: ImpactLevel,
        confidence: f64,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            title,
            description,
            impact,
            action_required: false,
            recommended_actions: Vec::new(),
            confidence,
            generated_at,
        }
    }

    fn requiring_action(mut self, actions: &[&str]) -> Self {
        self.action_required = true;
        self.recommended_actions = actions.iter().map(|a| a.to_string()).collect();
        self
    }

    fn suggesting(mut self, actions: &[&str]) -> Self {
        self.recommended_actions = actions.iter().map(|a| a.to_string()).collect();
        self
    }
}

/// Share of calls that ended successfully, or `None` when there were no calls.
pub fn call_success_rate(calls: &[CallRecord]) -> Option<f64> {
    if calls.is_empty() {
        return None;
    }
    let successful = calls.iter().filter(|c| c.is_successful()).count();
    Some(successful as f64 / calls.len() as f64)
}

/// Emit zero to three insights from the given debts and calls.
pub fn generate_insights(
    debts: &[DebtRecord],
    calls: &[CallRecord],
    now: DateTime<Utc>,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    let high_risk = debts
        .iter()
        .filter(|d| d.broken_promises > 2 && d.days_overdue > 90)
        .count();
    if high_risk > HIGH_RISK_ACCOUNT_LIMIT {
        insights.push(
            Insight::new(
                InsightCategory::Risk,
                "High-risk accounts accumulating".to_string(),
                format!(
                    "{high_risk} accounts are over 90 days overdue with more than two broken promises"
                ),
                ImpactLevel::High,
                0.85,
                now,
            )
            .requiring_action(&[
                "Move these accounts to the settlement queue",
                "Assign a senior negotiator to the top balances",
            ]),
        );
    }

    match call_success_rate(calls) {
        Some(rate) if rate >= HIGH_SUCCESS_RATE => insights.push(
            Insight::new(
                InsightCategory::Trend,
                "Call success rate is strong".to_string(),
                format!(
                    "{:.0}% of {} calls reached a positive outcome",
                    rate * 100.0,
                    calls.len()
                ),
                ImpactLevel::Medium,
                0.78,
                now,
            )
            .suggesting(&["Increase call volume in the current time windows"]),
        ),
        Some(rate) if rate < LOW_SUCCESS_RATE => insights.push(
            Insight::new(
                InsightCategory::Anomaly,
                "Call success rate is unusually low".to_string(),
                format!(
                    "Only {:.0}% of {} calls reached a positive outcome",
                    rate * 100.0,
                    calls.len()
                ),
                ImpactLevel::High,
                0.72,
                now,
            )
            .requiring_action(&[
                "Review call scripts for the latest campaign",
                "Shift calls toward the recommended contact windows",
            ]),
        ),
        _ => {}
    }

    let engaged = debts
        .iter()
        .filter(|d| {
            d.status == DebtStatus::Active && d.recent_successful_calls > 0 && d.days_overdue <= 30
        })
        .count();
    if engaged >= MIN_ENGAGED_ACCOUNTS {
        insights.push(
            Insight::new(
                InsightCategory::Opportunity,
                "Engaged accounts ready for payment plans".to_string(),
                format!("{engaged} recently reached accounts are less than a month overdue"),
                ImpactLevel::Medium,
                0.8,
                now,
            )
            .suggesting(&["Offer structured payment plans to these accounts this week"]),
        );
    }

    debug!(count = insights.len(), debts = debts.len(), calls = calls.len(), "Generated insights");
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use collectiq_core::CallOutcome;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 10, 8, 0, 0).unwrap()
    }

    fn calls(successful: usize, failed: usize) -> Vec<CallRecord> {
        let mk = |i: usize, outcome| CallRecord {
            id: format!("c{i}"),
            debt_id: "d".to_string(),
            started_at: now(),
            duration_secs: 30,
            outcome,
        };
        (0..successful)
            .map(|i| mk(i, CallOutcome::Successful))
            .chain((0..failed).map(|i| mk(successful + i, CallOutcome::NoAnswer)))
            .collect()
    }

    #[test]
    fn test_no_data_no_insights() {
        assert!(generate_insights(&[], &[], now()).is_empty());
    }

    #[test]
    fn test_empty_calls_do_not_divide_by_zero() {
        assert_eq!(call_success_rate(&[]), None);
        let debts = vec![DebtRecord::new("d", 100.0)];
        let insights = generate_insights(&debts, &[], now());
        assert!(insights.iter().all(|i| i.category != InsightCategory::Trend));
        assert!(insights.iter().all(|i| i.category != InsightCategory::Anomaly));
    }

    #[test]
    fn test_risk_insight_needs_more_than_five() {
        let risky = |i: usize| {
            DebtRecord::new(format!("r{i}"), 1000.0)
                .with_days_overdue(120)
                .with_broken_promises(3)
        };
        let five: Vec<_> = (0..5).map(risky).collect();
        assert!(generate_insights(&five, &[], now()).is_empty());

        let six: Vec<_> = (0..6).map(risky).collect();
        let insights = generate_insights(&six, &[], now());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].category, InsightCategory::Risk);
        assert!(insights[0].action_required);
        assert!(insights[0].description.starts_with("6 accounts"));
    }

    #[test]
    fn test_success_rate_trend_and_anomaly() {
        let trend = generate_insights(&[], &calls(7, 3), now());
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].category, InsightCategory::Trend);
        assert!(trend[0].description.contains("70%"));

        let anomaly = generate_insights(&[], &calls(1, 9), now());
        assert_eq!(anomaly[0].category, InsightCategory::Anomaly);
        assert_eq!(anomaly[0].impact, ImpactLevel::High);

        assert!(generate_insights(&[], &calls(4, 6), now()).is_empty());
    }

    #[test]
    fn test_all_three_rules_fire() {
        let mut debts: Vec<_> = (0..6)
            .map(|i| {
                DebtRecord::new(format!("r{i}"), 1000.0)
                    .with_days_overdue(200)
                    .with_broken_promises(4)
            })
            .collect();
        debts.extend((0..3).map(|i| {
            DebtRecord::new(format!("e{i}"), 500.0)
                .with_days_overdue(10)
                .with_recent_successful_calls(2)
        }));
        let insights = generate_insights(&debts, &calls(1, 5), now());
        let categories: Vec<_> = insights.iter().map(|i| i.category).collect();
        assert_eq!(
            categories,
            vec![
                InsightCategory::Risk,
                InsightCategory::Anomaly,
                InsightCategory::Opportunity
            ]
        );
        assert!(insights.iter().all(|i| (0.0..=1.0).contains(&i.confidence)));
    }
}
