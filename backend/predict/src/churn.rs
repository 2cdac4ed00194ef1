//! Churn risk: how likely a debtor is to stop engaging altogether.

use chrono::{DateTime, Duration, Utc};
use collectiq_core::{calls_for_debt, CallRecord, CollectResult, DebtRecord};

use crate::types::{ChurnPrediction, RiskLevel};

const HIGH_RISK: f64 = 0.7;
const MEDIUM_RISK: f64 = 0.4;

/// Most recent contact with the debtor, from calls or the record itself.
fn last_contact(debt: &DebtRecord, call_history: &[CallRecord]) -> Option<DateTime<Utc>> {
    calls_for_debt(call_history, &debt.id)
        .map(|c| c.started_at)
        .chain(debt.last_contact_at)
        .max()
}

pub fn predict_churn_risk(
    debt: &DebtRecord,
    call_history: &[CallRecord],
    now: DateTime<Utc>,
) -> CollectResult<ChurnPrediction> {
    debt.validate()?;

    let mut risk = 0.0;

    match last_contact(debt, call_history).map(|at| (now - at).num_days()) {
        None => risk += 0.30,
        Some(days) if days > 30 => risk += 0.30,
        Some(days) if days > 14 => risk += 0.15,
        Some(_) => {}
    }

    risk += match debt.broken_promises {
        0 => 0.0,
        1 | 2 => 0.10,
        _ => 0.25,
    };

    if call_history.is_empty() {
        risk += 0.20;
    }

    risk += match debt.days_overdue {
        d if d > 180 => 0.20,
        d if d > 90 => 0.10,
        _ => 0.0,
    };

    let risk_score: f64 = f64::clamp(risk, 0.0, 1.0);
    let risk_level = if risk_score >= HIGH_RISK {
        RiskLevel::High
    } else if risk_score >= MEDIUM_RISK {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let (horizon_days, actions) = match risk_level {
        RiskLevel::High => (
            14,
            vec![
                "Call within 48 hours with a senior negotiator",
                "Offer a settlement discount before the account goes silent",
                "Verify contact details and try an alternate channel",
            ],
        ),
        RiskLevel::Medium => (
            45,
            vec![
                "Schedule a follow-up call this week",
                "Send a payment plan proposal by e-mail",
            ],
        ),
        RiskLevel::Low => (90, vec!["Keep the regular contact cadence"]),
    };

    Ok(ChurnPrediction {
        debt_id: debt.id.clone(),
        risk_score,
        risk_level,
        predicted_churn_date: now + Duration::days(horizon_days),
        preventive_actions: actions.into_iter().map(String::from).collect(),
    })
}
