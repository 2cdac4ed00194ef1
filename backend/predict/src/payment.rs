//! Payment likelihood: a closed-form stand-in for a trained payment model.

use collectiq_core::{CallRecord, CollectResult, DebtRecord};
use rand::Rng;

use crate::types::{PredictionFactor, PredictionResult, Timeframe};

const BASE_PROBABILITY: f64 = 0.70;
pub const MIN_PROBABILITY: f64 = 0.05;
pub const MAX_PROBABILITY: f64 = 0.95;

const LIKELY_THRESHOLD: f64 = 0.7;
const POSSIBLE_THRESHOLD: f64 = 0.4;

pub fn predict_payment_likelihood<R: Rng>(
    debt: &DebtRecord,
    call_history: &[CallRecord],
    rng: &mut R,
) -> CollectResult<PredictionResult> {
    debt.validate()?;

    let mut factors = Vec::new();

    let age_impact = match debt.days_overdue {
        d if d > 180 => -0.25,
        d if d > 90 => -0.15,
        d if d > 30 => -0.05,
        _ => 0.05,
    };
    factors.push(PredictionFactor::new(
        "Debt Age",
        age_impact,
        format!("{} days", debt.days_overdue),
    ));

    let amount_impact = if debt.amount > 10_000.0 {
        -0.15
    } else if debt.amount > 5_000.0 {
        -0.08
    } else if debt.amount < 1_000.0 {
        0.10
    } else {
        0.0
    };
    if amount_impact != 0.0 {
        factors.push(PredictionFactor::new(
            "Debt Amount",
            amount_impact,
            format!("{} {:.2}", debt.currency, debt.amount),
        ));
    }

    let promise_impact = match debt.broken_promises {
        0 => 0.0,
        1 | 2 => -0.10,
        _ => -0.20,
    };
    if promise_impact != 0.0 {
        factors.push(PredictionFactor::new(
            "Broken Promises",
            promise_impact,
            debt.broken_promises.to_string(),
        ));
    }

    if debt.recent_successful_calls > 0 {
        factors.push(PredictionFactor::new(
            "Recent Engagement",
            0.15,
            format!("{} successful calls", debt.recent_successful_calls),
        ));
    }

    let history_impact = match call_history.len() {
        0 => -0.05,
        n if n > 5 => 0.05,
        _ => 0.0,
    };
    if history_impact != 0.0 {
        factors.push(PredictionFactor::new(
            "Contact History",
            history_impact,
            format!("{} calls", call_history.len()),
        ));
    }

    let raw: f64 = BASE_PROBABILITY + factors.iter().map(|f| f.impact).sum::<f64>();
    let probability = raw.clamp(MIN_PROBABILITY, MAX_PROBABILITY);
    let confidence = rng.gen_range(0.80..=0.95);

    let (recommended_action, timeframe) = if probability >= LIKELY_THRESHOLD {
        (
            "Send a payment reminder with flexible payment options",
            Timeframe::Immediate,
        )
    } else if probability >= POSSIBLE_THRESHOLD {
        ("Offer a structured payment plan", Timeframe::ShortTerm)
    } else {
        ("Escalate with a settlement offer", Timeframe::LongTerm)
    };

    Ok(PredictionResult {
        debt_id: debt.id.clone(),
        probability,
        confidence,
        factors,
        recommended_action: recommended_action.to_string(),
        timeframe,
    })
}
