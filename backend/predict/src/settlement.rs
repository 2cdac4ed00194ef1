//! Settlement acceptance and recommended discount.

use collectiq_core::{CollectResult, DebtRecord};

use crate::types::SettlementPrediction;

const BASE_DISCOUNT_PCT: f64 = 15.0;
const LARGE_BALANCE_DISCOUNT_PCT: f64 = 20.0;
const MAX_DISCOUNT_PCT: f64 = 40.0;

fn age_score(days_overdue: u32) -> f64 {
    match days_overdue {
        d if d > 365 => 0.8,
        d if d > 180 => 0.6,
        d if d > 90 => 0.4,
        _ => 0.2,
    }
}

fn amount_score(amount: f64) -> f64 {
    if amount > 10_000.0 {
        0.7
    } else if amount > 5_000.0 {
        0.5
    } else {
        0.3
    }
}

fn engagement_score(recent_successful_calls: u32) -> f64 {
    if recent_successful_calls > 0 {
        0.6
    } else {
        0.3
    }
}

fn promise_score(broken_promises: u32) -> f64 {
    match broken_promises {
        0 => 0.3,
        1 | 2 => 0.5,
        _ => 0.7,
    }
}

/// Discount percentage offered for a lump-sum settlement.
pub fn recommended_discount_pct(debt: &DebtRecord) -> f64 {
    if debt.days_overdue > 365 || debt.broken_promises > 3 {
        MAX_DISCOUNT_PCT
    } else if debt.amount > 10_000.0 {
        LARGE_BALANCE_DISCOUNT_PCT
    } else {
        BASE_DISCOUNT_PCT
    }
}

pub fn predict_settlement_acceptance(debt: &DebtRecord) -> CollectResult<SettlementPrediction> {
    debt.validate()?;

    let acceptance_probability = (age_score(debt.days_overdue)
        + amount_score(debt.amount)
        + engagement_score(debt.recent_successful_calls)
        + promise_score(debt.broken_promises))
        / 4.0;

    let discount = recommended_discount_pct(debt);
    let settlement_amount = debt.amount * (1.0 - discount / 100.0);

    let mut reasoning = vec![format!(
        "Debt is {} days overdue; older balances settle more readily",
        debt.days_overdue
    )];
    reasoning.push(format!(
        "Outstanding balance of {} {:.2}",
        debt.currency, debt.amount
    ));
    if debt.broken_promises > 0 {
        reasoning.push(format!(
            "{} broken payment promise(s) suggest a one-time offer over a plan",
            debt.broken_promises
        ));
    }
    if debt.recent_successful_calls > 0 {
        reasoning.push(format!(
            "{} recent successful call(s) indicate the debtor is reachable",
            debt.recent_successful_calls
        ));
    }
    reasoning.push(format!(
        "Recommend a {discount:.0}% discount, settling at {} {settlement_amount:.2}",
        debt.currency
    ));

    Ok(SettlementPrediction {
        debt_id: debt.id.clone(),
        acceptance_probability,
        recommended_discount_pct: discount,
        settlement_amount,
        reasoning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_discount_for_recent_small_debt() {
        let debt = DebtRecord::new("d", 2_000.0).with_days_overdue(30);
        let prediction = predict_settlement_acceptance(&debt).unwrap();
        assert_eq!(prediction.recommended_discount_pct, 15.0);
        assert!((prediction.settlement_amount - 1_700.0).abs() < 1e-9);
        // (0.2 + 0.3 + 0.3 + 0.3) / 4
        assert!((prediction.acceptance_probability - 0.275).abs() < 1e-9);
    }

    #[test]
    fn test_discount_jumps_across_one_year() {
        let mut last = 0.0;
        for days in [200, 300, 365, 366, 500] {
            let debt = DebtRecord::new("d", 4_000.0).with_days_overdue(days);
            let discount = recommended_discount_pct(&debt);
            assert!(discount >= last, "discount fell at {days} days");
            last = discount;
        }
        let before = DebtRecord::new("d", 4_000.0).with_days_overdue(365);
        let after = DebtRecord::new("d", 4_000.0).with_days_overdue(366);
        assert_eq!(recommended_discount_pct(&before), 15.0);
        assert_eq!(recommended_discount_pct(&after), 40.0);
    }

    #[test]
    fn test_many_broken_promises_max_discount() {
        let debt = DebtRecord::new("d", 1_000.0).with_broken_promises(4);
        assert_eq!(recommended_discount_pct(&debt), 40.0);
    }

    #[test]
    fn test_large_balance_discount() {
        let debt = DebtRecord::new("d", 12_000.0);
        assert_eq!(recommended_discount_pct(&debt), 20.0);
    }

    #[test]
    fn test_reasoning_mentions_inputs() {
        let debt = DebtRecord::new("d", 8_000.0)
            .with_days_overdue(400)
            .with_broken_promises(2)
            .with_recent_successful_calls(1);
        let prediction = predict_settlement_acceptance(&debt).unwrap();
        assert_eq!(prediction.reasoning.len(), 5);
        assert!(prediction.reasoning[0].contains("400 days"));
        assert!(prediction.reasoning[1].contains("USD 8000.00"));
        assert!(prediction.reasoning.last().unwrap().contains("40%"));
        // (0.8 + 0.5 + 0.6 + 0.5) / 4
        assert!((prediction.acceptance_probability - 0.6).abs() < 1e-9);
    }
}
