//! Priority score for a single debt record.

use collectiq_core::{CollectResult, DebtRecord};

/// Score contribution per 1 000 units owed.
const AMOUNT_DIVISOR: f64 = 1000.0;
/// Score contribution per 30 days overdue.
const OVERDUE_POINTS_PER_MONTH: f64 = 10.0;
const BROKEN_PROMISE_POINTS: f64 = 15.0;
const SUCCESSFUL_CALL_CREDIT: f64 = 20.0;

/// Compute the priority score of `debt`.
///
/// `amount/1000 + daysOverdue/30*10 + brokenPromises*15 - recentSuccessfulCalls*20`,
/// floored at zero. Records with non-finite or negative money fields are rejected.
pub fn calculate_priority_score(debt: &DebtRecord) -> CollectResult<f64> {
    debt.validate()?;
    Ok(raw_score(debt))
}

/// Unchecked score; callers must have validated `debt`.
pub(crate) fn raw_score(debt: &DebtRecord) -> f64 {
    let score = debt.amount / AMOUNT_DIVISOR
        + f64::from(debt.days_overdue) / 30.0 * OVERDUE_POINTS_PER_MONTH
        + f64::from(debt.broken_promises) * BROKEN_PROMISE_POINTS
        - f64::from(debt.recent_successful_calls) * SUCCESSFUL_CALL_CREDIT;
    score.max(0.0)
}
