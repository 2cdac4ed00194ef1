use std::sync::{Arc, Mutex};

use collectiq_core::{CallRecord, Clock, CollectResult, DebtRecord, SystemClock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::churn::predict_churn_risk;
use crate::contact_time::optimal_contact_windows;
use crate::insights::{generate_insights, Insight};
use crate::payment::predict_payment_likelihood;
use crate::settlement::predict_settlement_acceptance;
use crate::types::{ChurnPrediction, ContactWindow, PredictionResult, SettlementPrediction};

/// Entry point for every predictor, owning the random source and the clock.
///
/// Each method is a placeholder contract: a trained model can replace the
/// formula behind it without changing the signature.
pub struct PredictionEngine {
    rng: Mutex<StdRng>,
    clock: Arc<dyn Clock>,
}

impl PredictionEngine {
    pub fn new(rng: StdRng, clock: Arc<dyn Clock>) -> Self {
        Self {
            rng: Mutex::new(rng),
            clock,
        }
    }

    /// Deterministic engine for a given seed.
    pub fn seeded(seed: u64, clock: Arc<dyn Clock>) -> Self {
        Self::new(StdRng::seed_from_u64(seed), clock)
    }

    /// Engine seeded from OS entropy, on wall-clock time.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy(), Arc::new(SystemClock))
    }

    pub fn payment_likelihood(
        &self,
        debt: &DebtRecord,
        call_history: &[CallRecord],
    ) -> CollectResult<PredictionResult> {
        // a poisoned lock still holds a usable RNG
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let result = predict_payment_likelihood(debt, call_history, &mut *rng)?;
        debug!(debt_id = %debt.id, probability = result.probability, "Predicted payment likelihood");
        Ok(result)
    }

    pub fn contact_windows(&self) -> Vec<ContactWindow> {
        optimal_contact_windows()
    }

    pub fn settlement(&self, debt: &DebtRecord) -> CollectResult<SettlementPrediction> {
        let result = predict_settlement_acceptance(debt)?;
        debug!(
            debt_id = %debt.id,
            discount = result.recommended_discount_pct,
            "Predicted settlement acceptance"
        );
        Ok(result)
    }

    pub fn churn_risk(
        &self,
        debt: &DebtRecord,
        call_history: &[CallRecord],
    ) -> CollectResult<ChurnPrediction> {
        predict_churn_risk(debt, call_history, self.clock.now())
    }

    pub fn insights(&self, debts: &[DebtRecord], calls: &[CallRecord]) -> Vec<Insight> {
        generate_insights(debts, calls, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use collectiq_core::FixedClock;

    fn engine(seed: u64) -> PredictionEngine {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        PredictionEngine::seeded(seed, Arc::new(FixedClock(at)))
    }

    #[test]
    fn test_same_seed_reproduces_sequence() {
        let debt = DebtRecord::new("d", 2_500.0).with_days_overdue(40);
        let a = engine(9);
        let b = engine(9);
        for _ in 0..3 {
            let x = a.payment_likelihood(&debt, &[]).unwrap();
            let y = b.payment_likelihood(&debt, &[]).unwrap();
            assert_eq!(x.confidence, y.confidence);
        }
    }

    #[test]
    fn test_churn_uses_injected_clock() {
        let engine = engine(1);
        let debt = DebtRecord::new("d", 100.0);
        let prediction = engine.churn_risk(&debt, &[]).unwrap();
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        // never contacted 0.30 + no calls 0.20 -> medium
        assert_eq!(prediction.predicted_churn_date, at + Duration::days(45));
    }

    #[test]
    fn test_invalid_debt_is_rejected_everywhere() {
        let engine = engine(1);
        let bad = DebtRecord::new("bad", f64::NAN);
        assert!(engine.payment_likelihood(&bad, &[]).is_err());
        assert!(engine.settlement(&bad).is_err());
        assert!(engine.churn_risk(&bad, &[]).is_err());
    }
}
