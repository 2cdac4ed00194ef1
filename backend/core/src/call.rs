use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single outbound collection call placed against a debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub id: String,
    pub debt_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_secs: u32,
    pub outcome: CallOutcome,
}

/// How a call ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Successful,
    PromiseToPay,
    NoAnswer,
    Voicemail,
    Refused,
    Disputed,
}

impl CallOutcome {
    pub fn is_successful(self) -> bool {
        matches!(self, CallOutcome::Successful | CallOutcome::PromiseToPay)
    }
}

impl CallRecord {
    pub fn is_successful(&self) -> bool {
        self.outcome.is_successful()
    }
}

/// Calls in `calls` that belong to `debt_id`.
pub fn calls_for_debt<'a>(calls: &'a [CallRecord], debt_id: &'a str) -> impl Iterator<Item = &'a CallRecord> {
    calls.iter().filter(move |c| c.debt_id == debt_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn call(id: &str, debt: &str, outcome: CallOutcome) -> CallRecord {
        CallRecord {
            id: id.to_string(),
            debt_id: debt.to_string(),
            started_at: Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
            duration_secs: 120,
            outcome,
        }
    }

    #[test]
    fn test_promise_to_pay_counts_as_success() {
        assert!(CallOutcome::PromiseToPay.is_successful());
        assert!(CallOutcome::Successful.is_successful());
        assert!(!CallOutcome::Voicemail.is_successful());
        assert!(!CallOutcome::Refused.is_successful());
    }

    #[test]
    fn test_calls_for_debt_filters() {
        let calls = vec![
            call("c1", "d1", CallOutcome::NoAnswer),
            call("c2", "d2", CallOutcome::Successful),
            call("c3", "d1", CallOutcome::Successful),
        ];
        let ids: Vec<_> = calls_for_debt(&calls, "d1").map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c3"]);
    }

    #[test]
    fn test_outcome_serde() {
        let json = serde_json::to_string(&CallOutcome::PromiseToPay).unwrap();
        assert_eq!(json, "\"promise_to_pay\"");
    }
}
