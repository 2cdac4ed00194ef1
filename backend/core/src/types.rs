use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CollectError, CollectResult};

/// A tracked outstanding balance owed by a debtor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debtor_name: Option<String>,
    /// Amount currently owed.
    pub amount: f64,
    pub original_amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub days_overdue: u32,
    #[serde(default)]
    pub broken_promises: u32,
    #[serde(default)]
    pub recent_successful_calls: u32,
    /// Filled in by categorization; never trusted as input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<f64>,
    #[serde(default)]
    pub status: DebtStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_plan: Option<PaymentPlan>,
    #[serde(default)]
    pub compliance: ComplianceInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl DebtRecord {
    pub fn new(id: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            debtor_name: None,
            amount,
            original_amount: amount,
            currency: default_currency(),
            days_overdue: 0,
            broken_promises: 0,
            recent_successful_calls: 0,
            priority_score: None,
            status: DebtStatus::default(),
            payment_plan: None,
            compliance: ComplianceInfo::default(),
            last_contact_at: None,
        }
    }

    pub fn with_days_overdue(mut self, days: u32) -> Self {
        self.days_overdue = days;
        self
    }

    pub fn with_broken_promises(mut self, count: u32) -> Self {
        self.broken_promises = count;
        self
    }

    pub fn with_recent_successful_calls(mut self, count: u32) -> Self {
        self.recent_successful_calls = count;
        self
    }

    pub fn with_status(mut self, status: DebtStatus) -> Self {
        self.status = status;
        self
    }

    /// Reject records whose monetary fields would poison downstream arithmetic.
    pub fn validate(&self) -> CollectResult<()> {
        check_money(&self.id, "amount", self.amount)?;
        check_money(&self.id, "originalAmount", self.original_amount)?;
        if let Some(plan) = &self.payment_plan {
            check_money(&self.id, "paymentPlan.totalAmount", plan.total_amount)?;
            check_money(&self.id, "paymentPlan.installmentAmount", plan.installment_amount)?;
        }
        Ok(())
    }
}

fn check_money(record_id: &str, field: &'static str, value: f64) -> CollectResult<()> {
    if !value.is_finite() {
        return Err(CollectError::invalid_field(
            record_id,
            field,
            format!("expected a finite number, got {value}"),
        ));
    }
    if value < 0.0 {
        return Err(CollectError::invalid_field(
            record_id,
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(())
}

/// Lifecycle status of a debt. Records are transitioned, never deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    #[default]
    Active,
    Paid,
    Settled,
    Disputed,
    WrittenOff,
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DebtStatus::Active => "active",
            DebtStatus::Paid => "paid",
            DebtStatus::Settled => "settled",
            DebtStatus::Disputed => "disputed",
            DebtStatus::WrittenOff => "written_off",
        };
        f.write_str(s)
    }
}

/// An installment arrangement owned by exactly one debt record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlan {
    pub total_amount: f64,
    pub installment_amount: f64,
    pub frequency: PlanFrequency,
    pub next_due_date: NaiveDate,
    pub remaining_installments: u32,
    #[serde(default)]
    pub status: PlanStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanFrequency {
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Active,
    Completed,
    Defaulted,
}

/// Contact-compliance metadata carried alongside a debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceInfo {
    #[serde(default)]
    pub consent_to_contact: bool,
    #[serde(default)]
    pub do_not_call: bool,
    #[serde(default)]
    pub attempts_last_7_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispute_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debt_builder_defaults() {
        let debt = DebtRecord::new("d-1", 1200.0).with_days_overdue(45);
        assert_eq!(debt.original_amount, 1200.0);
        assert_eq!(debt.currency, "USD");
        assert_eq!(debt.status, DebtStatus::Active);
        assert_eq!(debt.days_overdue, 45);
        assert!(debt.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nan_amount() {
        let debt = DebtRecord::new("d-nan", f64::NAN);
        let err = debt.validate().unwrap_err();
        assert!(err.to_string().contains("amount"));
        assert!(err.to_string().contains("d-nan"));
    }

    #[test]
    fn test_validate_rejects_negative_original_amount() {
        let mut debt = DebtRecord::new("d-neg", 10.0);
        debt.original_amount = -5.0;
        match debt.validate() {
            Err(CollectError::InvalidField { field, .. }) => assert_eq!(field, "originalAmount"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let json = r#"{
            "id": "d-9",
            "amount": 5000,
            "originalAmount": 6500,
            "daysOverdue": 60,
            "brokenPromises": 2,
            "status": "written_off"
        }"#;
        let debt: DebtRecord = serde_json::from_str(json).unwrap();
        assert_eq!(debt.days_overdue, 60);
        assert_eq!(debt.recent_successful_calls, 0);
        assert_eq!(debt.status, DebtStatus::WrittenOff);
        assert!(!debt.compliance.do_not_call);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(DebtStatus::WrittenOff.to_string(), "written_off");
        assert_eq!(DebtStatus::Active.to_string(), "active");
    }
}
