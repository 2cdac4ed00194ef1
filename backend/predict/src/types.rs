use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// A named input that moved a prediction, with its signed weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionFactor {
    pub name: String,
    pub impact: f64,
    pub value: String,
}

impl PredictionFactor {
    pub fn new(name: impl Into<String>, impact: f64, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            impact,
            value: value.into(),
        }
    }
}

/// Coarse bucket for when a payment is expected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    /// Within 7 days
    Immediate,
    /// Within 30 days
    ShortTerm,
    /// Beyond 30 days
    LongTerm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub debt_id: String,
    pub probability: f64,
    pub confidence: f64,
    pub factors: Vec<PredictionFactor>,
    pub recommended_action: String,
    pub timeframe: Timeframe,
}

/// One weekday/hour slot with its synthetic contact success probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactWindow {
    pub weekday: Weekday,
    /// Hour of day, 24h clock.
    pub hour: u32,
    pub success_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPrediction {
    pub debt_id: String,
    pub acceptance_probability: f64,
    /// Whole percent, e.g. 15.0 for 15%.
    pub recommended_discount_pct: f64,
    pub settlement_amount: f64,
    pub reasoning: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnPrediction {
    pub debt_id: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub predicted_churn_date: DateTime<Utc>,
    pub preventive_actions: Vec<String>,
}
