//! `collectiq-predict`: formula-based predictions for the collections dashboard.
//!
//! None of these are trained models. Each predictor is a closed-form formula
//! over a few debt fields, kept behind [`PredictionEngine`] so a real model can
//! take its place later.

pub mod churn;
pub mod contact_time;
pub mod engine;
pub mod insights;
pub mod payment;
pub mod settlement;
pub mod types;

pub use engine::PredictionEngine;
pub use insights::{call_success_rate, generate_insights, ImpactLevel, Insight, InsightCategory};
pub use types::{
    ChurnPrediction, ContactWindow, PredictionFactor, PredictionResult, RiskLevel,
    SettlementPrediction, Timeframe,
};
