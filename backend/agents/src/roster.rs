//! The default set of automation agents and their randomized starting metrics.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use collectiq_core::{AgentCategory, AgentDescriptor, AgentPerformance};
use rand::Rng;
use serde_json::json;

/// (id, display name, category)
pub const DEFAULT_ROSTER: [(&str, &str, AgentCategory); 6] = [
    ("sentiment-analyzer", "Sentiment Analyzer", AgentCategory::Sentiment),
    ("payment-scheduler", "Payment Scheduler", AgentCategory::Scheduling),
    ("compliance-monitor", "Compliance Monitor", AgentCategory::Compliance),
    ("debt-prioritizer", "Debt Prioritizer", AgentCategory::Prioritization),
    ("voice-negotiator", "Voice Negotiator", AgentCategory::Negotiation),
    ("predictive-analyst", "Predictive Analyst", AgentCategory::Analytics),
];

/// Random performance snapshot: success rate 0.70–1.00, response 100–600 ms.
pub fn random_performance<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> AgentPerformance {
    AgentPerformance {
        success_rate: rng.gen_range(0.70..=1.0),
        avg_response_ms: rng.gen_range(100..=600),
        tasks_completed: rng.gen_range(0..500),
        last_activity: now,
    }
}

fn default_configuration(category: AgentCategory) -> HashMap<String, serde_json::Value> {
    let mut config = HashMap::new();
    match category {
        AgentCategory::Sentiment => {
            config.insert("escalationThreshold".to_string(), json!(-0.6));
        }
        AgentCategory::Scheduling => {
            config.insert("callingHours".to_string(), json!({ "start": 8, "end": 20 }));
        }
        AgentCategory::Compliance => {
            config.insert("maxAttemptsPer7Days".to_string(), json!(7));
        }
        AgentCategory::Prioritization => {
            config.insert("refreshMinutes".to_string(), json!(15));
        }
        AgentCategory::Negotiation => {
            config.insert("maxDiscountPct".to_string(), json!(40));
        }
        AgentCategory::Analytics => {
            config.insert("insightLimit".to_string(), json!(3));
        }
    }
    config
}

/// Build the six default agents with metrics drawn from `rng`.
pub fn default_agents<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Vec<AgentDescriptor> {
    DEFAULT_ROSTER
        .iter()
        .map(|&(id, name, category)| {
            let mut agent = AgentDescriptor::new(id, name, category, random_performance(rng, now));
            agent.configuration = default_configuration(category);
            agent
        })
        .collect()
}
