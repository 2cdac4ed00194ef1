use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, simulated unit of specialized automation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDescriptor {
    pub id: String,
    pub name: String,
    pub category: AgentCategory,
    pub status: AgentStatus,
    pub performance: AgentPerformance,
    #[serde(default)]
    pub configuration: HashMap<String, serde_json::Value>,
}

impl AgentDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: AgentCategory,
        performance: AgentPerformance,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            status: AgentStatus::Active,
            performance,
            configuration: HashMap::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AgentStatus::Active
    }
}

/// Performance snapshot of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformance {
    /// Fraction in [0, 1].
    pub success_rate: f64,
    pub avg_response_ms: u64,
    pub tasks_completed: u64,
    pub last_activity: DateTime<Utc>,
}

/// Partial update merged into an [`AgentPerformance`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_response_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks_completed: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AgentCategory {
    Sentiment,
    Scheduling,
    Compliance,
    Prioritization,
    Negotiation,
    Analytics,
}

impl AgentCategory {
    pub const ALL: [AgentCategory; 6] = [
        AgentCategory::Sentiment,
        AgentCategory::Scheduling,
        AgentCategory::Compliance,
        AgentCategory::Prioritization,
        AgentCategory::Negotiation,
        AgentCategory::Analytics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentCategory::Sentiment => "sentiment",
            AgentCategory::Scheduling => "scheduling",
            AgentCategory::Compliance => "compliance",
            AgentCategory::Prioritization => "prioritization",
            AgentCategory::Negotiation => "negotiation",
            AgentCategory::Analytics => "analytics",
        }
    }
}

impl fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown agent category '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Active,
    Inactive,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in AgentCategory::ALL {
            assert_eq!(category.as_str().parse::<AgentCategory>().unwrap(), category);
        }
        assert_eq!(" Compliance ".parse::<AgentCategory>().unwrap(), AgentCategory::Compliance);
        assert!("billing".parse::<AgentCategory>().is_err());
    }

    #[test]
    fn test_new_agent_is_active() {
        let agent = AgentDescriptor::new(
            "a1",
            "Tester",
            AgentCategory::Analytics,
            AgentPerformance {
                success_rate: 0.9,
                avg_response_ms: 200,
                tasks_completed: 0,
                last_activity: Utc::now(),
            },
        );
        assert!(agent.is_active());
        assert!(agent.configuration.is_empty());
    }

    #[test]
    fn test_partial_update_deserializes_missing_fields() {
        let update: PerformanceUpdate = serde_json::from_str(r#"{"successRate": 0.5}"#).unwrap();
        assert_eq!(update.success_rate, Some(0.5));
        assert!(update.avg_response_ms.is_none());
    }
}
