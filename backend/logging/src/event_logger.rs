//! Audit Event Logger
//!
//! Structured audit events (scoring batches, task assignments, predictions,
//! insights) emitted through `tracing` under the `audit` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    ScoreBatch {
        debts: usize,
        critical: usize,
    },
    TaskAssigned {
        category: String,
        agent_id: Option<String>,
    },
    PredictionIssued {
        kind: String,
        debt_id: String,
        summary: String,
    },
    InsightRaised {
        category: String,
        title: String,
    },
}

#[derive(Debug, Serialize)]
pub struct AuditLogEntry {
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub event: AuditEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redact free-text fields and emit the event; returns the logged entry.
    pub fn log_event(source: &str, mut event: AuditEvent) -> AuditLogEntry {
        match &mut event {
            AuditEvent::PredictionIssued { summary, .. } => {
                *summary = redact_sensitive_data(summary);
            }
            AuditEvent::InsightRaised { title, .. } => {
                *title = redact_sensitive_data(title);
            }
            AuditEvent::ScoreBatch { .. } | AuditEvent::TaskAssigned { .. } => {}
        }

        let entry = AuditLogEntry {
            source: source.into(),
            timestamp: Utc::now(),
            event,
        };

        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "audit", entry = %json, "Audit event"),
            Err(_) => info!(target: "audit", entry = ?entry, "Audit event"),
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_summary_is_redacted() {
        let entry = EventLogger::log_event(
            "api",
            AuditEvent::PredictionIssued {
                kind: "payment".into(),
                debt_id: "d-1".into(),
                summary: "p=0.45, debtor reachable at 555-123-4567".into(),
            },
        );
        match entry.event {
            AuditEvent::PredictionIssued { summary, .. } => {
                assert!(summary.contains("[REDACTED_PHONE]"));
                assert!(summary.starts_with("p=0.45"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_entry_serializes_with_type_tag() {
        let entry = EventLogger::log_event(
            "cli",
            AuditEvent::TaskAssigned {
                category: "compliance".into(),
                agent_id: Some("compliance-monitor".into()),
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "task_assigned");
        assert_eq!(json["source"], "cli");
    }
}
