//! CollectIQ runtime configuration schema.
//!
//! Every section is optional in the file; `defaults::apply_all_defaults`
//! fills in what the runtime needs.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectIqConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// HTTP API server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<AgentsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions: Option<PredictionsConfig>,

    /// UI-state blob storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// trace | debug | info | warn | error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling JSON log file; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Emit console logs as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentsConfig {
    /// Seed for the registry's starting metrics; random when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionsConfig {
    /// Seed for prediction confidence draws; random when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<String>,
}

impl CollectIqConfig {
    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }

    pub fn bind_address(&self) -> String {
        let server = self.server.clone().unwrap_or_default();
        format!(
            "{}:{}",
            server.bind.as_deref().unwrap_or(crate::defaults::DEFAULT_BIND),
            server.port.unwrap_or(crate::defaults::DEFAULT_PORT)
        )
    }

    pub fn agents_seed(&self) -> Option<u64> {
        self.agents.as_ref().and_then(|a| a.seed)
    }

    pub fn predictions_seed(&self) -> Option<u64> {
        self.predictions.as_ref().and_then(|p| p.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
logging:
  level: debug
  dir: /var/log/collectiq
server:
  port: 9090
storage:
  stateDir: /tmp/state
agents:
  seed: 42
"#;
        let cfg: CollectIqConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(
            cfg.storage.as_ref().and_then(|s| s.state_dir.as_deref()),
            Some("/tmp/state")
        );
        assert_eq!(cfg.agents_seed(), Some(42));
        assert_eq!(cfg.predictions_seed(), None);
    }

    #[test]
    fn bind_address_falls_back_to_defaults() {
        let cfg = CollectIqConfig::default();
        assert_eq!(cfg.bind_address(), "127.0.0.1:8080");
    }
}
