use std::path::PathBuf;

use collectiq_config::defaults::{DEFAULT_BIND, DEFAULT_PORT, DEFAULT_STATE_SUBDIR};
use collectiq_config::CollectIqConfig;

/// Resolved runtime settings for the binary.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub json_logs: bool,
    pub state_dir: PathBuf,
    pub agents_seed: Option<u64>,
    pub predictions_seed: Option<u64>,
}

impl Settings {
    /// Flatten a prepared config (defaults already applied).
    pub fn from_config(config: &CollectIqConfig) -> Self {
        let server = config.server.clone().unwrap_or_default();
        let logging = config.logging.clone().unwrap_or_default();
        let state_dir = config
            .storage
            .as_ref()
            .and_then(|s| s.state_dir.clone())
            .unwrap_or_else(|| DEFAULT_STATE_SUBDIR.to_string());

        Self {
            bind_address: server.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: server.port.unwrap_or(DEFAULT_PORT),
            log_level: config.log_level().to_string(),
            log_dir: logging.dir.map(PathBuf::from),
            json_logs: logging.json.unwrap_or(false),
            state_dir: PathBuf::from(state_dir),
            agents_seed: config.agents_seed(),
            predictions_seed: config.predictions_seed(),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
