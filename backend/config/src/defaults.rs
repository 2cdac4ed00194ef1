//! Config defaults: applies default values to parsed config.

use std::path::Path;

use crate::schema::{CollectIqConfig, LoggingConfig, ServerConfig, StorageConfig};

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Name of the UI-state directory inside the config directory.
pub const DEFAULT_STATE_SUBDIR: &str = "state";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: CollectIqConfig, config_dir: &Path) -> CollectIqConfig {
    let config = apply_logging_defaults(config);
    let config = apply_server_defaults(config);
    apply_storage_defaults(config, config_dir)
}

fn apply_logging_defaults(mut config: CollectIqConfig) -> CollectIqConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}

fn apply_server_defaults(mut config: CollectIqConfig) -> CollectIqConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    if server.bind.is_none() {
        server.bind = Some(DEFAULT_BIND.to_string());
    }
    if server.port.is_none() {
        server.port = Some(DEFAULT_PORT);
    }
    config
}

/// State lives next to the config file unless configured otherwise.
fn apply_storage_defaults(mut config: CollectIqConfig, config_dir: &Path) -> CollectIqConfig {
    let storage = config.storage.get_or_insert_with(StorageConfig::default);
    if storage.state_dir.is_none() {
        storage.state_dir = Some(
            config_dir
                .join(DEFAULT_STATE_SUBDIR)
                .to_string_lossy()
                .into_owned(),
        );
    }
    config
}
