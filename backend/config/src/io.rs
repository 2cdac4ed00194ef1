//! Config file read/write with backup rotation.

use crate::schema::CollectIqConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Number of rolling backups to keep.
const MAX_BACKUPS: usize = 5;

/// `COLLECTIQ_CONFIG_DIR` if set, otherwise `~/.collectiq/`.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COLLECTIQ_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".collectiq"))
        .unwrap_or_else(|| PathBuf::from(".collectiq"))
}

pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// A missing file is not an error; the empty config is returned.
pub async fn load_config(path: &Path) -> Result<CollectIqConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(CollectIqConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // An empty file parses as YAML null.
    if raw.trim().is_empty() {
        return Ok(CollectIqConfig::default());
    }

    let config: CollectIqConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Write config to disk via temp file + rename, backing up the previous file.
pub async fn write_config(config: &CollectIqConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    if path.exists() {
        rotate_backups(path).await;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to rename temp config to: {}", path.display()))?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}

/// config.yaml.bak.1 -> .bak.2 -> ... -> .bak.N, then copy current to .bak.1.
/// Failures are logged and otherwise ignored.
async fn rotate_backups(path: &Path) {
    for i in (1..MAX_BACKUPS).rev() {
        let old = path.with_extension(format!("yaml.bak.{i}"));
        let new = path.with_extension(format!("yaml.bak.{}", i + 1));
        if old.exists() {
            if let Err(e) = fs::rename(&old, &new).await {
                warn!("Failed to rotate backup {}: {}", old.display(), e);
            }
        }
    }

    let bak = path.with_extension("yaml.bak.1");
    if let Err(e) = fs::copy(path, &bak).await {
        warn!("Failed to create backup {}: {}", bak.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ServerConfig;

    #[tokio::test]
    async fn missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.yaml")).await.unwrap();
        assert_eq!(cfg, CollectIqConfig::default());
    }

    #[tokio::test]
    async fn write_then_load_keeps_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());

        let mut cfg = CollectIqConfig::default();
        for port in [8081u16, 8082, 8083] {
            cfg.server = Some(ServerConfig {
                port: Some(port),
                ..Default::default()
            });
            write_config(&cfg, &path).await.unwrap();
        }

        let loaded = load_config(&path).await.unwrap();
        assert_eq!(loaded.server.unwrap().port, Some(8083));
        assert!(path.with_extension("yaml.bak.1").exists());
        assert!(path.with_extension("yaml.bak.2").exists());
        assert!(!path.with_extension("yaml.bak.3").exists());
    }

    #[tokio::test]
    async fn malformed_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "server: [unclosed").await.unwrap();
        assert!(load_config(&path).await.is_err());
    }
}
