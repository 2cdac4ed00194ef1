//! UI-state Store
//!
//! Small JSON blobs kept under fixed keys, one file per key
//! (`<state_dir>/<key>.json`). No schema versioning: a blob that no longer
//! parses is reported to the caller.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use collectiq_core::{CollectError, CollectResult, DebtStatus};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

pub const SESSION_STATE_KEY: &str = "session";
pub const DASHBOARD_FILTERS_KEY: &str = "dashboard_filters";

const MAX_KEY_LEN: usize = 64;

/// Dashboard page the user last had open.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DashboardPage {
    #[default]
    Overview,
    Calls,
    Contacts,
    Collections,
    Compliance,
    Integrations,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub active_page: DashboardPage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DebtStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_days_overdue: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Keys are lowercase ASCII letters, digits, `_` and `-`.
pub fn validate_key(key: &str) -> CollectResult<()> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(CollectError::InvalidStateKey(key.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct UiStateStore {
    dir: PathBuf,
}

impl UiStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> CollectResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// Raw JSON blob under `key`, or `None` if nothing was saved.
    pub async fn get_raw(&self, key: &str) -> CollectResult<Option<serde_json::Value>> {
        let path = self.path_for(key)?;
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error("read", &path, e)),
        };
        let value = serde_json::from_str(&raw).map_err(|e| storage_error("parse", &path, e))?;
        Ok(Some(value))
    }

    /// Atomically replace the blob under `key`.
    pub async fn put_raw(&self, key: &str, value: &serde_json::Value) -> CollectResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error("create", &self.dir, e))?;

        let body = serde_json::to_vec_pretty(value).map_err(|e| storage_error("encode", &path, e))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .await
            .map_err(|e| storage_error("write", &tmp, e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| storage_error("rename", &path, e))?;

        debug!(key, path = %path.display(), "Saved UI state");
        Ok(())
    }

    /// Delete the blob under `key`. Returns whether anything was removed.
    pub async fn remove(&self, key: &str) -> CollectResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(key, "Cleared UI state");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage_error("remove", &path, e)),
        }
    }

    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> CollectResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| CollectError::Storage(format!("decode {key}: {e}"))),
            None => Ok(None),
        }
    }

    pub async fn save<T: Serialize>(&self, key: &str, value: &T) -> CollectResult<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| CollectError::Storage(format!("encode {key}: {e}")))?;
        self.put_raw(key, &value).await
    }

    pub async fn session(&self) -> CollectResult<SessionState> {
        Ok(self.load(SESSION_STATE_KEY).await?.unwrap_or_default())
    }

    pub async fn save_session(&self, state: &SessionState) -> CollectResult<()> {
        self.save(SESSION_STATE_KEY, state).await
    }

    pub async fn dashboard_filters(&self) -> CollectResult<DashboardFilters> {
        Ok(self.load(DASHBOARD_FILTERS_KEY).await?.unwrap_or_default())
    }

    pub async fn save_dashboard_filters(&self, filters: &DashboardFilters) -> CollectResult<()> {
        self.save(DASHBOARD_FILTERS_KEY, filters).await
    }
}

fn storage_error(op: &str, path: &Path, err: impl std::fmt::Display) -> CollectError {
    CollectError::Storage(format!("{op} {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rules() {
        assert!(validate_key("session").is_ok());
        assert!(validate_key("dashboard_filters").is_ok());
        assert!(validate_key("calls-page-2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("Session").is_err());
        assert!(validate_key(&"k".repeat(65)).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = UiStateStore::new(dir.path());
        assert_eq!(store.session().await.unwrap(), SessionState::default());
        assert!(store.get_raw("anything").await.unwrap().is_none());
        assert!(!store.remove("anything").await.unwrap());
    }

    #[tokio::test]
    async fn test_filters_persist_across_store_instances() {
        let dir = tempfile::tempdir().unwrap();
        let filters = DashboardFilters {
            status: Some(DebtStatus::Disputed),
            min_days_overdue: Some(90),
            search: None,
        };
        UiStateStore::new(dir.path().join("nested"))
            .save_dashboard_filters(&filters)
            .await
            .unwrap();

        let reopened = UiStateStore::new(dir.path().join("nested"));
        assert_eq!(reopened.dashboard_filters().await.unwrap(), filters);
        assert!(reopened.remove(DASHBOARD_FILTERS_KEY).await.unwrap());
        assert_eq!(
            reopened.dashboard_filters().await.unwrap(),
            DashboardFilters::default()
        );
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("session.json"), "{not json")
            .await
            .unwrap();
        let store = UiStateStore::new(dir.path());
        assert!(matches!(store.session().await, Err(CollectError::Storage(_))));
    }
}
