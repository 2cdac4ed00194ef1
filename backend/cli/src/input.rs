//! JSON input files for the one-shot commands.

use std::path::Path;

use anyhow::{Context, Result};
use collectiq_core::{CallRecord, DebtRecord};
use serde::de::DeserializeOwned;

async fn read_json_array<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {what} file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {what} file: {}", path.display()))
}

pub async fn read_debts(path: &Path) -> Result<Vec<DebtRecord>> {
    read_json_array(path, "debts").await
}

/// Calls are optional; no path means no history.
pub async fn read_calls(path: Option<&Path>) -> Result<Vec<CallRecord>> {
    match path {
        Some(path) => read_json_array(path, "calls").await,
        None => Ok(Vec::new()),
    }
}

pub fn find_debt<'a>(debts: &'a [DebtRecord], id: &str) -> Result<&'a DebtRecord> {
    debts
        .iter()
        .find(|d| d.id == id)
        .with_context(|| format!("No debt with id '{id}' in input"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_debts_and_finds_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debts.json");
        tokio::fs::write(
            &path,
            r#"[{"id":"d-1","amount":1200.0,"originalAmount":1500.0,"daysOverdue":45}]"#,
        )
        .await
        .unwrap();

        let debts = read_debts(&path).await.unwrap();
        assert_eq!(find_debt(&debts, "d-1").unwrap().days_overdue, 45);
        assert!(find_debt(&debts, "d-2").is_err());
        assert!(read_calls(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_names_the_path() {
        let err = read_debts(Path::new("/nonexistent/debts.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/debts.json"));
    }
}
