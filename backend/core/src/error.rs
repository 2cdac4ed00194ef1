use thiserror::Error;

/// Top-level error type for the CollectIQ analytics core.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("invalid field `{field}` on record {record_id}: {reason}")]
    InvalidField {
        record_id: String,
        field: &'static str,
        reason: String,
    },

    #[error("agent not found: {0}")]
    AgentNotFound(String),

    #[error("invalid state key: {0}")]
    InvalidStateKey(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CollectResult<T> = Result<T, CollectError>;

impl CollectError {
    pub fn invalid_field(
        record_id: impl Into<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            record_id: record_id.into(),
            field,
            reason: reason.into(),
        }
    }
}
