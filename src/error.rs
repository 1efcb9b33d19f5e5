//! Error types for alert derivation and collaborator access
//!
//! Errors are classified by recoverability:
//! - Retryable: a collaborator fetch or update failed on the backend side
//! - NonRetryable: the record does not exist or the input was rejected
//! - Configuration errors surface before the engine is built

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::TaskId;

/// The external store an engine call was talking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collaborator {
    Tasks,
    Activities,
    Contacts,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::Tasks => "tasks",
            Collaborator::Activities => "activities",
            Collaborator::Contacts => "contacts",
        };
        f.write_str(name)
    }
}

/// Errors raised by task/activity/contact stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend(message.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the alert engine
#[derive(Debug, Error)]
pub enum AlertError {
    /// One of the three source fetches failed; no partial feed is returned.
    #[error("Failed to load alerts: {collaborator} fetch failed: {source}")]
    UpstreamFetch {
        collaborator: Collaborator,
        #[source]
        source: StoreError,
    },

    /// The task store refused the completion; dismissal state is unchanged.
    #[error("Failed to complete task {task_id}: {source}")]
    TaskCompletion {
        task_id: TaskId,
        #[source]
        source: StoreError,
    },
}

impl AlertError {
    /// Returns true if retrying the whole call may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            AlertError::UpstreamFetch { source, .. } | AlertError::TaskCompletion { source, .. } => {
                matches!(source, StoreError::Backend(_))
            }
        }
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AlertError::UpstreamFetch { .. } => "Alerts could not be loaded. Refresh to try again.",
            AlertError::TaskCompletion {
                source: StoreError::NotFound { .. },
                ..
            } => "The task no longer exists. Refresh the alert list.",
            AlertError::TaskCompletion { .. } => "The task was not marked complete. Try again.",
        }
    }
}

/// Errors loading or validating alert configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown time zone: {0}")]
    InvalidTimezone(String),

    #[error("Follow-up window must be between 1 and 3650 days, got {0}")]
    InvalidWindow(i64),
}

/// Serializable error representation for UI callers
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorType {
    UpstreamFetch,
    TaskCompletion,
}

impl From<&AlertError> for AlertErrorPayload {
    fn from(err: &AlertError) -> Self {
        let error_type = match err {
            AlertError::UpstreamFetch { .. } => ErrorType::UpstreamFetch,
            AlertError::TaskCompletion { .. } => ErrorType::TaskCompletion,
        };

        AlertErrorPayload {
            message: err.to_string(),
            error_type,
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}
