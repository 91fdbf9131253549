//! Error types for Hyrum operations

use std::path::PathBuf;
use std::time::Duration;

use crate::llm::RetryConfig;

/// Result type for Hyrum operations
pub type Result<T> = std::result::Result<T, HyrumError>;

/// Error types for the store assistant
#[derive(Debug, thiserror::Error)]
pub enum HyrumError {
    /// Configuration error (missing credential, invalid sampling values, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Knowledge file exists but could not be read
    #[error("Failed to read knowledge file {path}: {source}")]
    KnowledgeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Knowledge file is not valid JSON or not a topic object
    #[error("Malformed knowledge file {path}: {source}")]
    KnowledgeParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A single knowledge record has the wrong shape
    #[error("Invalid knowledge record '{topic}': {reason}")]
    InvalidRecord { topic: String, reason: String },

    /// Request never reached the provider or the connection failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Completion call exceeded the configured wait
    #[error("Completion request timed out after {0:?}")]
    Timeout(Duration),

    /// Provider answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Provider answered 2xx but the body was unusable
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HyrumError {
    /// Whether a completion failure is worth another attempt.
    pub fn is_transient(&self, retry: &RetryConfig) -> bool {
        match self {
            HyrumError::Timeout(_) => true,
            HyrumError::Api { status, .. } => retry.is_retryable_status(*status),
            _ => false,
        }
    }
}

impl From<figment::Error> for HyrumError {
    fn from(err: figment::Error) -> Self {
        HyrumError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let retry = RetryConfig {
            retry_on_status: vec![429, 503],
            ..Default::default()
        };
        assert!(HyrumError::Timeout(Duration::from_secs(1)).is_transient(&retry));
        assert!(
            HyrumError::Api {
                status: 429,
                message: "slow down".into()
            }
            .is_transient(&retry)
        );
        assert!(
            !HyrumError::Api {
                status: 401,
                message: "bad key".into()
            }
            .is_transient(&retry)
        );
        assert!(!HyrumError::Transport("refused".into()).is_transient(&retry));
    }

    #[test]
    fn test_record_error_names_topic() {
        let err = HyrumError::InvalidRecord {
            topic: "reembolso".into(),
            reason: "expected an object".into(),
        };
        assert!(err.to_string().contains("reembolso"));
    }
}
