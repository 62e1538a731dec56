use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Discriminant for the four classified failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Timeout,
    Transport,
    Protocol,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Transport => "transport",
            ErrorKind::Protocol => "protocol",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every failure the gateway can return.
///
/// The first four variants are the classified taxonomy and report a
/// [`ErrorKind`] from [`ApiError::kind`]. `Decode` is the unclassified fault
/// for a successful response whose body is not the expected JSON.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation error: {message}")]
    Validation { message: String },
    #[error("{message} ({endpoint})")]
    Timeout {
        message: String,
        timeout_ms: u64,
        endpoint: String,
    },
    #[error("{message} ({endpoint}): {source}")]
    Transport {
        message: String,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("api error {status_code} at {endpoint}: {message}")]
    Protocol {
        message: String,
        status_code: u16,
        endpoint: String,
    },
    #[error("malformed response body from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    pub fn timeout(timeout_ms: u64, endpoint: impl Into<String>) -> Self {
        ApiError::Timeout {
            message: format!("Request timeout after {timeout_ms}ms"),
            timeout_ms,
            endpoint: endpoint.into(),
        }
    }

    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::Transport {
            message: "Failed to connect to API server".to_string(),
            endpoint: endpoint.into(),
            source,
        }
    }

    pub fn protocol(message: impl Into<String>, status_code: u16, endpoint: impl Into<String>) -> Self {
        ApiError::Protocol {
            message: message.into(),
            status_code,
            endpoint: endpoint.into(),
        }
    }

    /// The taxonomy kind, or `None` for an unclassified decode fault.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Validation { .. } => Some(ErrorKind::Validation),
            ApiError::Timeout { .. } => Some(ErrorKind::Timeout),
            ApiError::Transport { .. } => Some(ErrorKind::Transport),
            ApiError::Protocol { .. } => Some(ErrorKind::Protocol),
            ApiError::Decode { .. } => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, ApiError::Protocol { .. })
    }

    /// Whether a UI should offer the user a retry. Validation mistakes and
    /// corrupt payloads will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            Some(ErrorKind::Timeout | ErrorKind::Transport | ErrorKind::Protocol)
        )
    }

    /// Human-readable message without endpoint or source decoration.
    pub fn message(&self) -> String {
        match self {
            ApiError::Validation { message }
            | ApiError::Timeout { message, .. }
            | ApiError::Transport { message, .. }
            | ApiError::Protocol { message, .. } => message.clone(),
            ApiError::Decode { source, .. } => source.to_string(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Protocol { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ApiError::Validation { .. } => None,
            ApiError::Timeout { endpoint, .. }
            | ApiError::Transport { endpoint, .. }
            | ApiError::Protocol { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => Some(endpoint),
        }
    }
}
