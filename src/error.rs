//! Error types shared across the client layers.

use thiserror::Error;

/// Normalized failure of a Data Access Client call.
///
/// `Display` yields the human-readable message only, so callers can surface
/// `err.to_string()` directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The service answered with a non-OK status.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// The request never produced a response (unreachable host, reset, ...).
    #[error("{0}")]
    Transport(String),

    /// The request payload could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(String),

    /// An OK response whose body could not be decoded.
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// An OK response carrying a `success: false` envelope.
    #[error("{message}")]
    Rejected {
        message: String,
        code: Option<String>,
    },
}

impl ApiError {
    /// The human-readable message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status, when the service produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Service-provided error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Status { code, .. } | Self::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Failure inside a realtime transport.
///
/// Never surfaced by the public Realtime Client operations; it only travels
/// between a transport and the connection driver, which logs it.
#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("connection closed: {0}")]
    Closed(String),

    #[error("invalid frame: {0}")]
    Frame(String),
}

impl From<serde_json::Error> for RealtimeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Frame(err.to_string())
    }
}

/// Rejected grid edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("component not found: {0}")]
    ComponentNotFound(String),

    #[error("unknown component type: {0}")]
    UnknownComponentType(String),

    #[error("component {0} is static and cannot be moved")]
    StaticComponent(String),

    #[error("invalid grid position: {0}")]
    InvalidPosition(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_message_only() {
        let err = ApiError::Status {
            status: 400,
            message: "Validation failed".to_string(),
            code: Some("VALIDATION".to_string()),
        };
        assert_eq!(err.to_string(), "Validation failed");
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.code(), Some("VALIDATION"));
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.message(), "connection refused");
    }

    #[test]
    fn realtime_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RealtimeError::from(serde_err);
        assert!(matches!(err, RealtimeError::Frame(_)));
    }
}
