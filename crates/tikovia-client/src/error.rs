//! Error taxonomy for the HTTP gateway
//!
//! Maps transport outcomes onto the four kinds callers branch on: no
//! response at all, a rejected credential, a server-reported failure, and
//! local validation that never reached the wire.

use thiserror::Error;

/// Gateway error
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response reached the client (DNS, connection, timeout, TLS)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend rejected the credential (401/403); the session must end
    #[error("authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// Any other non-success status, with the server-supplied message
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Rejected locally before any request was made
    #[error("validation failed: {0}")]
    Validation(String),

    /// The response body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// JSON (de)serialization failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// The HTTP status carried by this error, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } => Some(*status),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when the credential was rejected (401/403)
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns `true` when no response reached the client
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns `true` for 4xx server messages and local validation failures
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Server { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_predicate() {
        let err = ClientError::Auth {
            status: 401,
            message: "token expired".into(),
        };
        assert!(err.is_auth());
        assert!(!err.is_network());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_validation_predicate_covers_4xx() {
        let err = ClientError::Server {
            status: 409,
            message: "email already registered".into(),
        };
        assert!(err.is_validation());
        assert!(!err.is_auth());

        let err = ClientError::Server {
            status: 500,
            message: "boom".into(),
        };
        assert!(!err.is_validation());

        assert!(ClientError::Validation("empty email".into()).is_validation());
    }

    #[test]
    fn test_display_carries_server_message() {
        let err = ClientError::Server {
            status: 422,
            message: "rating out of range".into(),
        };
        assert_eq!(err.to_string(), "server error 422: rating out of range");
    }
}
