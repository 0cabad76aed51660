//! Error types for the SDK layer

use thiserror::Error;

use tikovia_client::ClientError;
use tikovia_types::{MovieSource, RelationshipKind};

#[derive(Error, Debug)]
pub enum SdkError {
    /// The backend rejected the session credential. Callers should tear
    /// down the session when they see this.
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Backend error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A movie reference that is neither an internal id nor a catalog id.
    /// Not retried against either source.
    #[error("Unclassifiable movie reference: {0}")]
    AmbiguousReference(String),

    /// The relationship already holds this movie; no request was made
    #[error("Movie {reference} is already in the {kind} list")]
    Duplicate {
        kind: RelationshipKind,
        reference: String,
    },

    /// A classified reference could not be turned into a movie
    #[error("Failed to resolve {source} movie reference: {message}")]
    Resolution {
        /// Raw identifier so thiserror does not treat the movie source as
        /// this error's `Error::source()` cause
        r#source: MovieSource,
        status: Option<u16>,
        message: String,
    },

    #[error("No authenticated session")]
    SessionRequired,

    #[error("Session store failure: {0}")]
    Store(String),

    #[error("Serialization failure: {0}")]
    Serialization(String),

    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),
}

impl SdkError {
    /// True when the backend rejected the session credential
    pub fn is_auth(&self) -> bool {
        matches!(self, SdkError::Auth { .. })
    }

    /// True when no response was received at all
    pub fn is_network(&self) -> bool {
        matches!(self, SdkError::Network(_))
    }

    /// True for the dedup short-circuit on relationship adds
    pub fn is_duplicate(&self) -> bool {
        matches!(self, SdkError::Duplicate { .. })
    }

    /// HTTP status carried by the error, when there was a response
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Auth { status, .. } | SdkError::Server { status, .. } => Some(*status),
            SdkError::Resolution { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<ClientError> for SdkError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(e) => SdkError::Network(e.to_string()),
            ClientError::Auth { status, message } => SdkError::Auth { status, message },
            ClientError::Server { status, message } => SdkError::Server { status, message },
            ClientError::Validation(message) => SdkError::Validation(message),
            ClientError::InvalidResponse(message) => SdkError::InvalidResponse(message),
            ClientError::Json(e) => SdkError::Serialization(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
