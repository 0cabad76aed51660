//! Accounts and roles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::relationship::RelationshipRecord;

/// Avatar substituted at registration when the caller leaves the field blank
pub const DEFAULT_AVATAR_URL: &str = "https://i.pravatar.cc/300?img=58";

/// Account role. The closed set the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account
    User,
    /// Curator with movie and user administration rights
    Admin,
}

impl Role {
    /// Parse from string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Check whether this role may use the curation and user administration surface
    pub fn can_curate(&self) -> bool {
        *self == Self::Admin
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A backend user account.
///
/// Owned by the backend; the client holds a cached copy keyed by the current
/// session and re-fetches rather than trusting local mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend object id (24 hex characters)
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub role: Role,
    /// Never round-trips in practice, tolerated when a backend variant includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Watched records, embedded by `GET /users/:id`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub watched: Vec<RelationshipRecord>,
}
