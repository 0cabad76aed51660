//! Gateway configuration and wire payloads

use serde::{Deserialize, Serialize};

use tikovia_types::{Role, User};

// =============================================================================
// Configuration
// =============================================================================

/// Connection settings for the private backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL including the API prefix, no trailing slash
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Connection settings for the external movie catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog API, no trailing slash
    pub base_url: String,
    /// Prefix for posters the catalog reports as bare paths
    pub image_base_url: String,
    /// Static API key, attached as a bearer header on every call
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

// =============================================================================
// Auth payloads
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub avatar_url: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` response: the user record and its bearer credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

// =============================================================================
// User payloads
// =============================================================================

/// Partial update for `PUT /users/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

// =============================================================================
// Relationship payloads
// =============================================================================

/// `POST /favorites` body. The external reference rides `tmdbId`; the
/// internal one, when known, rides `movieId` so the backend can embed the
/// curated movie on reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<String>,
}

/// `DELETE /favorites` body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFavoriteRequest {
    pub user_id: String,
    pub movie_id: String,
}

// =============================================================================
// Movie payloads
// =============================================================================

/// `POST /movies` body. Monetary fields are whole USD.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: String,
    pub poster_url: String,
    pub release_date: String,
    pub runtime: u32,
    pub rating: f64,
    pub vote_count: u64,
    pub overview: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub genres: Vec<String>,
    #[serde(rename = "budgetUSD", skip_serializing_if = "Option::is_none")]
    pub budget_usd: Option<f64>,
    #[serde(rename = "revenueUSD", skip_serializing_if = "Option::is_none")]
    pub revenue_usd: Option<f64>,
    pub production_company: String,
    /// Mirrored catalog id, when a title lookup matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
}

/// `PUT /movies/:id` body. Absent fields are left untouched. Monetary
/// fields are whole USD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(rename = "budgetUSD", skip_serializing_if = "Option::is_none")]
    pub budget_usd: Option<f64>,
    #[serde(rename = "revenueUSD", skip_serializing_if = "Option::is_none")]
    pub revenue_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_company: Option<String>,
}

// =============================================================================
// Generic responses
// =============================================================================

/// Mutation acknowledgement; the backend replies with a human-readable
/// `message` and sometimes extra fields we do not depend on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Error body shape the backend uses for non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
