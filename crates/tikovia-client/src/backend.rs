//! HTTP client for the private movie backend
//!
//! Thin typed wrapper over the backend's REST surface. Holds no session
//! state of its own: the bearer credential is read from a [`TokenSource`]
//! when each request is built, so a login or logout between two calls
//! changes what the very next request sends.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use tikovia_types::{BackendMovie, RelationshipRecord, User};

use crate::error::{ClientError, Result};
use crate::token::TokenSource;
use crate::types::{
    AddFavoriteRequest, AuthResponse, BackendConfig, CreateMovieRequest, ErrorBody, LoginRequest,
    MessageResponse, RegisterRequest, RemoveFavoriteRequest, ResetPasswordRequest, SendOtpRequest,
    UpdateMovieRequest, UpdateUserRequest,
};

/// Client for the private movie backend
#[derive(Clone)]
pub struct BackendClient {
    config: BackendConfig,
    client: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
}

impl BackendClient {
    /// Create a new backend client reading bearer credentials from `tokens`
    pub fn new(config: BackendConfig, tokens: Arc<dyn TokenSource>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            config,
            client,
            tokens,
        }
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Attach the current bearer credential, if one exists right now
    async fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.bearer_token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ==================== Auth ====================

    /// Create a new account. The response carries the created user only;
    /// registering does not sign anyone in.
    pub async fn register(&self, body: &RegisterRequest) -> Result<User> {
        let url = self.url("/auth/register");
        let response = self.authed(self.client.post(&url)).await.json(body).send().await?;
        handle_response(response).await
    }

    /// Exchange credentials for the user record and a bearer token
    pub async fn login(&self, body: &LoginRequest) -> Result<AuthResponse> {
        let url = self.url("/auth/login");
        let response = self.client.post(&url).json(body).send().await?;
        handle_response(response).await
    }

    /// Ask the backend to mail a one-time password reset code
    pub async fn send_reset_otp(&self, body: &SendOtpRequest) -> Result<MessageResponse> {
        let url = self.url("/auth/send-otp");
        let response = self.client.post(&url).json(body).send().await?;
        handle_response(response).await
    }

    /// Set a new password using a previously mailed one-time code
    pub async fn reset_password(&self, body: &ResetPasswordRequest) -> Result<MessageResponse> {
        let url = self.url("/auth/reset-password");
        let response = self.client.post(&url).json(body).send().await?;
        handle_response(response).await
    }

    // ==================== Users ====================

    /// Fetch every user account
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let url = self.url("/users");
        let response = self.authed(self.client.get(&url)).await.send().await?;
        handle_response(response).await
    }

    /// Fetch a single user by internal id
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        let url = self.url(&format!("/users/{}", user_id));
        let response = self.authed(self.client.get(&url)).await.send().await?;
        handle_response(response).await
    }

    /// Apply a partial update and return the updated user
    pub async fn update_user(&self, user_id: &str, body: &UpdateUserRequest) -> Result<User> {
        let url = self.url(&format!("/users/{}", user_id));
        let response = self.authed(self.client.put(&url)).await.json(body).send().await?;
        handle_response(response).await
    }

    /// Delete a user account
    pub async fn delete_user(&self, user_id: &str) -> Result<MessageResponse> {
        let url = self.url(&format!("/users/{}", user_id));
        let response = self.authed(self.client.delete(&url)).await.send().await?;
        handle_response(response).await
    }

    // ==================== Favorites ====================

    /// Fetch a user's favorite records
    pub async fn list_favorites(&self, user_id: &str) -> Result<Vec<RelationshipRecord>> {
        let url = self.url(&format!("/favorites/{}", user_id));
        let response = self.authed(self.client.get(&url)).await.send().await?;
        handle_response(response).await
    }

    /// Record a favorite. The body carries whichever movie references the
    /// caller has resolved.
    pub async fn add_favorite(&self, body: &AddFavoriteRequest) -> Result<MessageResponse> {
        let url = self.url("/favorites");
        let response = self.authed(self.client.post(&url)).await.json(body).send().await?;
        handle_response(response).await
    }

    /// Remove a favorite. The backend keys removal off the request body,
    /// not the path.
    pub async fn remove_favorite(&self, body: &RemoveFavoriteRequest) -> Result<MessageResponse> {
        let url = self.url("/favorites");
        let response = self
            .authed(self.client.delete(&url))
            .await
            .json(body)
            .send()
            .await?;
        handle_response(response).await
    }

    // ==================== Watched ====================

    /// Fetch a user's watched records
    pub async fn list_watched(&self, user_id: &str) -> Result<Vec<RelationshipRecord>> {
        let url = self.url(&format!("/users/{}/watched", user_id));
        let response = self.authed(self.client.get(&url)).await.send().await?;
        handle_response(response).await
    }

    /// Mark a movie as watched. Both references ride the path; there is
    /// no request body.
    pub async fn add_watched(&self, user_id: &str, movie_ref: &str) -> Result<MessageResponse> {
        let url = self.url(&format!("/users/{}/watched/{}", user_id, movie_ref));
        let response = self.authed(self.client.post(&url)).await.send().await?;
        handle_response(response).await
    }

    // ==================== Movies ====================

    /// Fetch the full curated movie collection
    pub async fn list_movies(&self) -> Result<Vec<BackendMovie>> {
        let url = self.url("/movies");
        let response = self.authed(self.client.get(&url)).await.send().await?;
        handle_response(response).await
    }

    /// Fetch a curated movie by internal id
    pub async fn get_movie(&self, movie_id: &str) -> Result<BackendMovie> {
        let url = self.url(&format!("/movies/{}", movie_id));
        let response = self.authed(self.client.get(&url)).await.send().await?;
        handle_response(response).await
    }

    /// Create a curated movie and return the stored record
    pub async fn create_movie(&self, body: &CreateMovieRequest) -> Result<BackendMovie> {
        let url = self.url("/movies");
        let response = self.authed(self.client.post(&url)).await.json(body).send().await?;
        handle_response(response).await
    }

    /// Apply a partial update and return the updated movie
    pub async fn update_movie(
        &self,
        movie_id: &str,
        body: &UpdateMovieRequest,
    ) -> Result<BackendMovie> {
        let url = self.url(&format!("/movies/{}", movie_id));
        let response = self.authed(self.client.put(&url)).await.json(body).send().await?;
        handle_response(response).await
    }

    /// Delete a curated movie
    pub async fn delete_movie(&self, movie_id: &str) -> Result<MessageResponse> {
        let url = self.url(&format!("/movies/{}", movie_id));
        let response = self.authed(self.client.delete(&url)).await.send().await?;
        handle_response(response).await
    }
}

/// Classify a backend response. 401 and 403 become [`ClientError::Auth`]
/// so callers can tear down the session; every other failure keeps the
/// backend's own message when the body carries one.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        response.json::<T>().await.map_err(|e| {
            ClientError::InvalidResponse(format!("Failed to parse backend response: {}", e))
        })
    } else {
        let code = status.as_u16();
        let raw = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .map(|body| body.message)
            .unwrap_or(raw);

        if code == 401 || code == 403 {
            tracing::warn!(status = code, "Backend rejected request credential");
            Err(ClientError::Auth {
                status: code,
                message,
            })
        } else {
            Err(ClientError::Server {
                status: code,
                message,
            })
        }
    }
}
