//! Session lifecycle driver
//!
//! Owns the in-memory session value and keeps it in step with the
//! persisted pair. All transitions funnel through the two-action reducer
//! in `tikovia-types`; this type decides when to dispatch and what to
//! persist first.

use std::sync::Arc;

use tokio::sync::Mutex;

use tikovia_client::{
    BackendClient, LoginRequest, MessageResponse, RegisterRequest, ResetPasswordRequest,
    SendOtpRequest, UpdateUserRequest,
};
use tikovia_types::{reduce, Role, Session, SessionAction, User, DEFAULT_AVATAR_URL};

use crate::error::{Result, SdkError};
use crate::session::store::SessionStore;

/// Drives login, logout, bootstrap, and the account surface
pub struct SessionManager {
    backend: BackendClient,
    store: Arc<dyn SessionStore>,
    state: Mutex<Session>,
}

impl SessionManager {
    /// Create a manager starting from the anonymous state
    pub fn new(backend: BackendClient, store: Arc<dyn SessionStore>) -> Self {
        Self {
            backend,
            store,
            state: Mutex::new(Session::anonymous()),
        }
    }

    // ==================== Lifecycle ====================

    /// Restore the session persisted by a previous process, if any.
    ///
    /// A persisted user is trusted without re-validating the credential;
    /// the first authenticated request to fail with an auth error tears
    /// the session back down. A store read failure starts anonymous.
    pub async fn bootstrap(&self) -> Session {
        match self.store.load().await {
            Ok(Some(persisted)) => {
                let mut state = self.state.lock().await;
                *state = reduce(&state, SessionAction::Login(persisted.user));
                state.clone()
            }
            Ok(None) => self.session().await,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session, starting anonymous");
                self.session().await
            }
        }
    }

    /// Exchange credentials for a session.
    ///
    /// The pair is persisted before the in-memory transition, so a crash
    /// between the two never leaves an authenticated state without
    /// persisted credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(SdkError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let auth = self
            .backend
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.store.save(&auth.user, &auth.token).await?;

        let mut state = self.state.lock().await;
        *state = reduce(&state, SessionAction::Login(auth.user.clone()));
        Ok(auth.user)
    }

    /// Create an account. Registration never signs the new account in;
    /// an explicit login must follow. A blank avatar URL gets the stock
    /// avatar.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        avatar_url: &str,
        role: Role,
    ) -> Result<User> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(SdkError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let avatar = avatar_url.trim();
        let avatar = if avatar.is_empty() {
            DEFAULT_AVATAR_URL.to_string()
        } else {
            avatar.to_string()
        };

        let created = self
            .backend
            .register(&RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                avatar_url: avatar,
                role,
            })
            .await?;
        Ok(created)
    }

    /// End the session: clear the persisted pair, then go anonymous
    pub async fn logout(&self) -> Result<()> {
        self.store.clear().await?;
        let mut state = self.state.lock().await;
        *state = reduce(&state, SessionAction::Logout);
        Ok(())
    }

    /// Tear the session down after the backend rejected its credential.
    ///
    /// Unlike [`logout`](Self::logout), the in-memory transition happens
    /// even when the store cannot be cleared; a rejected credential must
    /// never keep presenting as signed-in.
    pub async fn handle_auth_failure(&self) {
        if let Err(e) = self.store.clear().await {
            tracing::warn!(error = %e, "Failed to clear session store after auth failure");
        }
        let mut state = self.state.lock().await;
        *state = reduce(&state, SessionAction::Logout);
    }

    /// Snapshot of the current session
    pub async fn session(&self) -> Session {
        self.state.lock().await.clone()
    }

    /// The signed-in user, if any
    pub async fn current_user(&self) -> Option<User> {
        self.state.lock().await.user.clone()
    }

    // ==================== Account management ====================

    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.backend.list_users().await?)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        Ok(self.backend.get_user(user_id).await?)
    }

    /// Apply a partial update to a user.
    ///
    /// When the target is the signed-in user, the persisted pair is
    /// rewritten with the response (same token) and the in-memory session
    /// picks up the new record. Updates to other users touch nothing
    /// locally.
    pub async fn update_user(&self, user_id: &str, changes: &UpdateUserRequest) -> Result<User> {
        let updated = self.backend.update_user(user_id, changes).await?;

        let mut state = self.state.lock().await;
        let is_current = state
            .user
            .as_ref()
            .map(|user| user.id == updated.id)
            .unwrap_or(false);

        if is_current {
            if let Some(persisted) = self.store.load().await? {
                self.store.save(&updated, &persisted.token).await?;
            }
            *state = reduce(&state, SessionAction::Login(updated.clone()));
        }

        Ok(updated)
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<MessageResponse> {
        Ok(self.backend.delete_user(user_id).await?)
    }

    // ==================== Password reset ====================

    /// Ask the backend to mail a one-time reset code
    pub async fn send_reset_otp(&self, email: &str) -> Result<MessageResponse> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SdkError::Validation("Email is required".to_string()));
        }
        Ok(self
            .backend
            .send_reset_otp(&SendOtpRequest {
                email: email.to_string(),
            })
            .await?)
    }

    /// Complete the reset with the mailed code. Session state is
    /// untouched; a successful reset still requires a normal login.
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<MessageResponse> {
        let email = email.trim();
        if email.is_empty() || otp.trim().is_empty() || new_password.is_empty() {
            return Err(SdkError::Validation(
                "Email, code, and new password are required".to_string(),
            ));
        }
        Ok(self
            .backend
            .reset_password(&ResetPasswordRequest {
                email: email.to_string(),
                otp: otp.trim().to_string(),
                new_password: new_password.to_string(),
            })
            .await?)
    }
}
