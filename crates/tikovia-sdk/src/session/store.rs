//! Persistence for the authenticated session
//!
//! The session survives process restarts as two key-value entries, a
//! serialized user record and the bearer token, always written and
//! cleared together. Writes are serialized behind one lock so a login
//! racing a logout cannot interleave and strand half a pair.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tikovia_client::TokenSource;
use tikovia_types::User;

use crate::error::{Result, SdkError};

/// Key holding the serialized user record
pub const KEY_CURRENT_USER: &str = "currentUser";
/// Key holding the bearer credential
pub const KEY_TOKEN: &str = "token";

/// The user/token pair a store hands back on load
#[derive(Debug, Clone)]
pub struct PersistedSession {
    pub user: User,
    pub token: String,
}

/// Durable storage for the session pair.
///
/// Implementations must treat the pair as one unit: `save` writes both
/// entries, `clear` removes both, and `load` returns `None` unless both
/// are present.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the persisted pair, if a complete one exists
    async fn load(&self) -> Result<Option<PersistedSession>>;

    /// Write the pair, replacing any previous session
    async fn save(&self, user: &User, token: &str) -> Result<()>;

    /// Remove both entries
    async fn clear(&self) -> Result<()>;

    /// Read just the bearer credential
    async fn token(&self) -> Result<Option<String>> {
        Ok(self.load().await?.map(|session| session.token))
    }
}

/// In-memory key-value store, the default backing when the host app does
/// not supply a durable one
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        let entries = self.entries.lock().await;

        let (raw_user, token) = match (entries.get(KEY_CURRENT_USER), entries.get(KEY_TOKEN)) {
            (Some(user), Some(token)) => (user.clone(), token.clone()),
            _ => return Ok(None),
        };

        let user: User = serde_json::from_str(&raw_user)
            .map_err(|e| SdkError::Serialization(format!("Persisted user is corrupt: {}", e)))?;

        Ok(Some(PersistedSession { user, token }))
    }

    async fn save(&self, user: &User, token: &str) -> Result<()> {
        let serialized = serde_json::to_string(user)
            .map_err(|e| SdkError::Serialization(e.to_string()))?;

        let mut entries = self.entries.lock().await;
        entries.insert(KEY_CURRENT_USER.to_string(), serialized);
        entries.insert(KEY_TOKEN.to_string(), token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.remove(KEY_CURRENT_USER);
        entries.remove(KEY_TOKEN);
        Ok(())
    }
}

/// Bridges the session store into the backend client's credential seam.
///
/// The backend client asks for the bearer token as each request is built;
/// this adapter answers from whatever the store holds at that moment. A
/// store failure is logged and treated as "no credential" so a broken
/// store degrades to unauthenticated requests instead of wedging every
/// call.
#[derive(Clone)]
pub struct SessionTokens {
    store: Arc<dyn SessionStore>,
}

impl SessionTokens {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TokenSource for SessionTokens {
    async fn bearer_token(&self) -> Option<String> {
        match self.store.token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session credential");
                None
            }
        }
    }
}
