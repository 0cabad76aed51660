//! Session state, persistence, and lifecycle

mod manager;
mod store;

pub use manager::SessionManager;
pub use store::{
    MemorySessionStore, PersistedSession, SessionStore, SessionTokens, KEY_CURRENT_USER, KEY_TOKEN,
};
