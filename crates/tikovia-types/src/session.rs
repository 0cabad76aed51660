//! Session state and its reducer
//!
//! The authentication lifecycle is modeled as a reducer over a typed state
//! value with exactly two actions. Both fields change together; there is no
//! partially authenticated state.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Client-side session state.
///
/// Invariant: `user` is `Some` iff `is_authenticated` is true. The reducer
/// is the only constructor of new states, so the invariant holds by
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<User>,
}

impl Session {
    /// The initial, anonymous state
    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            user: None,
        }
    }

    /// An authenticated state for the given user
    pub fn authenticated(user: User) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
        }
    }

    /// Holds iff the two fields agree
    pub fn is_consistent(&self) -> bool {
        self.is_authenticated == self.user.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// The two session actions.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// A successful credential exchange produced this user
    Login(User),
    /// Explicit sign-out, or a forced one after a credential was rejected
    Logout,
}

/// Pure session reducer. Every transition goes through here.
pub fn reduce(_state: &Session, action: SessionAction) -> Session {
    match action {
        SessionAction::Login(user) => Session::authenticated(user),
        SessionAction::Logout => Session::anonymous(),
    }
}
