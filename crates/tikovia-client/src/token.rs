//! Bearer credential lookup for backend requests

use async_trait::async_trait;

/// Supplies the bearer token attached to backend requests.
///
/// The token is read at request time, not at client construction, so a
/// login or logout between two calls changes what the very next request
/// sends. `None` sends the request unauthenticated.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn bearer_token(&self) -> Option<String>;
}

/// Fixed token, or fixed absence of one. Useful for tests and for
/// anonymous-only flows.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

#[async_trait]
impl TokenSource for StaticToken {
    async fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}
