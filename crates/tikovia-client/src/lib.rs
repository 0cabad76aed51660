//! HTTP clients for the Tikovia movie backend and the external catalog
//!
//! Two transports with deliberately different credential handling:
//! [`BackendClient`] reads a per-user bearer token from a [`TokenSource`]
//! as each request is built, while [`CatalogClient`] installs a static
//! API key once at construction. Backend 401/403 responses surface as
//! [`ClientError::Auth`] so the caller can tear down the session; catalog
//! rejections never do.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tikovia_client::{
//!     BackendClient, BackendConfig, CatalogClient, CatalogConfig, StaticToken,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Backend calls read their bearer token when each request is built
//! let backend = BackendClient::new(BackendConfig::default(), Arc::new(StaticToken(None)));
//! let movies = backend.list_movies().await?;
//!
//! // The catalog authenticates with a static key instead
//! let catalog = CatalogClient::new(CatalogConfig {
//!     api_key: "catalog-key".into(),
//!     ..Default::default()
//! });
//! let page = catalog.search("fight club").await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod catalog;
pub mod error;
pub mod token;
pub mod types;

// Re-export main types
pub use backend::BackendClient;
pub use catalog::CatalogClient;
pub use error::{ClientError, Result};
pub use token::{StaticToken, TokenSource};
pub use types::*;
