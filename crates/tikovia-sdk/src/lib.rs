//! Tikovia SDK - client core for the Tikovia movie app
//!
//! Everything a UI shell needs short of rendering: session lifecycle over
//! a persisted credential pair, movie resolution across the two identity
//! spaces (internal 24-hex ids and external catalog ids), cached
//! favorites/watched lists with invalidation events, and the curated
//! collection's admin surface.
//!
//! # Architecture
//!
//! [`TikoviaCore`] wires the pieces together around two HTTP clients from
//! `tikovia-client`:
//! - **Backend** requests read their bearer token from the session store
//!   as each request is built, so every component sees credential changes
//!   immediately.
//! - **Catalog** requests use a static API key; catalog failures never
//!   touch the session.
//!
//! State lives in three places only: the session value (reducer-driven),
//! the session store (persisted pair), and the relationship cache
//! (read-through, invalidated on every write).
//!
//! # Example
//!
//! ```rust,no_run
//! use tikovia_sdk::{BackendConfig, CatalogConfig, RelationshipKind, TikoviaCore, Topic};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let core = TikoviaCore::new(
//!     BackendConfig::default(),
//!     CatalogConfig {
//!         api_key: "catalog-key".into(),
//!         ..Default::default()
//!     },
//! );
//!
//! // Restore any persisted session, then sign in
//! core.session().bootstrap().await;
//! let user = core.session().login("dev@tikovia.com", "secret").await?;
//!
//! // React to favorites changes anywhere in the app
//! let _sub = core.bus().subscribe(Topic::ReloadFavorites, |_| {
//!     // refresh the favorites screen
//! });
//!
//! // Record a favorite by catalog id and read the list back
//! core.relationships()
//!     .add(&user.id, RelationshipKind::Favorite, "27205")
//!     .await?;
//! let favorites = core
//!     .relationships()
//!     .list(&user.id, RelationshipKind::Favorite)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

// Invalidation events
pub mod bus;

// Curated collection administration
pub mod curation;

// Error types
pub mod error;

// Favorites and watched history
pub mod relationships;

// Movie reference resolution
pub mod resolver;

// Session state, persistence, and lifecycle
pub mod session;

// Re-export SDK types
pub use bus::{EventBus, Subscription};
pub use curation::Curation;
pub use error::{Result, SdkError};
pub use relationships::RelationshipStore;
pub use resolver::MovieResolver;
pub use session::{
    MemorySessionStore, PersistedSession, SessionManager, SessionStore, SessionTokens,
};

// Re-export from underlying crates
pub use tikovia_client::{
    BackendClient, BackendConfig, CatalogClient, CatalogConfig, ClientError, StaticToken,
    TokenSource,
};
pub use tikovia_types::{
    reduce, BackendMovie, CanonicalMovie, CatalogMovie, CatalogPage, DraftSource, MovieDraft,
    MovieRef, MovieSource, RelationshipKind, RelationshipRecord, Role, Session, SessionAction,
    Topic, User, DEFAULT_AVATAR_URL,
};

/// The assembled client core.
///
/// One instance per app process. All components share one event bus, one
/// session store, and one resolver, so a mutation in any of them is
/// visible to the rest.
pub struct TikoviaCore {
    bus: EventBus,
    resolver: Arc<MovieResolver>,
    session: SessionManager,
    relationships: RelationshipStore,
    curation: Curation,
}

impl TikoviaCore {
    /// Assemble the core with an in-memory session store. Sessions won't
    /// survive a restart; embedders with durable storage should use
    /// [`with_store`](Self::with_store).
    pub fn new(backend_config: BackendConfig, catalog_config: CatalogConfig) -> Self {
        Self::with_store(
            backend_config,
            catalog_config,
            Arc::new(MemorySessionStore::new()),
        )
    }

    /// Assemble the core over a caller-supplied session store
    pub fn with_store(
        backend_config: BackendConfig,
        catalog_config: CatalogConfig,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let tokens = Arc::new(SessionTokens::new(store.clone()));
        let backend = BackendClient::new(backend_config, tokens);
        let catalog = CatalogClient::new(catalog_config);

        let bus = EventBus::new();
        let resolver = Arc::new(MovieResolver::new(backend.clone(), catalog));
        let session = SessionManager::new(backend.clone(), store);
        let relationships =
            RelationshipStore::new(backend.clone(), resolver.clone(), bus.clone());
        let curation = Curation::new(backend, resolver.clone());

        Self {
            bus,
            resolver,
            session,
            relationships,
            curation,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn relationships(&self) -> &RelationshipStore {
        &self.relationships
    }

    pub fn curation(&self) -> &Curation {
        &self.curation
    }

    pub fn resolver(&self) -> &MovieResolver {
        &self.resolver
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}
