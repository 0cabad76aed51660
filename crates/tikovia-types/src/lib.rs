//! Tikovia Types
//!
//! Shared domain model for the Tikovia movie client core.
//!
//! ## Core Concepts
//!
//! 1. **MovieRef** - a classified movie reference: internal 24-hex object id
//!    or external catalog id, decided by id shape alone
//! 2. **CanonicalMovie** - the unified movie shape produced regardless of
//!    which source owns the reference
//! 3. **RelationshipRecord** - a per-user favorite/watched edge into either
//!    identity space
//! 4. **Session** - reducer-driven authentication state with exactly two
//!    actions (login, logout)
//! 5. **Topic** - cross-screen invalidation topics carried by the event bus
//! 6. **MovieDraft** - the editable projection of a movie at the curation
//!    form boundary
//!
//! This crate is serde-only: no I/O, no async, no HTTP types.

// Curation form boundary
pub mod draft;

// Event bus topics
pub mod events;

// Movie identity spaces, canonical shape, wire shapes
pub mod movie;

// Per-user relationship records
pub mod relationship;

// Session state and reducer
pub mod session;

// Accounts and roles
pub mod user;

// Re-export the domain types at crate root
pub use draft::{DraftSource, MovieDraft};
pub use events::Topic;
pub use movie::{
    BackendMovie, CanonicalMovie, CatalogMovie, CatalogPage, MovieRef, MovieSource, NamedEntry,
    NOT_AVAILABLE,
};
pub use relationship::{RelationshipKind, RelationshipRecord};
pub use session::{reduce, Session, SessionAction};
pub use user::{Role, User, DEFAULT_AVATAR_URL};
