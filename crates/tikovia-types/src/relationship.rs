//! Per-user relationship records (favorites, watched history)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Topic;
use crate::movie::{BackendMovie, MovieRef};

/// The two relationship kinds a user can hold toward a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Favorite,
    Watched,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::Watched => "watched",
        }
    }

    /// The invalidation topic published after a mutation of this kind
    pub fn topic(&self) -> Topic {
        match self {
            Self::Favorite => Topic::ReloadFavorites,
            Self::Watched => Topic::ReloadWatched,
        }
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A per-user edge linking an account to a movie.
///
/// Exactly one of the movie references is authoritative; the other may be
/// filled opportunistically so a record can be matched against either
/// identity space. The backend may embed the full internal movie document
/// (`movie`) on records whose movie it curates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRecord {
    /// Backend record id
    #[serde(rename = "_id")]
    pub record_id: String,
    pub user_id: String,
    /// Internal movie reference (24-hex), when known
    #[serde(rename = "movieId", default, skip_serializing_if = "Option::is_none")]
    pub internal_movie_ref: Option<String>,
    /// External catalog reference, when known
    #[serde(rename = "tmdbId", default, skip_serializing_if = "Option::is_none")]
    pub external_movie_ref: Option<u64>,
    /// Embedded internal movie document, when the backend populated it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<BackendMovie>,
    pub created_at: DateTime<Utc>,
}

impl RelationshipRecord {
    /// Whether this record resolves to the movie named by `target`.
    ///
    /// Both reference fields and the embedded movie document are compared,
    /// since the same movie may be known by either id. This comparison backs
    /// the de-duplication invariant: for a `(user, kind)` pair no two records
    /// may reference the same underlying movie.
    pub fn references(&self, target: &MovieRef) -> bool {
        match target {
            MovieRef::Internal(id) => {
                self.internal_movie_ref.as_deref() == Some(id.as_str())
                    || self.movie.as_ref().map(|m| m.id.as_str()) == Some(id.as_str())
            }
            MovieRef::External(id) => {
                self.external_movie_ref == Some(*id)
                    || self.movie.as_ref().and_then(|m| m.tmdb_id) == Some(*id)
            }
        }
    }

    /// The reference to resolve this record for display: the external id
    /// when present, else the internal one.
    pub fn display_ref(&self) -> Option<MovieRef> {
        if let Some(id) = self.external_movie_ref {
            return Some(MovieRef::External(id));
        }
        self.internal_movie_ref
            .clone()
            .map(MovieRef::Internal)
            .or_else(|| self.movie.as_ref().map(|m| MovieRef::Internal(m.id.clone())))
    }
}
