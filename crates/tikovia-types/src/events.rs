//! Cross-screen invalidation topics

use serde::{Deserialize, Serialize};

/// Topics carried by the event bus.
///
/// One topic per relationship kind. Publishing tells any mounted screen
/// that its copy of the corresponding list is stale and must be re-fetched;
/// the payload, when present, is free-form JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "reloadFavorites")]
    ReloadFavorites,
    #[serde(rename = "reloadWatched")]
    ReloadWatched,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReloadFavorites => "reloadFavorites",
            Self::ReloadWatched => "reloadWatched",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
