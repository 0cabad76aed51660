//! Movie reference resolution across the two identity spaces
//!
//! A reference string is classified exactly once: 24 hex characters means
//! the private backend, a small integer means the external catalog. Each
//! fetch goes to the owning source only; a miss there is a final answer,
//! never a cue to try the other source. Unclassifiable references fail
//! before any request is made.

use std::collections::HashMap;

use tokio::sync::Mutex;

use tikovia_client::{BackendClient, CatalogClient, ClientError};
use tikovia_types::{CanonicalMovie, MovieRef, MovieSource};

use crate::error::{Result, SdkError};

/// Resolves movie references to the canonical shape
pub struct MovieResolver {
    backend: BackendClient,
    catalog: CatalogClient,
    /// Catalog entries are immutable, so external detail fetches are kept
    /// for the life of the resolver. Internal movies are editable and are
    /// never memoized.
    memo: Mutex<HashMap<u64, CanonicalMovie>>,
}

impl MovieResolver {
    pub fn new(backend: BackendClient, catalog: CatalogClient) -> Self {
        Self {
            backend,
            catalog,
            memo: Mutex::new(HashMap::new()),
        }
    }

    /// Classify `reference` and fetch the movie from its owning source
    pub async fn resolve(&self, reference: &str) -> Result<CanonicalMovie> {
        let movie_ref = MovieRef::parse(reference)
            .ok_or_else(|| SdkError::AmbiguousReference(reference.to_string()))?;
        self.resolve_ref(&movie_ref).await
    }

    /// Fetch the movie behind an already-classified reference
    pub async fn resolve_ref(&self, movie_ref: &MovieRef) -> Result<CanonicalMovie> {
        match movie_ref {
            MovieRef::Internal(id) => {
                let movie = self
                    .backend
                    .get_movie(id)
                    .await
                    .map_err(|e| resolution_error(MovieSource::Backend, e))?;
                Ok(movie.into_canonical())
            }
            MovieRef::External(id) => {
                {
                    let memo = self.memo.lock().await;
                    if let Some(hit) = memo.get(id) {
                        return Ok(hit.clone());
                    }
                }

                let movie = self
                    .catalog
                    .get_movie(*id)
                    .await
                    .map_err(|e| resolution_error(MovieSource::Catalog, e))?;
                let canonical = movie.into_canonical(self.catalog.image_base());

                self.memo.lock().await.insert(*id, canonical.clone());
                Ok(canonical)
            }
        }
    }

    /// Search the catalog, or browse by popularity when `query` is blank.
    /// List results are partial (no runtime or monetary figures) and are
    /// not memoized.
    pub async fn browse(&self, query: &str) -> Result<Vec<CanonicalMovie>> {
        let page = self
            .catalog
            .search(query)
            .await
            .map_err(|e| resolution_error(MovieSource::Catalog, e))?;

        let image_base = self.catalog.image_base();
        Ok(page
            .results
            .into_iter()
            .map(|movie| movie.into_canonical(image_base))
            .collect())
    }

    /// Best-effort catalog id lookup by title: the first search hit, or
    /// `None`. Lookup failures are logged and swallowed; callers use the
    /// id only to enrich records, never as a required input.
    pub async fn find_external_id(&self, title: &str) -> Result<Option<u64>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        match self.catalog.search(title).await {
            Ok(page) => Ok(page.results.first().map(|movie| movie.id)),
            Err(e) => {
                tracing::warn!(error = %e, title, "Catalog title lookup failed");
                Ok(None)
            }
        }
    }
}

/// Keep backend credential rejections on the session-teardown path;
/// everything else becomes a resolution failure naming the source.
fn resolution_error(source: MovieSource, err: ClientError) -> SdkError {
    match err {
        ClientError::Auth { status, message } => SdkError::Auth { status, message },
        other => {
            let status = other.status();
            SdkError::Resolution {
                source,
                status,
                message: other.to_string(),
            }
        }
    }
}
