//! Curated movie administration
//!
//! Create, edit, and delete movies the private backend owns. Catalog
//! movies are read-only reference data; editing and deletion guard on an
//! internal reference and refuse everything else. Drafts opened here
//! carry the monetary unit convention of their source, and submission
//! always converts back to whole USD (see `tikovia_types::draft`).

use std::sync::Arc;

use tikovia_client::{BackendClient, CreateMovieRequest, UpdateMovieRequest};
use tikovia_types::{BackendMovie, CanonicalMovie, MovieDraft, MovieRef};

use crate::error::{Result, SdkError};
use crate::resolver::MovieResolver;

/// Admin surface for the internally curated collection
pub struct Curation {
    backend: BackendClient,
    resolver: Arc<MovieResolver>,
}

impl Curation {
    pub fn new(backend: BackendClient, resolver: Arc<MovieResolver>) -> Self {
        Self { backend, resolver }
    }

    /// The full curated collection in canonical shape
    pub async fn list_movies(&self) -> Result<Vec<CanonicalMovie>> {
        let movies = self.backend.list_movies().await?;
        Ok(movies
            .into_iter()
            .map(BackendMovie::into_canonical)
            .collect())
    }

    /// Open an editable draft for the movie behind `reference`.
    ///
    /// Works for both identity spaces: drafting a catalog movie is how an
    /// external title gets imported into the curated collection.
    pub async fn open_draft(&self, reference: &str) -> Result<MovieDraft> {
        let movie = self.resolver.resolve(reference).await?;
        Ok(MovieDraft::from_canonical(&movie))
    }

    /// Create a curated movie from a draft.
    ///
    /// Monetary fields are converted back to whole USD. The title is also
    /// looked up in the catalog so a matching external id can be mirrored
    /// onto the new record; lookup failures just leave the mirror empty.
    pub async fn create_movie(&self, draft: &MovieDraft) -> Result<CanonicalMovie> {
        let (budget_usd, revenue_usd) = draft.monetary_usd();
        let tmdb_id = self.resolver.find_external_id(&draft.title).await?;

        let request = CreateMovieRequest {
            title: draft.title.clone(),
            poster_url: draft.poster_url.clone(),
            release_date: draft.release_date.clone(),
            runtime: draft.runtime_minutes,
            rating: draft.rating,
            vote_count: draft.vote_count,
            overview: draft.overview.clone(),
            genres: draft.genres(),
            budget_usd: Some(budget_usd),
            revenue_usd: Some(revenue_usd),
            production_company: draft.production_company.clone(),
            tmdb_id,
        };

        let created = self.backend.create_movie(&request).await?;
        Ok(created.into_canonical())
    }

    /// Replace a curated movie's fields with the draft's.
    ///
    /// `reference` must be an internal id; catalog movies cannot be
    /// edited.
    pub async fn update_movie(
        &self,
        reference: &str,
        draft: &MovieDraft,
    ) -> Result<CanonicalMovie> {
        let movie_id = require_internal(reference)?;
        let (budget_usd, revenue_usd) = draft.monetary_usd();

        let request = UpdateMovieRequest {
            title: Some(draft.title.clone()),
            poster_url: Some(draft.poster_url.clone()),
            release_date: Some(draft.release_date.clone()),
            runtime: Some(draft.runtime_minutes),
            rating: Some(draft.rating),
            vote_count: Some(draft.vote_count),
            overview: Some(draft.overview.clone()),
            genres: Some(draft.genres()),
            budget_usd: Some(budget_usd),
            revenue_usd: Some(revenue_usd),
            production_company: Some(draft.production_company.clone()),
        };

        let updated = self.backend.update_movie(&movie_id, &request).await?;
        Ok(updated.into_canonical())
    }

    /// Delete a curated movie. `reference` must be an internal id.
    pub async fn delete_movie(&self, reference: &str) -> Result<()> {
        let movie_id = require_internal(reference)?;
        self.backend.delete_movie(&movie_id).await?;
        Ok(())
    }
}

fn require_internal(reference: &str) -> Result<String> {
    match MovieRef::parse(reference) {
        Some(MovieRef::Internal(id)) => Ok(id),
        Some(MovieRef::External(_)) => Err(SdkError::Validation(
            "Only internally curated movies can be edited or deleted".to_string(),
        )),
        None => Err(SdkError::AmbiguousReference(reference.to_string())),
    }
}
