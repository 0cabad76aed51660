//! The curation form boundary
//!
//! Drafts are the editable projection of a movie: genres flatten to a
//! comma-joined string, and monetary fields carry source-dependent units.
//! The catalog reports raw whole dollars, so external drafts present
//! millions and multiply back on submission; internal drafts present and
//! submit whole dollars unchanged, so a stored value round-trips exactly.

use serde::{Deserialize, Serialize};

use crate::movie::CanonicalMovie;

const MILLION: f64 = 1_000_000.0;

/// Which source a draft was opened from. Decides the monetary units the
/// form fields carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftSource {
    /// Whole-dollar fields, submitted unchanged
    Internal,
    /// Millions-facing fields, multiplied back on submission
    External,
}

impl DraftSource {
    /// The source a canonical movie edits under: internal when curated,
    /// external otherwise.
    pub fn of(movie: &CanonicalMovie) -> Self {
        if movie.internal_id.is_some() {
            Self::Internal
        } else {
            Self::External
        }
    }
}

/// Editable projection of a movie for the curation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDraft {
    pub source: DraftSource,
    pub title: String,
    pub poster_url: String,
    pub release_date: String,
    pub overview: String,
    pub rating: f64,
    pub vote_count: u64,
    pub runtime_minutes: u32,
    /// Comma-joined genre names
    pub genres_text: String,
    /// Budget in the units of the draft source
    pub budget: f64,
    /// Revenue in the units of the draft source
    pub revenue: f64,
    pub production_company: String,
}

impl MovieDraft {
    /// An empty draft for creating a new curated movie.
    pub fn blank() -> Self {
        Self {
            source: DraftSource::Internal,
            title: String::new(),
            poster_url: String::new(),
            release_date: String::new(),
            overview: String::new(),
            rating: 0.0,
            vote_count: 0,
            runtime_minutes: 0,
            genres_text: String::new(),
            budget: 0.0,
            revenue: 0.0,
            production_company: String::new(),
        }
    }

    /// Open a draft from a canonical movie.
    ///
    /// External movies load their monetary fields divided into millions;
    /// internal movies load whole dollars unchanged.
    pub fn from_canonical(movie: &CanonicalMovie) -> Self {
        let source = DraftSource::of(movie);
        let (budget, revenue) = match source {
            DraftSource::Internal => (movie.budget_usd, movie.revenue_usd),
            DraftSource::External => (movie.budget_usd / MILLION, movie.revenue_usd / MILLION),
        };

        Self {
            source,
            title: movie.title.clone(),
            poster_url: movie.poster_url.clone(),
            release_date: movie.release_date.clone(),
            overview: movie.overview.clone(),
            rating: movie.rating,
            vote_count: movie.vote_count,
            runtime_minutes: movie.runtime_minutes,
            genres_text: movie.genres.join(", "),
            budget,
            revenue,
            production_company: movie.production_company.clone(),
        }
    }

    /// Genre names parsed back from the comma-joined field: trimmed,
    /// empties dropped, order preserved.
    pub fn genres(&self) -> Vec<String> {
        self.genres_text
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from)
            .collect()
    }

    /// `(budget, revenue)` in whole USD, undoing the source's display units.
    pub fn monetary_usd(&self) -> (f64, f64) {
        match self.source {
            DraftSource::Internal => (self.budget, self.revenue),
            DraftSource::External => (self.budget * MILLION, self.revenue * MILLION),
        }
    }
}
