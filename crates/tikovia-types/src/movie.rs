//! Movie identity spaces and the canonical merged shape
//!
//! Two sources own movie data: the private backend (24-hex object ids) and
//! the third-party catalog (small integer ids). A reference belongs to
//! exactly one source, decided by id shape alone, and every fetched movie is
//! normalized into [`CanonicalMovie`] so screens never branch on origin.

use serde::{Deserialize, Serialize};

/// Sentinel for string fields a source left empty
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// MovieRef - classified references
// =============================================================================

/// A classified movie reference.
///
/// Classification is by id shape: exactly 24 hexadecimal characters is an
/// internal (backend) id, any non-negative integer is an external (catalog)
/// id. No other heuristics are applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovieRef {
    /// Backend-curated movie (24-hex object id)
    Internal(String),
    /// Catalog movie (small integer id)
    External(u64),
}

impl MovieRef {
    /// Classify a raw reference string.
    ///
    /// Returns `None` when the reference fits neither identity space.
    /// Callers treat that as a programming error, never as a fallback case.
    pub fn parse(reference: &str) -> Option<Self> {
        if reference.len() == 24 && reference.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Some(Self::Internal(reference.to_string()));
        }
        reference.parse::<u64>().ok().map(Self::External)
    }

    /// The source that owns this reference
    pub fn source(&self) -> MovieSource {
        match self {
            Self::Internal(_) => MovieSource::Backend,
            Self::External(_) => MovieSource::Catalog,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

impl std::fmt::Display for MovieRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal(id) => write!(f, "{}", id),
            Self::External(id) => write!(f, "{}", id),
        }
    }
}

/// The two movie sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieSource {
    /// The private backend (curated movies)
    Backend,
    /// The third-party catalog
    Catalog,
}

impl MovieSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Catalog => "catalog",
        }
    }
}

impl std::fmt::Display for MovieSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// CanonicalMovie - the unified shape
// =============================================================================

/// The unified movie shape produced by the identity resolver regardless of
/// source.
///
/// At least one of `external_id` / `internal_id` is set per source; an
/// internally curated movie may additionally carry a mirrored `external_id`
/// once a catalog match is known. Monetary fields are whole USD for both
/// sources; millions conversion happens only at the editing boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMovie {
    /// Catalog id, when the movie exists in the external catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<u64>,
    /// Backend object id, when the movie is internally curated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,
    pub title: String,
    pub poster_url: String,
    pub release_date: String,
    pub overview: String,
    pub rating: f64,
    pub vote_count: u64,
    pub runtime_minutes: u32,
    /// Genre names, source order preserved
    pub genres: Vec<String>,
    #[serde(rename = "budgetUSD")]
    pub budget_usd: f64,
    #[serde(rename = "revenueUSD")]
    pub revenue_usd: f64,
    pub production_company: String,
}

impl CanonicalMovie {
    /// The reference a relationship record should store for this movie:
    /// the owning source's id, preferring the internal one when both exist.
    pub fn primary_ref(&self) -> Option<MovieRef> {
        if let Some(ref id) = self.internal_id {
            return Some(MovieRef::Internal(id.clone()));
        }
        self.external_id.map(MovieRef::External)
    }
}

// =============================================================================
// BackendMovie - the backend wire shape
// =============================================================================

/// An internally curated movie as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendMovie {
    /// Backend object id (24 hex characters)
    #[serde(rename = "_id")]
    pub id: String,
    /// Mirrored catalog id, when a catalog match has been recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u64>,
    /// Runtime in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    /// Whole dollars
    #[serde(rename = "budgetUSD", default, skip_serializing_if = "Option::is_none")]
    pub budget_usd: Option<f64>,
    /// Whole dollars
    #[serde(rename = "revenueUSD", default, skip_serializing_if = "Option::is_none")]
    pub revenue_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_company: Option<String>,
}

impl BackendMovie {
    /// Map into the canonical shape.
    ///
    /// Absent fields default deterministically: strings to `"N/A"`, numbers
    /// to 0, the genre list to empty. Monetary fields are already whole USD
    /// and pass through unchanged.
    pub fn into_canonical(self) -> CanonicalMovie {
        CanonicalMovie {
            external_id: self.tmdb_id,
            internal_id: Some(self.id),
            title: or_not_available(self.title),
            poster_url: or_not_available(self.poster_url),
            release_date: or_not_available(self.release_date),
            overview: or_not_available(self.overview),
            rating: self.rating.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            runtime_minutes: self.runtime.unwrap_or(0),
            genres: self.genres.unwrap_or_default(),
            budget_usd: self.budget_usd.unwrap_or(0.0),
            revenue_usd: self.revenue_usd.unwrap_or(0.0),
            production_company: or_not_available(self.production_company),
        }
    }
}

// =============================================================================
// CatalogMovie - the catalog wire shape
// =============================================================================

/// `{id, name}` pairs the catalog uses for genres and production companies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
}

/// A movie as the catalog service reports it (snake_case wire fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMovie {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u64>,
    /// Runtime in minutes, present on detail responses only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<NamedEntry>,
    /// Raw whole dollars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// Raw whole dollars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub production_companies: Vec<NamedEntry>,
}

impl CatalogMovie {
    /// Map into the canonical shape.
    ///
    /// Poster paths that are not already fully qualified URLs are prefixed
    /// with the catalog image base. Genre and company `{id, name}` lists
    /// flatten to names; the same deterministic defaults apply as on the
    /// backend path.
    pub fn into_canonical(self, image_base: &str) -> CanonicalMovie {
        let production_company = if self.production_companies.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            self.production_companies
                .into_iter()
                .map(|c| c.name)
                .collect::<Vec<_>>()
                .join(", ")
        };

        CanonicalMovie {
            external_id: Some(self.id),
            internal_id: None,
            title: or_not_available(self.title),
            poster_url: expand_poster(self.poster_path, image_base),
            release_date: or_not_available(self.release_date),
            overview: or_not_available(self.overview),
            rating: self.vote_average.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            runtime_minutes: self.runtime.unwrap_or(0),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            budget_usd: self.budget.unwrap_or(0.0),
            revenue_usd: self.revenue.unwrap_or(0.0),
            production_company,
        }
    }
}

/// One page of catalog search or discover results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<CatalogMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

// =============================================================================
// Helpers
// =============================================================================

fn or_not_available(value: Option<String>) -> String {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn expand_poster(path: Option<String>, image_base: &str) -> String {
    match path {
        Some(p) if p.starts_with("http://") || p.starts_with("https://") => p,
        Some(p) if !p.is_empty() => format!("{}{}", image_base, p),
        _ => NOT_AVAILABLE.to_string(),
    }
}
