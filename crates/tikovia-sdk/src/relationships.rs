//! Favorites and watched history
//!
//! One store per process fronts both relationship kinds with a
//! read-through cache keyed by `(user, kind)`. Every successful mutation
//! invalidates the cached list first and then publishes the kind's
//! invalidation topic, so subscribers that re-read through the store see
//! the post-write state. De-duplication happens here, against the cached
//! list, which is why a duplicate add never reaches the network.
//!
//! The watched history is append-only at the backend surface; removal is
//! a favorites-only operation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use tikovia_client::{AddFavoriteRequest, BackendClient, RemoveFavoriteRequest};
use tikovia_types::{CanonicalMovie, MovieRef, RelationshipKind, RelationshipRecord};

use crate::bus::EventBus;
use crate::error::{Result, SdkError};
use crate::resolver::MovieResolver;

type CacheKey = (String, RelationshipKind);

/// Read-through store for a user's favorites and watched history
pub struct RelationshipStore {
    backend: BackendClient,
    resolver: Arc<MovieResolver>,
    bus: EventBus,
    cache: Mutex<HashMap<CacheKey, Vec<RelationshipRecord>>>,
}

impl RelationshipStore {
    pub fn new(backend: BackendClient, resolver: Arc<MovieResolver>, bus: EventBus) -> Self {
        Self {
            backend,
            resolver,
            bus,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The bus this store publishes invalidation topics on
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// A user's records of one kind, newest first.
    ///
    /// Served from cache when the list was fetched before and no mutation
    /// has invalidated it since.
    pub async fn list(
        &self,
        user_id: &str,
        kind: RelationshipKind,
    ) -> Result<Vec<RelationshipRecord>> {
        let key = (user_id.to_string(), kind);

        {
            let cache = self.cache.lock().await;
            if let Some(records) = cache.get(&key) {
                return Ok(records.clone());
            }
        }

        let mut records = match kind {
            RelationshipKind::Favorite => self.backend.list_favorites(user_id).await?,
            RelationshipKind::Watched => self.backend.list_watched(user_id).await?,
        };
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        self.cache.lock().await.insert(key, records.clone());
        Ok(records)
    }

    /// Record a movie in a user's list and return the stored record.
    ///
    /// The reference is classified up front; a reference already present
    /// in the cached list (by either id, including through an embedded
    /// movie document) is refused before any request is made. After the
    /// write the cached list is dropped, the kind's topic is published,
    /// and the record is read back from the refreshed list.
    pub async fn add(
        &self,
        user_id: &str,
        kind: RelationshipKind,
        reference: &str,
    ) -> Result<RelationshipRecord> {
        let movie_ref = MovieRef::parse(reference)
            .ok_or_else(|| SdkError::AmbiguousReference(reference.to_string()))?;

        let existing = self.list(user_id, kind).await?;
        if existing.iter().any(|record| record.references(&movie_ref)) {
            return Err(SdkError::Duplicate {
                kind,
                reference: reference.to_string(),
            });
        }

        match kind {
            RelationshipKind::Favorite => {
                let request = match &movie_ref {
                    MovieRef::External(id) => AddFavoriteRequest {
                        user_id: user_id.to_string(),
                        tmdb_id: Some(*id),
                        movie_id: None,
                    },
                    MovieRef::Internal(id) => {
                        // Carry the catalog mirror too, when the curated
                        // movie has one, so the record matches either
                        // identity space later.
                        let movie = self.resolver.resolve_ref(&movie_ref).await?;
                        AddFavoriteRequest {
                            user_id: user_id.to_string(),
                            tmdb_id: movie.external_id,
                            movie_id: Some(id.clone()),
                        }
                    }
                };
                self.backend.add_favorite(&request).await?;
            }
            RelationshipKind::Watched => {
                self.backend.add_watched(user_id, reference).await?;
            }
        }

        self.invalidate(user_id, kind).await;
        self.bus.publish(kind.topic());

        let records = self.list(user_id, kind).await?;
        records
            .into_iter()
            .find(|record| record.references(&movie_ref))
            .ok_or_else(|| {
                SdkError::InvalidResponse(format!(
                    "Added {} record for {} is missing from the refreshed list",
                    kind, reference
                ))
            })
    }

    /// Remove a favorite record by its record id.
    ///
    /// The watched history is append-only and refuses removal outright.
    pub async fn remove(
        &self,
        user_id: &str,
        kind: RelationshipKind,
        record_id: &str,
    ) -> Result<()> {
        if kind == RelationshipKind::Watched {
            return Err(SdkError::Validation(
                "The watched history is append-only".to_string(),
            ));
        }

        let records = self.list(user_id, kind).await?;
        let record = records
            .iter()
            .find(|record| record.record_id == record_id)
            .ok_or_else(|| {
                SdkError::Validation(format!("No favorite record {} for this user", record_id))
            })?;

        let movie_id = record
            .internal_movie_ref
            .clone()
            .or_else(|| record.movie.as_ref().map(|m| m.id.clone()))
            .unwrap_or_else(|| record.record_id.clone());

        self.backend
            .remove_favorite(&RemoveFavoriteRequest {
                user_id: user_id.to_string(),
                movie_id,
            })
            .await?;

        self.invalidate(user_id, kind).await;
        self.bus.publish(kind.topic());
        Ok(())
    }

    /// The canonical movie a record points at, for rendering.
    ///
    /// An embedded movie document answers without any request; otherwise
    /// the record's reference is resolved against its owning source.
    pub async fn resolve_display(&self, record: &RelationshipRecord) -> Result<CanonicalMovie> {
        if let Some(movie) = &record.movie {
            return Ok(movie.clone().into_canonical());
        }

        let movie_ref = record.display_ref().ok_or_else(|| {
            SdkError::InvalidResponse(format!(
                "Record {} carries no movie reference",
                record.record_id
            ))
        })?;
        self.resolver.resolve_ref(&movie_ref).await
    }

    /// Drop the cached list for `(user, kind)`; the next `list` re-fetches
    pub async fn invalidate(&self, user_id: &str, kind: RelationshipKind) {
        self.cache.lock().await.remove(&(user_id.to_string(), kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tikovia_client::{BackendConfig, CatalogClient, CatalogConfig, StaticToken};
    use tikovia_types::Topic;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER: &str = "64a1f0c2e5b9a71234567890";

    async fn store_over(backend: &MockServer, catalog: &MockServer) -> RelationshipStore {
        let backend_client = BackendClient::new(
            BackendConfig {
                base_url: format!("{}/api", backend.uri()),
                timeout_secs: 5,
            },
            Arc::new(StaticToken(Some("jwt".to_string()))),
        );
        let catalog_client = CatalogClient::new(CatalogConfig {
            base_url: catalog.uri(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            api_key: "catalog-key".to_string(),
            timeout_secs: 5,
        });
        let resolver = Arc::new(MovieResolver::new(backend_client.clone(), catalog_client));
        RelationshipStore::new(backend_client, resolver, EventBus::new())
    }

    fn external_record(id: &str, tmdb_id: u64, created_at: &str) -> serde_json::Value {
        serde_json::json!({
            "_id": id,
            "userId": USER,
            "tmdbId": tmdb_id,
            "createdAt": created_at
        })
    }

    #[tokio::test]
    async fn test_list_sorts_newest_first_and_caches() {
        let backend = MockServer::start().await;
        let catalog = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                external_record("66bb00000000000000000001", 550, "2024-06-01T00:00:00Z"),
                external_record("66bb00000000000000000002", 27205, "2024-06-03T00:00:00Z"),
                external_record("66bb00000000000000000003", 603, "2024-06-02T00:00:00Z"),
            ])))
            .expect(1)
            .mount(&backend)
            .await;

        let store = store_over(&backend, &catalog).await;

        let records = store.list(USER, RelationshipKind::Favorite).await.unwrap();
        let ids: Vec<u64> = records
            .iter()
            .filter_map(|r| r.external_movie_ref)
            .collect();
        assert_eq!(ids, vec![27205, 603, 550]);

        // Second read is served from cache; expect(1) enforces it
        let again = store.list(USER, RelationshipKind::Favorite).await.unwrap();
        assert_eq!(again, records);
    }

    #[tokio::test]
    async fn test_duplicate_add_is_refused_without_any_request() {
        let backend = MockServer::start().await;
        let catalog = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "_id": "66bb00000000000000000001",
                    "userId": USER,
                    "tmdbId": 550,
                    "createdAt": "2024-06-01T00:00:00Z"
                },
                {
                    "_id": "66bb00000000000000000002",
                    "userId": USER,
                    "movieId": "66dd00000000000000000001",
                    "movie": {
                        "_id": "66dd00000000000000000001",
                        "title": "Curated Movie",
                        "tmdbId": 9999
                    },
                    "createdAt": "2024-06-02T00:00:00Z"
                }
            ])))
            .expect(1)
            .mount(&backend)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/favorites"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&backend)
            .await;

        let store = store_over(&backend, &catalog).await;
        store.list(USER, RelationshipKind::Favorite).await.unwrap();

        // Same external id
        let err = store
            .add(USER, RelationshipKind::Favorite, "550")
            .await
            .unwrap_err();
        assert!(err.is_duplicate());

        // Internal id known only through the embedded movie document
        let err = store
            .add(USER, RelationshipKind::Favorite, "66dd00000000000000000001")
            .await
            .unwrap_err();
        assert!(err.is_duplicate());

        // External id known only through the embedded movie's mirror
        let err = store
            .add(USER, RelationshipKind::Favorite, "9999")
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn test_add_external_favorite_round_trip() {
        let backend = MockServer::start().await;
        let catalog = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .up_to_n_times(1)
            .mount(&backend)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/favorites"))
            .and(body_json(serde_json::json!({
                "userId": USER,
                "tmdbId": 27205
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "message": "added" })),
            )
            .expect(1)
            .mount(&backend)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                external_record("66bb00000000000000000009", 27205, "2024-06-05T00:00:00Z"),
            ])))
            .mount(&backend)
            .await;

        let store = store_over(&backend, &catalog).await;

        let fired = Arc::new(AtomicUsize::new(0));
        let _sub = {
            let fired = fired.clone();
            store.bus().subscribe(Topic::ReloadFavorites, move |_| {
                fired.fetch_add(1, Ordering::SeqCst);
            })
        };

        let record = store
            .add(USER, RelationshipKind::Favorite, "27205")
            .await
            .unwrap();

        assert_eq!(record.external_movie_ref, Some(27205));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_add_internal_favorite_carries_catalog_mirror() {
        let backend = MockServer::start().await;
        let catalog = MockServer::start().await;
        let internal = "66dd00000000000000000001";

        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .up_to_n_times(1)
            .mount(&backend)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api/movies/{}", internal)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "_id": internal,
                "title": "Curated Movie",
                "tmdbId": 9999
            })))
            .expect(1)
            .mount(&backend)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/favorites"))
            .and(body_json(serde_json::json!({
                "userId": USER,
                "tmdbId": 9999,
                "movieId": internal
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "message": "added" })),
            )
            .expect(1)
            .mount(&backend)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "_id": "66bb00000000000000000010",
                    "userId": USER,
                    "movieId": internal,
                    "tmdbId": 9999,
                    "createdAt": "2024-06-05T00:00:00Z"
                }
            ])))
            .mount(&backend)
            .await;

        let store = store_over(&backend, &catalog).await;
        let record = store
            .add(USER, RelationshipKind::Favorite, internal)
            .await
            .unwrap();

        assert_eq!(record.internal_movie_ref.as_deref(), Some(internal));
        assert!(catalog.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_watched_posts_reference_in_path() {
        let backend = MockServer::start().await;
        let catalog = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/api/users/{}/watched", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .up_to_n_times(1)
            .mount(&backend)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("/api/users/{}/watched/550", USER)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "ok" })),
            )
            .expect(1)
            .mount(&backend)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api/users/{}/watched", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                external_record("66ee00000000000000000001", 550, "2024-06-06T00:00:00Z"),
            ])))
            .mount(&backend)
            .await;

        let store = store_over(&backend, &catalog).await;

        let favorites_fired = Arc::new(AtomicUsize::new(0));
        let watched_fired = Arc::new(AtomicUsize::new(0));
        let _fav_sub = {
            let fired = favorites_fired.clone();
            store.bus().subscribe(Topic::ReloadFavorites, move |_| {
                fired.fetch_add(1, Ordering::SeqCst);
            })
        };
        let _watched_sub = {
            let fired = watched_fired.clone();
            store.bus().subscribe(Topic::ReloadWatched, move |_| {
                fired.fetch_add(1, Ordering::SeqCst);
            })
        };

        let record = store
            .add(USER, RelationshipKind::Watched, "550")
            .await
            .unwrap();

        assert_eq!(record.external_movie_ref, Some(550));
        assert_eq!(watched_fired.load(Ordering::SeqCst), 1);
        assert_eq!(favorites_fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_favorite_add_then_remove_scenario() {
        let backend = MockServer::start().await;
        let catalog = MockServer::start().await;

        // The favorites list is read three times over the scenario:
        // before the add, after the add, and after the remove.
        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .up_to_n_times(1)
            .mount(&backend)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/favorites"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "message": "added" })),
            )
            .expect(1)
            .mount(&backend)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                external_record("66bb00000000000000000011", 27205, "2024-06-07T00:00:00Z"),
            ])))
            .up_to_n_times(1)
            .mount(&backend)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/favorites"))
            .and(body_json(serde_json::json!({
                "userId": USER,
                "movieId": "66bb00000000000000000011"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "message": "removed" })),
            )
            .expect(1)
            .mount(&backend)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&backend)
            .await;

        let store = store_over(&backend, &catalog).await;

        let fired = Arc::new(AtomicUsize::new(0));
        let _sub = {
            let fired = fired.clone();
            store.bus().subscribe(Topic::ReloadFavorites, move |_| {
                fired.fetch_add(1, Ordering::SeqCst);
            })
        };

        let added = store
            .add(USER, RelationshipKind::Favorite, "27205")
            .await
            .unwrap();

        let listed = store.list(USER, RelationshipKind::Favorite).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].references(&MovieRef::External(27205)));

        store
            .remove(USER, RelationshipKind::Favorite, &added.record_id)
            .await
            .unwrap();

        let after = store.list(USER, RelationshipKind::Favorite).await.unwrap();
        assert!(after.is_empty());
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_remove_prefers_internal_movie_reference() {
        let backend = MockServer::start().await;
        let catalog = MockServer::start().await;
        let internal = "66dd00000000000000000001";

        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "_id": "66bb00000000000000000012",
                    "userId": USER,
                    "movieId": internal,
                    "createdAt": "2024-06-08T00:00:00Z"
                }
            ])))
            .up_to_n_times(1)
            .mount(&backend)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/favorites"))
            .and(body_json(serde_json::json!({
                "userId": USER,
                "movieId": internal
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "message": "removed" })),
            )
            .expect(1)
            .mount(&backend)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&backend)
            .await;

        let store = store_over(&backend, &catalog).await;
        store
            .remove(USER, RelationshipKind::Favorite, "66bb00000000000000000012")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_remove_watched_is_refused() {
        let backend = MockServer::start().await;
        let catalog = MockServer::start().await;

        let store = store_over(&backend, &catalog).await;
        let err = store
            .remove(USER, RelationshipKind::Watched, "66ee00000000000000000001")
            .await
            .unwrap_err();

        assert!(matches!(err, SdkError::Validation(_)));
        assert!(backend.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_record_is_refused() {
        let backend = MockServer::start().await;
        let catalog = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/api/favorites/{}", USER)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&backend)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/favorites"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&backend)
            .await;

        let store = store_over(&backend, &catalog).await;
        let err = store
            .remove(USER, RelationshipKind::Favorite, "ffffffffffffffffffffffff")
            .await
            .unwrap_err();

        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_unclassifiable_reference_fails_before_any_request() {
        let backend = MockServer::start().await;
        let catalog = MockServer::start().await;

        let store = store_over(&backend, &catalog).await;
        let err = store
            .add(USER, RelationshipKind::Favorite, "not-a-ref")
            .await
            .unwrap_err();

        assert!(matches!(err, SdkError::AmbiguousReference(_)));
        assert!(backend.received_requests().await.unwrap().is_empty());
        assert!(catalog.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_display_prefers_embedded_snapshot() {
        let backend = MockServer::start().await;
        let catalog = MockServer::start().await;
        let store = store_over(&backend, &catalog).await;

        let embedded: RelationshipRecord = serde_json::from_value(serde_json::json!({
            "_id": "66bb00000000000000000013",
            "userId": USER,
            "movieId": "66dd00000000000000000001",
            "movie": {
                "_id": "66dd00000000000000000001",
                "title": "Curated Movie",
                "posterUrl": "https://cdn.tikovia.com/p.jpg"
            },
            "createdAt": "2024-06-09T00:00:00Z"
        }))
        .unwrap();

        let movie = store.resolve_display(&embedded).await.unwrap();
        assert_eq!(movie.title, "Curated Movie");
        assert!(backend.received_requests().await.unwrap().is_empty());
        assert!(catalog.received_requests().await.unwrap().is_empty());

        Mock::given(method("GET"))
            .and(path("/movie/550"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 550,
                "title": "Fight Club"
            })))
            .expect(1)
            .mount(&catalog)
            .await;

        let bare: RelationshipRecord = serde_json::from_value(serde_json::json!({
            "_id": "66bb00000000000000000014",
            "userId": USER,
            "tmdbId": 550,
            "createdAt": "2024-06-09T00:00:00Z"
        }))
        .unwrap();

        let movie = store.resolve_display(&bare).await.unwrap();
        assert_eq!(movie.title, "Fight Club");
    }
}
