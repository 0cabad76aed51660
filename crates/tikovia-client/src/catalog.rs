//! HTTP client for the external movie catalog
//!
//! The catalog is public and read-only. Its credential is a static API
//! key installed as a default bearer header at construction, never the
//! session token. A rejected catalog request is a lookup failure, not a
//! session problem, so this client never produces [`ClientError::Auth`].

use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use tikovia_types::{CatalogMovie, CatalogPage};

use crate::error::{ClientError, Result};
use crate::types::CatalogConfig;

/// Client for the external movie catalog
#[derive(Clone)]
pub struct CatalogClient {
    config: CatalogConfig,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a new catalog client with the static API key installed
    pub fn new(config: CatalogConfig) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        if !config.api_key.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .expect("Invalid API key");
            auth.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self { config, client }
    }

    /// Prefix for posters the catalog reports as bare paths
    pub fn image_base(&self) -> &str {
        &self.config.image_base_url
    }

    /// Search the catalog by title. A blank query browses the catalog by
    /// popularity instead.
    pub async fn search(&self, query: &str) -> Result<CatalogPage> {
        let query = query.trim();

        let response = if query.is_empty() {
            let url = format!("{}/discover/movie", self.config.base_url);
            self.client
                .get(&url)
                .query(&[("sort_by", "popularity.desc")])
                .send()
                .await?
        } else {
            let url = format!("{}/search/movie", self.config.base_url);
            self.client.get(&url).query(&[("query", query)]).send().await?
        };

        handle_response(response).await
    }

    /// Fetch full details for one catalog movie
    pub async fn get_movie(&self, catalog_id: u64) -> Result<CatalogMovie> {
        let url = format!("{}/movie/{}", self.config.base_url, catalog_id);
        let response = self.client.get(&url).send().await?;
        handle_response(response).await
    }
}

/// Error body shape the catalog uses for non-success statuses
#[derive(Debug, Deserialize)]
struct CatalogErrorBody {
    status_message: String,
}

/// Classify a catalog response. Every failure is [`ClientError::Server`],
/// including 401: the key is static configuration, and a bad key must not
/// tear down the user's backend session.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        response.json::<T>().await.map_err(|e| {
            ClientError::InvalidResponse(format!("Failed to parse catalog response: {}", e))
        })
    } else {
        let code = status.as_u16();
        let raw = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<CatalogErrorBody>(&raw)
            .map(|body| body.status_message)
            .unwrap_or(raw);

        tracing::warn!(status = code, "Catalog request failed");
        Err(ClientError::Server {
            status: code,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer, api_key: &str) -> CatalogClient {
        CatalogClient::new(CatalogConfig {
            base_url: server.uri(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            api_key: api_key.to_string(),
            timeout_secs: 5,
        })
    }

    fn sample_page() -> serde_json::Value {
        serde_json::json!({
            "page": 1,
            "results": [
                { "id": 550, "title": "Fight Club", "poster_path": "/fc.jpg" }
            ],
            "total_pages": 1,
            "total_results": 1
        })
    }

    #[tokio::test]
    async fn test_blank_query_browses_by_popularity() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .and(query_param("sort_by", "popularity.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_page()))
            .expect(1)
            .mount(&server)
            .await;

        let page = test_client(&server, "catalog-key").search("  ").await.unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, 550);
    }

    #[tokio::test]
    async fn test_search_sends_query_param() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "fight club"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_page()))
            .expect(1)
            .mount(&server)
            .await;

        let page = test_client(&server, "catalog-key")
            .search("fight club")
            .await
            .unwrap();
        assert_eq!(page.total_results, 1);
    }

    #[tokio::test]
    async fn test_api_key_rides_authorization_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movie/550"))
            .and(header("authorization", "Bearer catalog-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 550,
                "title": "Fight Club",
                "runtime": 139,
                "budget": 63000000.0,
                "genres": [{ "id": 18, "name": "Drama" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let movie = test_client(&server, "catalog-key").get_movie(550).await.unwrap();
        assert_eq!(movie.runtime, Some(139));
        assert_eq!(movie.genres.len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_key_is_server_error_not_auth() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movie/550"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "status_code": 7,
                "status_message": "Invalid API key"
            })))
            .mount(&server)
            .await;

        let err = test_client(&server, "bad-key").get_movie(550).await.unwrap_err();

        assert!(!err.is_auth());
        match err {
            ClientError::Server { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }
}
