//! TMDB-style HTTP catalog implementation.
//!
//! Search picks the top result and follows up with a details request
//! for runtime and genres. All requests run under a bounded timeout;
//! a timeout surfaces as `CatalogError::Timeout`, never a silent hang.

use crate::record::{MovieRecord, PLACEHOLDER_POSTER};
use crate::MovieCatalog;
use async_trait::async_trait;
use reelclaw_core::error::CatalogError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for a TMDB-compatible metadata API.
pub struct TmdbCatalog {
    base_url: String,
    image_base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl TmdbCatalog {
    /// Create a catalog client against an explicit base URL.
    pub fn new(
        base_url: impl Into<String>,
        image_base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// The official TMDB endpoints (convenience constructor).
    pub fn tmdb(api_key: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        Self::new(
            "https://api.themoviedb.org/3",
            "https://image.tmdb.org/t/p/w500",
            api_key,
            timeout,
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout(url.clone())
                } else {
                    CatalogError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return Err(CatalogError::NotConfigured(
                "invalid or missing catalog API key".into(),
            ));
        }
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Catalog returned error");
            return Err(CatalogError::ApiError {
                status_code: status,
                message: body,
            });
        }

        response.json().await.map_err(|e| CatalogError::ApiError {
            status_code: 200,
            message: format!("Failed to parse catalog response: {e}"),
        })
    }

    fn poster_url(&self, poster_path: Option<&str>) -> String {
        match poster_path {
            Some(path) => format!("{}{}", self.image_base_url, path),
            None => PLACEHOLDER_POSTER.to_string(),
        }
    }

    fn to_record(&self, summary: ApiMovieSummary, details: Option<ApiMovieDetails>) -> MovieRecord {
        let (runtime_minutes, genres) = match details {
            Some(d) => (
                d.runtime.filter(|&r| r > 0),
                d.genres.into_iter().map(|g| g.name).collect(),
            ),
            None => (None, Vec::new()),
        };

        MovieRecord {
            id: summary.id,
            title: summary.title,
            original_title: summary.original_title,
            overview: summary.overview.filter(|o| !o.is_empty()),
            rating: summary.vote_average.map(|v| (v * 10.0).round() / 10.0),
            release_date: summary.release_date.filter(|d| !d.is_empty()),
            runtime_minutes,
            genres,
            poster_url: Some(self.poster_url(summary.poster_path.as_deref())),
        }
    }
}

#[async_trait]
impl MovieCatalog for TmdbCatalog {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn search(&self, title: &str) -> Result<Option<MovieRecord>, CatalogError> {
        debug!(query = %title, "Catalog search");
        let page: ApiSearchPage = self
            .get_json("/search/movie", &[("query", title)])
            .await?;

        let Some(top) = page.results.into_iter().next() else {
            return Ok(None);
        };

        // The search payload lacks runtime and genre names; fetch details.
        let details: ApiMovieDetails = self
            .get_json(&format!("/movie/{}", top.id), &[])
            .await?;

        Ok(Some(self.to_record(top, Some(details))))
    }

    async fn now_playing(&self, region: &str) -> Result<Vec<MovieRecord>, CatalogError> {
        debug!(region = %region, "Catalog now_playing");
        let page: ApiSearchPage = self
            .get_json("/movie/now_playing", &[("region", region)])
            .await?;

        Ok(page
            .results
            .into_iter()
            .map(|summary| self.to_record(summary, None))
            .collect())
    }
}

// --- TMDB API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiSearchPage {
    #[serde(default)]
    results: Vec<ApiMovieSummary>,
}

#[derive(Debug, Deserialize)]
struct ApiMovieSummary {
    id: u64,
    title: String,
    #[serde(default)]
    original_title: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    vote_average: Option<f32>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMovieDetails {
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<ApiGenre>,
}

#[derive(Debug, Deserialize)]
struct ApiGenre {
    name: String,
}
