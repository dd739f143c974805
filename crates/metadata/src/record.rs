//! The movie record consumed from the metadata provider.

use serde::{Deserialize, Serialize};

/// Placeholder poster used when the catalog has no artwork.
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/500x750?text=No+Poster";

/// The fields we consume from the upstream metadata API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Canonical catalog ID
    pub id: u64,

    /// Display title
    pub title: String,

    /// Original-language title, when it differs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,

    /// Synopsis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,

    /// Average rating on a 0–10 scale, rounded to one decimal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    /// Release date as reported upstream (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    /// Runtime in minutes, when the catalog knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,

    /// Genre names
    #[serde(default)]
    pub genres: Vec<String>,

    /// Full poster URL (placeholder when the catalog has none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl MovieRecord {
    /// A minimal record for tests and static catalogs.
    pub fn stub(id: u64, title: &str, runtime_minutes: u32, genres: &[&str]) -> Self {
        Self {
            id,
            title: title.to_string(),
            original_title: None,
            overview: None,
            rating: None,
            release_date: None,
            runtime_minutes: Some(runtime_minutes),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            poster_url: Some(PLACEHOLDER_POSTER.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serialization_skips_missing_fields() {
        let record = MovieRecord {
            id: 348,
            title: "Alien".into(),
            original_title: None,
            overview: None,
            rating: Some(8.2),
            release_date: Some("1979-05-25".into()),
            runtime_minutes: Some(117),
            genres: vec!["Horror".into(), "Science Fiction".into()],
            poster_url: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("Alien"));
        assert!(!json.contains("original_title"));
        assert!(!json.contains("poster_url"));
    }

    #[test]
    fn stub_has_placeholder_poster() {
        let record = MovieRecord::stub(1, "Test", 90, &["drama"]);
        assert_eq!(record.poster_url.as_deref(), Some(PLACEHOLDER_POSTER));
    }
}
