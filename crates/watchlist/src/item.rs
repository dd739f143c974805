//! Watch item domain type and the import/export file shape.

use chrono::{DateTime, Utc};
use reelclaw_core::error::WatchlistError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// One movie on the watchlist.
///
/// Invariants: `duration_minutes > 0`, `title` non-empty. Both are
/// enforced by [`WatchItem::new`]; the store never holds a violating
/// item. Items are created by explicit add/import and removed by
/// explicit remove/import — the orchestrator never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchItem {
    /// Unique item ID
    pub id: String,

    /// Display title
    pub title: String,

    /// Canonical metadata reference (catalog movie ID), when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<u64>,

    /// Runtime in minutes (always > 0)
    pub duration_minutes: u32,

    /// Genre names, lowercased
    pub genres: BTreeSet<String>,

    /// Catalog rating, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    /// When the item was added
    pub added_at: DateTime<Utc>,
}

impl WatchItem {
    /// Create a new watch item, enforcing the domain invariants.
    pub fn new(
        title: impl Into<String>,
        duration_minutes: u32,
        genres: impl IntoIterator<Item = String>,
    ) -> Result<Self, WatchlistError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(WatchlistError::InvalidItem {
                reason: "title must not be empty".into(),
            });
        }
        if duration_minutes == 0 {
            return Err(WatchlistError::InvalidItem {
                reason: format!("'{title}' has no runtime (duration must be positive)"),
            });
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            catalog_id: None,
            duration_minutes,
            genres: genres
                .into_iter()
                .map(|g| g.trim().to_lowercase())
                .filter(|g| !g.is_empty())
                .collect(),
            rating: None,
            added_at: Utc::now(),
        })
    }

    /// Attach the canonical catalog reference.
    pub fn with_catalog_id(mut self, catalog_id: u64) -> Self {
        self.catalog_id = Some(catalog_id);
        self
    }

    /// Attach the catalog rating.
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Case-insensitive genre membership test.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.contains(&genre.trim().to_lowercase())
    }
}

/// The serialized watchlist shape used by import and export.
///
/// `{"items": [{"title", "duration_minutes", "genres", ...}]}` — the
/// optional fields survive a round trip but aren't required on import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistFile {
    pub items: Vec<WatchlistFileItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistFileItem {
    pub title: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<u64>,
}

impl From<&WatchItem> for WatchlistFileItem {
    fn from(item: &WatchItem) -> Self {
        Self {
            title: item.title.clone(),
            duration_minutes: item.duration_minutes,
            genres: item.genres.iter().cloned().collect(),
            rating: item.rating,
            catalog_id: item.catalog_id,
        }
    }
}

impl TryFrom<WatchlistFileItem> for WatchItem {
    type Error = WatchlistError;

    fn try_from(record: WatchlistFileItem) -> Result<Self, Self::Error> {
        let mut item = WatchItem::new(record.title, record.duration_minutes, record.genres)?;
        item.catalog_id = record.catalog_id;
        item.rating = record.rating;
        Ok(item)
    }
}
