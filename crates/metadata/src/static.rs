//! Static in-memory catalog — deterministic data for tests and
//! offline runs.

use crate::record::MovieRecord;
use crate::MovieCatalog;
use async_trait::async_trait;
use reelclaw_core::error::CatalogError;

/// A catalog backed by a fixed list of records.
///
/// `search` matches case-insensitively on the full title first, then
/// falls back to a substring match, mirroring how the HTTP catalog's
/// "best result" behaves for common queries.
pub struct StaticCatalog {
    records: Vec<MovieRecord>,
}

impl StaticCatalog {
    pub fn new(records: Vec<MovieRecord>) -> Self {
        Self { records }
    }

    /// A small well-known sample set.
    pub fn sample() -> Self {
        Self::new(vec![
            MovieRecord::stub(348, "Alien", 117, &["Horror", "Science Fiction"]),
            MovieRecord::stub(949, "Heat", 170, &["Crime", "Drama"]),
            MovieRecord::stub(329865, "Arrival", 116, &["Drama", "Science Fiction"]),
            MovieRecord::stub(1091, "The Thing", 109, &["Horror", "Science Fiction"]),
            MovieRecord::stub(115, "The Big Lebowski", 117, &["Comedy", "Crime"]),
        ])
    }
}

#[async_trait]
impl MovieCatalog for StaticCatalog {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(&self, title: &str) -> Result<Option<MovieRecord>, CatalogError> {
        let query = title.trim().to_lowercase();
        if query.is_empty() {
            return Ok(None);
        }

        let exact = self
            .records
            .iter()
            .find(|r| r.title.to_lowercase() == query);
        if let Some(record) = exact {
            return Ok(Some(record.clone()));
        }

        Ok(self
            .records
            .iter()
            .find(|r| r.title.to_lowercase().contains(&query))
            .cloned())
    }

    async fn now_playing(&self, _region: &str) -> Result<Vec<MovieRecord>, CatalogError> {
        Ok(self.records.clone())
    }
}
