//! Movie catalog — the metadata provider behind the movie tools.
//!
//! The [`MovieCatalog`] trait abstracts the upstream metadata API. The
//! HTTP implementation targets a TMDB-style API; [`StaticCatalog`]
//! serves tests and offline runs with deterministic data.

pub mod record;
pub mod r#static;
pub mod tmdb;

use async_trait::async_trait;
use reelclaw_core::error::CatalogError;

pub use r#static::StaticCatalog;
pub use record::MovieRecord;
pub use tmdb::TmdbCatalog;

/// The movie metadata capability.
///
/// Failures map to `CatalogError` here and to `ToolError::ExecutionFailed`
/// at the tool boundary — the orchestrator never sees raw HTTP errors.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// A human-readable name for this catalog (e.g., "tmdb").
    fn name(&self) -> &str;

    /// Search for a movie by title. Returns the best match, or `None`
    /// when the catalog has nothing for the query.
    async fn search(&self, title: &str) -> Result<Option<MovieRecord>, CatalogError>;

    /// Titles currently playing in the given region (ISO 3166-1 code).
    async fn now_playing(&self, region: &str) -> Result<Vec<MovieRecord>, CatalogError>;
}
