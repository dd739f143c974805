//! The watchlist store — one per session.

use crate::item::{WatchItem, WatchlistFile, WatchlistFileItem};
use reelclaw_core::error::WatchlistError;
use tokio::sync::RwLock;
use tracing::debug;

/// Ordered collection of watch items, unique by id and by
/// case-insensitive title.
///
/// All mutations take the write lock for their full duration, so a
/// concurrent reader never observes a half-applied add, remove, or
/// import. Consumers (orchestrator, curator, tools) only ever receive
/// cloned snapshots.
pub struct WatchlistStore {
    items: RwLock<Vec<WatchItem>>,
}

impl WatchlistStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Add an item. Fails with `DuplicateItem` when an item with the
    /// same id or title is already present.
    pub async fn add(&self, item: WatchItem) -> Result<(), WatchlistError> {
        let mut items = self.items.write().await;
        let title_key = item.title.to_lowercase();
        if items
            .iter()
            .any(|i| i.id == item.id || i.title.to_lowercase() == title_key)
        {
            return Err(WatchlistError::DuplicateItem { title: item.title });
        }
        debug!(title = %item.title, minutes = item.duration_minutes, "Watchlist add");
        items.push(item);
        Ok(())
    }

    /// Remove an item by id.
    pub async fn remove_by_id(&self, id: &str) -> Result<WatchItem, WatchlistError> {
        let mut items = self.items.write().await;
        match items.iter().position(|i| i.id == id) {
            Some(pos) => Ok(items.remove(pos)),
            None => Err(WatchlistError::NotFound { title: id.into() }),
        }
    }

    /// Remove an item by case-insensitive title.
    pub async fn remove_by_title(&self, title: &str) -> Result<WatchItem, WatchlistError> {
        let key = title.trim().to_lowercase();
        let mut items = self.items.write().await;
        match items.iter().position(|i| i.title.to_lowercase() == key) {
            Some(pos) => {
                let removed = items.remove(pos);
                debug!(title = %removed.title, "Watchlist remove");
                Ok(removed)
            }
            None => Err(WatchlistError::NotFound {
                title: title.trim().into(),
            }),
        }
    }

    /// Whether a title is already present (case-insensitive).
    pub async fn contains_title(&self, title: &str) -> bool {
        let key = title.trim().to_lowercase();
        self.items
            .read()
            .await
            .iter()
            .any(|i| i.title.to_lowercase() == key)
    }

    /// A read-only snapshot in insertion order.
    pub async fn list(&self) -> Vec<WatchItem> {
        self.items.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Replace the whole list from a serialized `WatchlistFile`.
    ///
    /// The import is atomic: every record is parsed and validated before
    /// the store is touched, so a malformed payload leaves the current
    /// list exactly as it was.
    pub async fn import(&self, serialized: &str) -> Result<usize, WatchlistError> {
        let file: WatchlistFile = serde_json::from_str(serialized)
            .map_err(|e| WatchlistError::InvalidImportFormat(e.to_string()))?;

        let mut incoming: Vec<WatchItem> = Vec::with_capacity(file.items.len());
        for record in file.items {
            let item = WatchItem::try_from(record).map_err(|e| match e {
                WatchlistError::InvalidItem { reason } => {
                    WatchlistError::InvalidImportFormat(reason)
                }
                other => other,
            })?;
            let key = item.title.to_lowercase();
            if incoming.iter().any(|i: &WatchItem| i.title.to_lowercase() == key) {
                return Err(WatchlistError::InvalidImportFormat(format!(
                    "duplicate title '{}' in import",
                    item.title
                )));
            }
            incoming.push(item);
        }

        let mut items = self.items.write().await;
        let count = incoming.len();
        *items = incoming;
        debug!(count, "Watchlist import replaced list");
        Ok(count)
    }

    /// Serialize the current list into the import/export shape.
    pub async fn export(&self) -> reelclaw_core::Result<String> {
        let items = self.items.read().await;
        let file = WatchlistFile {
            items: items.iter().map(WatchlistFileItem::from).collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}

impl Default for WatchlistStore {
    fn default() -> Self {
        Self::new()
    }
}
