//! Watchlist show tool — a read-only snapshot listing.

use async_trait::async_trait;
use reelclaw_core::error::ToolError;
use reelclaw_core::tool::{decode_arguments, Tool, ToolResult};
use reelclaw_watchlist::WatchlistStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct WatchlistShowTool {
    watchlist: Arc<WatchlistStore>,
}

impl WatchlistShowTool {
    pub fn new(watchlist: Arc<WatchlistStore>) -> Self {
        Self { watchlist }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WatchlistShowArgs {}

#[derive(Serialize)]
struct WatchlistPayload {
    count: usize,
    total_minutes: u32,
    items: Vec<WatchlistEntry>,
}

#[derive(Serialize)]
struct WatchlistEntry {
    title: String,
    duration_minutes: u32,
    genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<f32>,
}

#[async_trait]
impl Tool for WatchlistShowTool {
    fn name(&self) -> &str {
        "watchlist_show"
    }

    fn description(&self) -> &str {
        "Show the user's current watchlist with runtimes and genres. Use when \
         the user asks what's on their list."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let _args: WatchlistShowArgs = decode_arguments(arguments)?;

        let items = self.watchlist.list().await;
        let payload = WatchlistPayload {
            count: items.len(),
            total_minutes: items.iter().map(|i| i.duration_minutes).sum(),
            items: items
                .iter()
                .map(|i| WatchlistEntry {
                    title: i.title.clone(),
                    duration_minutes: i.duration_minutes,
                    genres: i.genres.iter().cloned().collect(),
                    rating: i.rating,
                })
                .collect(),
        };

        ToolResult::json(&payload)
    }
}
