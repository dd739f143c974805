//! Watchlist remove tool.

use async_trait::async_trait;
use reelclaw_core::error::{ToolError, WatchlistError};
use reelclaw_core::tool::{decode_arguments, Tool, ToolResult};
use reelclaw_watchlist::WatchlistStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub struct WatchlistRemoveTool {
    watchlist: Arc<WatchlistStore>,
}

impl WatchlistRemoveTool {
    pub fn new(watchlist: Arc<WatchlistStore>) -> Self {
        Self { watchlist }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WatchlistRemoveArgs {
    title: String,
}

#[derive(Serialize)]
struct StatusPayload {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    message: String,
}

#[async_trait]
impl Tool for WatchlistRemoveTool {
    fn name(&self) -> &str {
        "watchlist_remove"
    }

    fn description(&self) -> &str {
        "Remove a movie from the user's watchlist by title. Use only when the \
         user explicitly asks to remove or drop something."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Movie title to remove"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: WatchlistRemoveArgs = decode_arguments(arguments)?;
        let title = args.title.trim();
        if title.is_empty() {
            return Err(ToolError::InvalidArguments("'title' must not be empty".into()));
        }

        let payload = match self.watchlist.remove_by_title(title).await {
            Ok(removed) => {
                debug!(title = %removed.title, "Removed from watchlist");
                StatusPayload {
                    status: "removed",
                    title: Some(removed.title.clone()),
                    message: format!("Removed '{}' from the watchlist.", removed.title),
                }
            }
            Err(WatchlistError::NotFound { title }) => StatusPayload {
                status: "not_found",
                title: None,
                message: format!(
                    "'{title}' is not on the watchlist — ask the user which title they meant."
                ),
            },
            Err(e) => {
                return Err(ToolError::ExecutionFailed {
                    tool_name: self.name().into(),
                    reason: e.to_string(),
                });
            }
        };

        ToolResult::json(&payload)
    }
}
