//! Watchlist add tool — catalog lookup followed by an idempotent insert.

use async_trait::async_trait;
use reelclaw_core::error::{ToolError, WatchlistError};
use reelclaw_core::tool::{decode_arguments, Tool, ToolResult};
use reelclaw_metadata::MovieCatalog;
use reelclaw_watchlist::{WatchItem, WatchlistStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub struct WatchlistAddTool {
    catalog: Arc<dyn MovieCatalog>,
    watchlist: Arc<WatchlistStore>,
}

impl WatchlistAddTool {
    pub fn new(catalog: Arc<dyn MovieCatalog>, watchlist: Arc<WatchlistStore>) -> Self {
        Self { catalog, watchlist }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WatchlistAddArgs {
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
impl Tool for WatchlistAddTool {
    fn name(&self) -> &str {
        "watchlist_add"
    }

    fn description(&self) -> &str {
        "Add a movie to the user's watchlist by title. Use only when the user \
         explicitly asks to add something to their watchlist."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Movie title to add"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: WatchlistAddArgs = decode_arguments(arguments)?;
        let query = args.title.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidArguments("'title' must not be empty".into()));
        }

        // Idempotence: check before the catalog round-trip so a retried
        // add is a cheap no-op.
        if self.watchlist.contains_title(query).await {
            return ToolResult::json(&StatusPayload {
                status: "exists",
                title: Some(query.to_string()),
                message: format!("'{query}' is already on the watchlist."),
            });
        }

        let movie = self
            .catalog
            .search(query)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: e.to_string(),
            })?;

        let Some(movie) = movie else {
            return ToolResult::json(&StatusPayload {
                status: "not_found",
                title: None,
                message: format!("No movie matching '{query}' in the catalog."),
            });
        };

        let Some(runtime) = movie.runtime_minutes else {
            return ToolResult::json(&StatusPayload {
                status: "failed",
                title: Some(movie.title.clone()),
                message: format!(
                    "The catalog has no runtime for '{}', so it can't be scheduled.",
                    movie.title
                ),
            });
        };

        let mut item = WatchItem::new(movie.title.clone(), runtime, movie.genres.clone())
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: e.to_string(),
            })?
            .with_catalog_id(movie.id);
        if let Some(rating) = movie.rating {
            item = item.with_rating(rating);
        }

        let payload = match self.watchlist.add(item).await {
            Ok(()) => {
                debug!(title = %movie.title, "Added to watchlist");
                StatusPayload {
                    status: "added",
                    title: Some(movie.title.clone()),
                    message: format!("Added '{}' ({runtime} min) to the watchlist.", movie.title),
                }
            }
            // The catalog title may differ from the query; a duplicate
            // here is still a calm status, not a failure.
            Err(WatchlistError::DuplicateItem { title }) => StatusPayload {
                status: "exists",
                title: Some(title.clone()),
                message: format!("'{title}' is already on the watchlist."),
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
