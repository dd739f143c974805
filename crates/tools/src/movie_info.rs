//! Movie info tool — metadata lookup by title.

use async_trait::async_trait;
use reelclaw_core::error::ToolError;
use reelclaw_core::tool::{decode_arguments, Tool, ToolResult};
use reelclaw_metadata::MovieCatalog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct MovieInfoTool {
    catalog: Arc<dyn MovieCatalog>,
}

impl MovieInfoTool {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self { catalog }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MovieInfoArgs {
    title: String,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MovieInfoPayload {
    Found {
        found: bool,
        movie: reelclaw_metadata::MovieRecord,
    },
    Miss {
        found: bool,
        message: String,
    },
}

#[async_trait]
impl Tool for MovieInfoTool {
    fn name(&self) -> &str {
        "movie_info"
    }

    fn description(&self) -> &str {
        "Look up detailed information about a movie: synopsis, rating, genres, \
         release date, runtime, and poster. Use whenever a specific movie title \
         comes up or the user asks for recommendations."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Movie title to search for"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: MovieInfoArgs = decode_arguments(arguments)?;
        if args.title.trim().is_empty() {
            return Err(ToolError::InvalidArguments("'title' must not be empty".into()));
        }

        let payload = match self.catalog.search(&args.title).await {
            Ok(Some(movie)) => MovieInfoPayload::Found { found: true, movie },
            Ok(None) => MovieInfoPayload::Miss {
                found: false,
                message: format!("No movie matching '{}' in the catalog.", args.title.trim()),
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
