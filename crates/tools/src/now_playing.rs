//! Now-playing tool — what's currently in cinemas for a region.

use async_trait::async_trait;
use reelclaw_core::error::ToolError;
use reelclaw_core::tool::{decode_arguments, Tool, ToolResult};
use reelclaw_metadata::MovieCatalog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct NowPlayingTool {
    catalog: Arc<dyn MovieCatalog>,
    default_region: String,
}

impl NowPlayingTool {
    pub fn new(catalog: Arc<dyn MovieCatalog>, default_region: String) -> Self {
        Self {
            catalog,
            default_region,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NowPlayingArgs {
    #[serde(default)]
    region: Option<String>,
}

#[derive(Serialize)]
struct NowPlayingPayload {
    region: String,
    count: usize,
    titles: Vec<NowPlayingEntry>,
}

#[derive(Serialize)]
struct NowPlayingEntry {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    release_date: Option<String>,
}

#[async_trait]
impl Tool for NowPlayingTool {
    fn name(&self) -> &str {
        "now_playing"
    }

    fn description(&self) -> &str {
        "List movies currently playing in cinemas for a region. Use when the \
         user asks what's showing or what's new in theaters."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "region": {
                    "type": "string",
                    "description": "ISO 3166-1 region code, e.g. 'US' or 'ID' (optional)"
                }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: NowPlayingArgs = decode_arguments(arguments)?;
        let region = args
            .region
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| self.default_region.clone());

        let movies = self
            .catalog
            .now_playing(&region)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: e.to_string(),
            })?;

        let payload = NowPlayingPayload {
            region,
            count: movies.len(),
            titles: movies
                .into_iter()
                .map(|m| NowPlayingEntry {
                    title: m.title,
                    rating: m.rating,
                    release_date: m.release_date,
                })
                .collect(),
        };

        ToolResult::json(&payload)
    }
}
