//! Build-schedule tool — time-budgeted curation over the watchlist.

use async_trait::async_trait;
use reelclaw_core::error::{ScheduleError, ToolError};
use reelclaw_core::tool::{decode_arguments, Tool, ToolResult};
use reelclaw_watchlist::{curate, ScheduleRequest, WatchlistStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct BuildScheduleTool {
    watchlist: Arc<WatchlistStore>,
}

impl BuildScheduleTool {
    pub fn new(watchlist: Arc<WatchlistStore>) -> Self {
        Self { watchlist }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuildScheduleArgs {
    budget_minutes: u32,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    titles: Option<Vec<String>>,
}

#[derive(Serialize)]
struct SchedulePayload {
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    selected: Vec<ScheduleEntry>,
    total_minutes: u32,
    unused_minutes: u32,
}

#[derive(Serialize)]
struct ScheduleEntry {
    title: String,
    duration_minutes: u32,
    genres: Vec<String>,
}

#[async_trait]
impl Tool for BuildScheduleTool {
    fn name(&self) -> &str {
        "build_schedule"
    }

    fn description(&self) -> &str {
        "Build a viewing schedule from the watchlist that best fills a time \
         budget, optionally filtered by genre or restricted to specific \
         titles. Use when the user says how much time they have to watch."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "budget_minutes": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Available watch time in minutes"
                },
                "genre": {
                    "type": "string",
                    "description": "Preferred genre, or 'any' (optional)"
                },
                "titles": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Restrict selection to these watchlist titles (optional)"
                }
            },
            "required": ["budget_minutes"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: BuildScheduleArgs = decode_arguments(arguments)?;

        let snapshot = self.watchlist.list().await;
        let request = ScheduleRequest {
            budget_minutes: args.budget_minutes,
            genre: args.genre,
            titles: args.titles,
        };

        let payload = match curate(&snapshot, &request) {
            Ok(result) => {
                let message = result.items.is_empty().then(|| {
                    format!(
                        "No single watchlist item fits in {} minutes.",
                        args.budget_minutes
                    )
                });
                SchedulePayload {
                    found: true,
                    message,
                    selected: result
                        .items
                        .iter()
                        .map(|i| ScheduleEntry {
                            title: i.title.clone(),
                            duration_minutes: i.duration_minutes,
                            genres: i.genres.iter().cloned().collect(),
                        })
                        .collect(),
                    total_minutes: result.total_minutes,
                    unused_minutes: result.unused_minutes,
                }
            }
            // An empty candidate pool is an explanation, not an error
            // dialog.
            Err(ScheduleError::NoEligibleItems(reason)) => SchedulePayload {
                found: false,
                message: Some(format!("Could not build a schedule: {reason}.")),
                selected: vec![],
                total_minutes: 0,
                unused_minutes: args.budget_minutes,
            },
        };

        ToolResult::json(&payload)
    }
}
