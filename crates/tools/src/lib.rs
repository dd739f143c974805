//! Built-in tool implementations for ReelClaw.
//!
//! Tools give the assistant the ability to act: look up movie
//! metadata, list what's in cinemas, manage the watchlist, curate a
//! viewing schedule, and answer questions about an uploaded document.
//!
//! Every tool wraps one collaborator and reports problems as
//! structured status payloads the model can narrate — only genuine
//! collaborator failures become `ToolError`s.

pub mod build_schedule;
pub mod document_qa;
pub mod movie_info;
pub mod now_playing;
pub mod watchlist_add;
pub mod watchlist_remove;
pub mod watchlist_show;

use reelclaw_core::tool::ToolRegistry;
use reelclaw_metadata::MovieCatalog;
use reelclaw_retrieval::{DocumentRetriever, DocumentSlot};
use reelclaw_watchlist::WatchlistStore;
use std::sync::Arc;
use std::time::Duration;

/// The collaborators one session's tools close over.
#[derive(Clone)]
pub struct ToolContext {
    pub catalog: Arc<dyn MovieCatalog>,
    pub watchlist: Arc<WatchlistStore>,
    pub retriever: Arc<DocumentRetriever>,
    pub document: Arc<DocumentSlot>,
    pub default_region: String,
}

/// Build the registry for one session, wiring every tool to that
/// session's collaborators.
pub fn session_registry(ctx: &ToolContext, tool_timeout: Duration) -> ToolRegistry {
    let mut registry = ToolRegistry::new().with_timeout(tool_timeout);

    registry.register(Box::new(movie_info::MovieInfoTool::new(ctx.catalog.clone())));
    registry.register(Box::new(now_playing::NowPlayingTool::new(
        ctx.catalog.clone(),
        ctx.default_region.clone(),
    )));
    registry.register(Box::new(watchlist_add::WatchlistAddTool::new(
        ctx.catalog.clone(),
        ctx.watchlist.clone(),
    )));
    registry.register(Box::new(watchlist_remove::WatchlistRemoveTool::new(
        ctx.watchlist.clone(),
    )));
    registry.register(Box::new(watchlist_show::WatchlistShowTool::new(
        ctx.watchlist.clone(),
    )));
    registry.register(Box::new(build_schedule::BuildScheduleTool::new(
        ctx.watchlist.clone(),
    )));
    registry.register(Box::new(document_qa::DocumentQaTool::new(
        ctx.retriever.clone(),
        ctx.document.clone(),
    )));

    registry
}
