//! Error types for the ReelClaw domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; none of them may
//! terminate a session — the orchestrator folds every variant into a
//! conversational reply.

use thiserror::Error;

/// The top-level error type for all ReelClaw operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Movie catalog errors ---
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Watchlist errors ---
    #[error("Watchlist error: {0}")]
    Watchlist(#[from] WatchlistError),

    // --- Schedule errors ---
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    // --- Document retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Catalog not configured: {0}")]
    NotConfigured(String),

    #[error("Catalog request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },
}

impl ToolError {
    /// Whether the model should be given one shot at correcting its
    /// arguments before the failure is reported to the user.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolError::InvalidArguments(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum WatchlistError {
    #[error("'{title}' is already on the watchlist")]
    DuplicateItem { title: String },

    #[error("'{title}' is not on the watchlist")]
    NotFound { title: String },

    #[error("Invalid watch item: {reason}")]
    InvalidItem { reason: String },

    #[error("Invalid watchlist import: {0}")]
    InvalidImportFormat(String),
}

#[derive(Debug, Clone, Error)]
pub enum ScheduleError {
    #[error("No eligible items: {0}")]
    NoEligibleItems(String),
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Unsupported document: {0}")]
    UnsupportedDocument(String),

    #[error("No document has been ingested for this session")]
    NoDocument,

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Grounded answer generation failed: {0}")]
    AnswerFailed(String),
}
