//! Configuration loading, validation, and management for ReelClaw.
//!
//! Loads configuration from `~/.reelclaw/config.toml` with environment
//! variable overrides for secrets. Validates all settings at startup.

use reelclaw_core::Persona;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The root configuration structure.
///
/// Maps directly to `~/.reelclaw/config.toml`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language-model provider settings
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Movie catalog (metadata API) settings
    #[serde(default)]
    pub catalog: CatalogSettings,

    /// Document retrieval settings
    #[serde(default)]
    pub retrieval: RetrievalSettings,

    /// Orchestrator settings
    #[serde(default)]
    pub agent: AgentSettings,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("catalog", &self.catalog)
            .field("retrieval", &self.retrieval)
            .field("agent", &self.agent)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// OpenAI-compatible base URL
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// API key (usually supplied via environment)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat completion model
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Embedding model
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature for conversational replies
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn default_provider_base_url() -> String {
    // Gemini's OpenAI-compatible endpoint
    "https://generativelanguage.googleapis.com/v1beta/openai".into()
}
fn default_chat_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_embedding_model() -> String {
    "text-embedding-004".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_provider_timeout() -> u64 {
    120
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            api_key: None,
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_provider_timeout(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Metadata API base URL
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,

    /// Poster image base URL
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// API key (usually supplied via environment)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_catalog_timeout")]
    pub request_timeout_secs: u64,

    /// Default region for now-playing queries (ISO 3166-1)
    #[serde(default = "default_region")]
    pub default_region: String,
}

impl std::fmt::Debug for CatalogSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSettings")
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("api_key", &redact(&self.api_key))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("default_region", &self.default_region)
            .finish()
    }
}

fn default_catalog_base_url() -> String {
    "https://api.themoviedb.org/3".into()
}
fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".into()
}
fn default_catalog_timeout() -> u64 {
    15
}
fn default_region() -> String {
    "US".into()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base_url(),
            image_base_url: default_image_base_url(),
            api_key: None,
            request_timeout_secs: default_catalog_timeout(),
            default_region: default_region(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Target chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between adjacent chunks in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Number of chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum cosine similarity for a chunk to count as relevant
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,

    /// Temperature for grounded answers (kept low on purpose)
    #[serde(default = "default_answer_temperature")]
    pub answer_temperature: f32,
}

fn default_chunk_size() -> usize {
    1000
}
fn default_chunk_overlap() -> usize {
    200
}
fn default_top_k() -> usize {
    5
}
fn default_min_similarity() -> f32 {
    0.25
}
fn default_answer_temperature() -> f32 {
    0.2
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            min_similarity: default_min_similarity(),
            answer_temperature: default_answer_temperature(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Maximum interpret/dispatch iterations per turn
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Per-tool execution timeout in seconds
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,

    /// Default reply persona ("casual" or "critic")
    #[serde(default = "default_persona")]
    pub persona: String,

    /// How many recent messages accompany the system prompt
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_max_iterations() -> u32 {
    8
}
fn default_tool_timeout() -> u64 {
    30
}
fn default_persona() -> String {
    "casual".into()
}
fn default_history_window() -> usize {
    10
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tool_timeout_secs: default_tool_timeout(),
            persona: default_persona(),
            history_window: default_history_window(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.reelclaw/config.toml).
    ///
    /// Environment variables override file values for secrets:
    /// - `REELCLAW_API_KEY` / `GEMINI_API_KEY` for the provider
    /// - `TMDB_API_KEY` for the catalog
    /// - `REELCLAW_MODEL` for the chat model
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.provider.api_key.is_none() {
            config.provider.api_key = std::env::var("REELCLAW_API_KEY")
                .ok()
                .or_else(|| std::env::var("GEMINI_API_KEY").ok());
        }

        if config.catalog.api_key.is_none() {
            config.catalog.api_key = std::env::var("TMDB_API_KEY").ok();
        }

        if let Ok(model) = std::env::var("REELCLAW_MODEL") {
            config.provider.chat_model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".reelclaw")
    }

    /// The configured default persona.
    pub fn default_persona(&self) -> Result<Persona, ConfigError> {
        Persona::from_str(&self.agent.persona).map_err(ConfigError::ValidationError)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.temperature < 0.0 || self.provider.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.retrieval.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.chunk_size must be positive".into(),
            ));
        }
        if self.retrieval.chunk_overlap >= self.retrieval.chunk_size {
            return Err(ConfigError::ValidationError(
                "retrieval.chunk_overlap must be smaller than chunk_size".into(),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.top_k must be positive".into(),
            ));
        }
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_iterations must be positive".into(),
            ));
        }
        self.default_persona().map(|_| ())
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
