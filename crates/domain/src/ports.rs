//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::Persona;
use crate::prompt::GenerationPrompt;

/// Error type for text-generation operations
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("LLM API error: {0}")]
    Api(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Timeout")]
    Timeout,
    #[error("Empty completion")]
    Empty,
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Port for LLM-backed candidate generation (generative strategy only).
/// One synchronous call per run; failures surface unmodified and are fatal.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce one candidate text from the assembled prompt
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<String, GenerateError>;
}

/// Error type for publisher operations
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Content too long: {len} > {max}")]
    ContentTooLong { len: usize, max: usize },
}

/// Receipt returned by a successful publish
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    /// Platform-specific post ID
    pub id: String,
    /// URL to the published content, if available
    pub url: Option<String>,
}

/// Port for publishing the final text
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish the text, returning the platform receipt
    async fn publish(&self, text: &str) -> Result<PublishReceipt, PublishError>;

    /// Check if this publisher is enabled
    fn is_enabled(&self) -> bool;

    /// Get the platform name (e.g., "x")
    fn platform(&self) -> &'static str;
}

/// Error type for history store operations
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Port for the capped, append-only post history.
///
/// Failures here are explicit but non-fatal by policy: the orchestrator logs
/// and degrades (empty history on load failure, lost history on save failure)
/// because history only feeds duplicate detection, never correctness of the
/// current post.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load all stored entries, oldest first
    async fn load(&self) -> Result<Vec<String>, HistoryError>;

    /// Persist the last `cap` entries, overwriting any prior content
    async fn save(&self, entries: &[String], cap: usize) -> Result<(), HistoryError>;
}

/// Error type for persona loading
#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },
}

/// Port for loading the persona configuration
#[async_trait]
pub trait PersonaRepo: Send + Sync {
    /// Load the persona document
    async fn load(&self) -> Result<Persona, PersonaError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
