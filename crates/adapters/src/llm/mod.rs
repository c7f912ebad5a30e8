//! Text-generation adapters

pub mod openai;
pub mod stub;

pub use openai::OpenAiGenerator;
pub use stub::StubGenerator;

use serde::{Deserialize, Serialize};

/// Common LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/ID
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus-sampling threshold
    pub top_p: f64,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.9,
            top_p: 0.95,
            max_output_tokens: 300,
            timeout_secs: 45,
        }
    }
}
