//! Stub text generator for testing and offline use

use async_trait::async_trait;
use memo_poster_domain::prompt::GenerationPrompt;
use memo_poster_domain::{GenerateError, TextGenerator};

/// Stub generator that returns configurable responses
pub struct StubGenerator {
    response: Option<String>,
    error: Option<GenerateError>,
}

impl StubGenerator {
    /// Create a stub that returns a fixed text
    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            error: None,
        }
    }

    /// Create a stub that always returns an error
    pub fn with_error(error: GenerateError) -> Self {
        Self {
            response: None,
            error: Some(error),
        }
    }

    /// Create a stub that echoes back the user prompt
    pub fn echo() -> Self {
        Self {
            response: None,
            error: None,
        }
    }
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::with_response("今日も紙とペンのメモでした。")
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<String, GenerateError> {
        if let Some(ref error) = self.error {
            return Err(match error {
                GenerateError::Api(msg) => GenerateError::Api(msg.clone()),
                GenerateError::RateLimited => GenerateError::RateLimited,
                GenerateError::Timeout => GenerateError::Timeout,
                GenerateError::Empty => GenerateError::Empty,
                GenerateError::Config(msg) => GenerateError::Config(msg.clone()),
            });
        }

        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }

        Ok(prompt.user.clone())
    }
}
