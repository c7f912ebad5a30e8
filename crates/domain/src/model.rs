//! Domain models and value objects

use serde::{Deserialize, Serialize};

/// Persona configuration loaded from an external YAML document.
///
/// Read-only for the duration of a run. Every field has a default so an
/// empty document is a valid (if bland) persona.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Persona {
    /// Display name of the posting persona
    #[serde(default)]
    pub name: String,
    /// Output language (informational, used in prompt assembly)
    #[serde(default = "default_language")]
    pub language: String,
    /// Hard constraints on the final text
    #[serde(default)]
    pub guardrails: Guardrails,
    /// Free-form style hints (generative strategy only)
    #[serde(default)]
    pub style: Style,
    /// Topic and phrasing preferences (generative strategy only)
    #[serde(default)]
    pub content_preferences: ContentPreferences,
    /// Pre-authored fallback posts for when generation keeps colliding
    /// with history
    #[serde(default)]
    pub example_posts: Vec<String>,
}

/// Guardrails applied to every candidate before it can be posted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guardrails {
    /// Maximum characters (Unicode scalars, not bytes) in the final text
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    /// Substrings removed from candidates (naive literal deletion)
    #[serde(default)]
    pub banned_words: Vec<String>,
}

impl Default for Guardrails {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            banned_words: vec![],
        }
    }
}

/// Free-form style hints interpolated into the generation prompt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub formality: String,
    #[serde(default)]
    pub emoji_density: String,
    #[serde(default)]
    pub hashtags_policy: String,
}

/// Topic pool and phrasing rates for the generative strategy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentPreferences {
    #[serde(default)]
    pub topics_pool: Vec<String>,
    /// Probability in [0, 1] of asking for a closing call to action
    #[serde(default)]
    pub call_to_action_rate: f64,
    /// Probability in [0, 1] of asking for a short quotation
    #[serde(default)]
    pub add_quote_rate: f64,
}

fn default_language() -> String {
    "ja".to_string()
}

fn default_max_chars() -> usize {
    220
}

/// Which candidate-generation strategy drives a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Seeded template fill with bounded retry and example-post fallback
    #[default]
    Template,
    /// Single LLM call, patched with a fallback tag when too similar
    Generative,
}

/// Final text produced by a compose strategy, with outcome metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPost {
    /// The text chosen for posting
    pub text: String,
    /// Generation attempts consumed (always 1 for the generative strategy)
    pub attempts: u32,
    /// Whether the fallback policy had to kick in
    pub used_fallback: bool,
}
