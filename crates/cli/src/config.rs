//! Configuration loading and management

use anyhow::{Context, Result};
use memo_poster_domain::StrategyKind;
use memo_poster_domain::similarity::SimilarityConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub x: XConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_persona_path")]
    pub persona_path: PathBuf,

    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_true")]
    pub dry_run: bool,

    /// Env var whose value seasons the daily seed (distinct deployments of
    /// the same persona post different texts on the same day)
    #[serde(default = "default_repository_env")]
    pub repository_env: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Candidate attempts before falling back; strategy-dependent when unset
    #[serde(default)]
    pub max_attempts: Option<u32>,

    #[serde(default)]
    pub similarity_threshold: Option<f64>,

    /// Recent-history window compared against; strategy-dependent when unset
    #[serde(default)]
    pub similarity_window: Option<usize>,

    /// History entries kept on disk; strategy-dependent when unset
    #[serde(default)]
    pub history_cap: Option<usize>,
}

/// Generation settings with strategy defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedGeneration {
    pub strategy: StrategyKind,
    pub max_attempts: u32,
    pub history_cap: usize,
    pub similarity: SimilarityConfig,
}

impl GenerationConfig {
    /// Apply per-strategy defaults to unset fields. The template strategy
    /// retries locally so it gets a deeper window and a larger cap; the
    /// generative strategy makes one API call and patches instead.
    pub fn resolved(&self) -> ResolvedGeneration {
        let (max_attempts, window, cap) = match self.strategy {
            StrategyKind::Template => (8, 30, 100),
            StrategyKind::Generative => (1, 10, 50),
        };

        let defaults = SimilarityConfig::default();

        ResolvedGeneration {
            strategy: self.strategy,
            max_attempts: self.max_attempts.unwrap_or(max_attempts),
            history_cap: self.history_cap.unwrap_or(cap),
            similarity: SimilarityConfig {
                threshold: self.similarity_threshold.unwrap_or(defaults.threshold),
                window: self.similarity_window.unwrap_or(window),
                ..defaults
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_top_p")]
    pub top_p: f64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_x_base_url")]
    pub base_url: String,

    /// Platform character cap, applied as a publish pre-flight
    #[serde(default = "default_x_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_x_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_x_api_secret_env")]
    pub api_secret_env: String,

    #[serde(default = "default_x_access_token_env")]
    pub access_token_env: String,

    #[serde(default = "default_x_access_secret_env")]
    pub access_secret_env: String,
}

// Default value functions
fn default_persona_path() -> PathBuf {
    PathBuf::from("./persona.yaml")
}

fn default_history_path() -> PathBuf {
    PathBuf::from("./.last_posts.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_repository_env() -> String {
    "GITHUB_REPOSITORY".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.9
}

fn default_top_p() -> f64 {
    0.95
}

fn default_max_output_tokens() -> u32 {
    300
}

fn default_timeout() -> u64 {
    45
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_x_base_url() -> String {
    "https://api.x.com".to_string()
}

fn default_x_max_chars() -> usize {
    280
}

fn default_x_api_key_env() -> String {
    "X_API_KEY".to_string()
}

fn default_x_api_secret_env() -> String {
    "X_API_SECRET".to_string()
}

fn default_x_access_token_env() -> String {
    "X_ACCESS_TOKEN".to_string()
}

fn default_x_access_secret_env() -> String {
    "X_ACCESS_SECRET".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            persona_path: default_persona_path(),
            history_path: default_history_path(),
            log_level: default_log_level(),
            dry_run: default_true(),
            repository_env: default_repository_env(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout(),
            api_key_env: default_openai_api_key_env(),
            base_url: default_openai_base_url(),
        }
    }
}

impl Default for XConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_x_base_url(),
            max_chars: default_x_max_chars(),
            api_key_env: default_x_api_key_env(),
            api_secret_env: default_x_api_secret_env(),
            access_token_env: default_x_access_token_env(),
            access_secret_env: default_x_access_secret_env(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("MEMO_POSTER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# memo-poster configuration

[general]
persona_path = "./persona.yaml"
history_path = "./.last_posts.json"
log_level = "info"
dry_run = true
# Env var mixed into the daily seed so separate deployments diverge
repository_env = "GITHUB_REPOSITORY"

[generation]
strategy = "template"  # template, generative
# Unset values default per strategy: template 8/30/100, generative 1/10/50
# max_attempts = 8
# similarity_threshold = 0.9
# similarity_window = 30
# history_cap = 100

[llm]
model = "gpt-4o-mini"
temperature = 0.9
top_p = 0.95
max_output_tokens = 300
timeout_secs = 45
api_key_env = "OPENAI_API_KEY"
base_url = "https://api.openai.com/v1"

[x]
enabled = false
base_url = "https://api.x.com"
max_chars = 280
api_key_env = "X_API_KEY"
api_secret_env = "X_API_SECRET"
access_token_env = "X_ACCESS_TOKEN"
access_secret_env = "X_ACCESS_SECRET"
"#
        .to_string()
    }

    /// Generate example persona as YAML string
    pub fn example_persona_yaml() -> String {
        r#"# memo-poster persona
name: "文具メモ"
language: "ja"

guardrails:
  max_chars: 220
  banned_words:
    - "広告"
    - "宣伝"

style:
  tone: "落ち着いた観察メモ"
  formality: "丁寧すぎない常体"
  emoji_density: "none"
  hashtags_policy: "none"

content_preferences:
  topics_pool:
    - "紙とインクの相性"
    - "ペン先の太さ"
    - "ノートの使い分け"
  call_to_action_rate: 0.1
  add_quote_rate: 0.2

example_posts:
  - "外で書くならクリップボードが机になる。"
  - "インデックスは最初の見開きに。あとから効く。"
"#
        .to_string()
    }
}
