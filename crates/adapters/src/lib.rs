//! memo-poster adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `persona`: YAML persona loader
//! - `history`: JSON-file history store
//! - `llm`: Text-generation adapters (OpenAI chat completions, stub)
//! - `x_api`: X (Twitter) API publisher with OAuth 1.0a signing

mod history_json;
mod persona_fs;

pub mod llm;
pub mod x_api;

/// Re-exports for persona adapters
pub mod persona {
    pub use crate::persona_fs::FsPersonaRepo;
}

/// Re-exports for history adapters
pub mod history {
    pub use crate::history_json::JsonHistoryStore;
}

/// Re-exports for X API adapters
pub mod x {
    pub use crate::x_api::{XCredentials, XPublisher};
}
