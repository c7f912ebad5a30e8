//! CLI command implementations

pub mod config;
pub mod doctor;
pub mod history;
pub mod post;
pub mod preview;
