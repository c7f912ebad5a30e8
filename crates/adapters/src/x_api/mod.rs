//! X (Twitter) API adapter

mod oauth1;
mod write;

pub use write::{XCredentials, XPublisher};
