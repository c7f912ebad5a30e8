//! Application use cases

pub mod compose;
pub mod post_once;

pub use compose::{FALLBACK_TAG, GenerativeComposer, TemplateComposer};
pub use post_once::{PostError, PostOnce, PostOnceConfig, RunReport};
