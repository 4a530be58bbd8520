//! AI features: message summaries and label suggestions.
//!
//! Generation runs in background tasks; results are cached per message and
//! guarded by in-flight markers so each message is generated at most once
//! concurrently.

mod client;
mod generator;
pub mod prompts;

pub use client::OpenRouterClient;
pub use generator::{GenerationKind, Generator, Prompt, parse_labels};
