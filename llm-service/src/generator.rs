//! Seam between request handlers and the generation backend.

use std::{future::Future, pin::Pin};

use crate::error_handler::LlmError;

/// Asynchronous text generation backend.
///
/// Implement this trait to plug in another engine or a test double; the
/// production implementation is [`crate::OllamaClient`].
pub trait TextGenerator: Send + Sync {
    /// Generates a complete (non-streaming) answer for `prompt`, producing
    /// at most `max_tokens` tokens.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: u32,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>>;
}
