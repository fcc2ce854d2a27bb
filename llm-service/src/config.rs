//! Configuration for one model binding.

/// Configuration for an Ollama model binding.
///
/// The backend builds two of these from the environment: one for the
/// generation model and one for the query-embedding model. The token budget
/// is not part of the config; callers pass it per generation call.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"nous-hermes2"`, `"nomic-embed-text"`).
/// - `endpoint`: The Ollama base URL (e.g., `http://localhost:11434`).
/// - `temperature`: Controls randomness; `None` keeps the engine default.
/// - `top_p`: Nucleus sampling cutoff; `None` keeps the engine default.
/// - `timeout_secs`: Optional request timeout in seconds.
#[derive(Debug, Clone)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// Inference endpoint (local socket/URL or remote API URL).
    pub endpoint: String,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
