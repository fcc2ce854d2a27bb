//! Lightweight Ollama client for generation, embeddings, and probing.
//!
//! This module implements a thin client for the local Ollama API:
//! - `POST {endpoint}/api/generate` — synchronous text generation (`stream=false`)
//! - `POST {endpoint}/api/embed`    — embeddings retrieval
//! - `GET  {endpoint}/api/tags`     — reachability probe with a best-effort
//!   model presence check
//!
//! # Examples
//!
//! ```no_run
//! use llm_service::{LlmModelConfig, OllamaClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = LlmModelConfig {
//!     model: "nous-hermes2".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     temperature: None,
//!     top_p: None,
//!     timeout_secs: Some(300),
//! };
//!
//! let client = OllamaClient::new(cfg)?;
//!
//! let text = client.generate("Question: What is 2+2?\nAnswer:", 150).await?;
//! println!("Generated:\n{}", text);
//! # Ok(()) }
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::LlmModelConfig;
use crate::error_handler::{LlmError, Result, make_snippet};
use crate::generator::TextGenerator;

/// Thin client for Ollama.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses an HTTP client with a
/// configurable timeout. Provides high-level calls:
/// - [`OllamaClient::generate`] — synchronous text generation
/// - [`OllamaClient::embed`]    — embeddings retrieval
/// - [`OllamaClient::probe`]    — reachability / model presence check
#[derive(Debug)]
pub struct OllamaClient {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    url_embed: String,
    url_tags: String,
}

impl OllamaClient {
    /// Creates a new [`OllamaClient`] from the given config.
    ///
    /// # Errors
    /// - [`LlmError::InvalidEndpoint`] if `cfg.endpoint` is empty or missing
    ///   an http/https scheme
    /// - [`LlmError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(LlmError::InvalidEndpoint(cfg.endpoint));
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_generate = format!("{}/api/generate", base);
        let url_embed = format!("{}/api/embed", base);
        let url_tags = format!("{}/api/tags", base);

        Ok(Self {
            client,
            cfg,
            url_generate,
            url_embed,
            url_tags,
        })
    }

    /// Model identifier this client is bound to.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** generation request via `/api/generate`.
    ///
    /// `max_tokens` maps to Ollama's `num_predict` option and bounds the
    /// output length of a single call. The returned text is trimmed of
    /// leading/trailing whitespace.
    ///
    /// # Errors
    /// - [`LlmError::HttpStatus`] for non-2xx responses
    /// - [`LlmError::Transport`] for client errors
    /// - [`LlmError::Decode`] if the response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let body = GenerateRequest::new(&self.cfg, prompt, max_tokens);

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        let out: GenerateResponse = resp.json().await.map_err(|e| {
            LlmError::Decode(format!("serde error: {e}; ensure `stream=false` is used"))
        })?;

        Ok(out.response.trim().to_string())
    }

    /// Retrieves an embedding vector via `/api/embed`.
    ///
    /// Newer servers answer with `embeddings: [[f32]]`, older ones with
    /// `embedding: [f32]`; both shapes are accepted.
    ///
    /// # Errors
    /// - [`LlmError::HttpStatus`] for non-2xx responses
    /// - [`LlmError::Transport`] for client errors
    /// - [`LlmError::Decode`] if the response carries no vector
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbedRequest {
            model: &self.cfg.model,
            input,
        };

        debug!("POST {}", self.url_embed);
        let resp = self.client.post(&self.url_embed).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embed.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        let out: EmbedResponse = resp.json().await.map_err(|e| {
            LlmError::Decode(format!(
                "serde error: {e}; expected `embedding` or `embeddings`"
            ))
        })?;

        out.into_vector()
            .ok_or_else(|| LlmError::Decode("embed response carried no vector".into()))
    }

    /// Probes the server via `GET /api/tags`.
    ///
    /// A reachable server always yields `Ok`; `model_available` reports
    /// whether the configured model appeared in the tag listing (best-effort,
    /// an undecodable listing counts as available).
    ///
    /// # Errors
    /// - [`LlmError::HttpStatus`] for non-2xx responses
    /// - [`LlmError::Transport`] when the server is unreachable
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn probe(&self) -> Result<ProbeReport> {
        let start = Instant::now();

        debug!("GET {}", self.url_tags);
        let resp = self.client.get(&self.url_tags).send().await?;

        let latency_ms = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_tags.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        // Expected minimal JSON: { "models": [ { "name": "<model>" }, ... ] }
        match resp.json::<Tags>().await {
            Ok(tags) => {
                let Some(models) = tags.models else {
                    return Ok(ProbeReport {
                        model_available: true,
                        latency_ms,
                        message: "tags response without `models` field".into(),
                    });
                };
                // Tags report `name:tag`; accept the bare configured name too.
                let available = models
                    .iter()
                    .any(|m| m.name == self.cfg.model || tag_base(&m.name) == self.cfg.model);
                Ok(ProbeReport {
                    model_available: available,
                    latency_ms,
                    message: if available {
                        "model is available".into()
                    } else {
                        "model not found in /api/tags".into()
                    },
                })
            }
            Err(e) => {
                warn!(error = %e, "failed to decode /api/tags; treating server as reachable");
                Ok(ProbeReport {
                    model_available: true,
                    latency_ms,
                    message: format!("reachable; failed to decode /api/tags: {e}"),
                })
            }
        }
    }
}

impl TextGenerator for OllamaClient {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: u32,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(OllamaClient::generate(self, prompt, max_tokens))
    }
}

/// Outcome of a successful `/api/tags` round trip.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Whether the configured model appeared in the tag listing.
    pub model_available: bool,
    /// Measured probe latency in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable detail for logs.
    pub message: String,
}

/// Strips the `:tag` suffix from a tags-listing model name.
fn tag_base(name: &str) -> &str {
    name.split_once(':').map(|(base, _)| base).unwrap_or(name)
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

impl<'a> GenerateRequest<'a> {
    /// Builds a request from config, prompt, and per-call token budget.
    fn new(cfg: &'a LlmModelConfig, prompt: &'a str, max_tokens: u32) -> Self {
        Self {
            model: &cfg.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: max_tokens,
                temperature: cfg.temperature,
                top_p: cfg.top_p,
            },
        }
    }
}

/// Subset of Ollama `options`.
///
/// Extend this struct as needed (top_k, stop sequences, penalties, etc.).
#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

/// Response body for `/api/generate`.
///
/// Minimal shape: the generated text is in `response`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Request body for `/api/embed`.
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Response body for `/api/embed`, tolerant of both server generations.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embedding: Option<Vec<f32>>,
    #[serde(default)]
    embeddings: Option<Vec<Vec<f32>>>,
}

impl EmbedResponse {
    /// Extracts the single query vector, whichever field carried it.
    fn into_vector(self) -> Option<Vec<f32>> {
        if let Some(v) = self.embedding {
            return Some(v);
        }
        match self.embeddings {
            Some(mut rows) if !rows.is_empty() => Some(rows.remove(0)),
            _ => None,
        }
    }
}

/// Minimal shape of `/api/tags`.
#[derive(Debug, Deserialize)]
struct Tags {
    models: Option<Vec<Tag>>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}
