//! Shared state and environment-driven configuration.

use std::any::type_name;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use knowledge_store::StoreConfig;
use llm_service::{LlmModelConfig, TextGenerator};
use thiserror::Error;
use tutor_core::ContextRetriever;

/// Configuration failures detected at boot.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: expected {expected}")]
    InvalidNumber {
        var: &'static str,
        expected: &'static str,
    },
}

/// Environment-driven configuration, resolved once at boot.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Listen address, e.g. "0.0.0.0:8000".
    pub bind_addr: String,
    /// Ollama base URL shared by generation and embeddings.
    pub ollama_url: String,
    /// Generation model name.
    pub model: String,
    /// Embedding model name.
    pub embed_model: String,
    /// Completion budget per request, in tokens.
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    /// Generation can take minutes on CPU-only hosts.
    pub llm_timeout_secs: u64,
    pub embed_timeout_secs: u64,
    /// Qdrant gRPC endpoint.
    pub qdrant_url: String,
    pub qdrant_api_key: Option<String>,
    pub collection: String,
    pub embedding_dim: usize,
    /// Candidates requested per retrieval; only the best one is used.
    pub context_results: u64,
    /// Directory the favicon is served from.
    pub static_dir: PathBuf,
}

impl ApiConfig {
    /// Load configuration from environment variables, with defaults matching
    /// a local single-node deployment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Prefer explicit OLLAMA_URL, fallback to localhost:OLLAMA_PORT
        let ollama_url = std::env::var("OLLAMA_URL").unwrap_or_else(|_| {
            let port = std::env::var("OLLAMA_PORT").unwrap_or_else(|_| "11434".into());
            format!("http://localhost:{port}")
        });

        Ok(Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8000"),
            ollama_url,
            model: env_or("OLLAMA_MODEL", "nous-hermes2"),
            embed_model: env_or("OLLAMA_EMBED_MODEL", "nomic-embed-text"),
            max_tokens: env_parse("LLM_MAX_TOKENS", 150)?,
            temperature: env_parse_opt("LLM_TEMPERATURE")?,
            top_p: env_parse_opt("LLM_TOP_P")?,
            llm_timeout_secs: env_parse("LLM_TIMEOUT_SECS", 300)?,
            embed_timeout_secs: env_parse("EMBED_TIMEOUT_SECS", 30)?,
            qdrant_url: env_or("QDRANT_URL", "http://127.0.0.1:6334"),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok(),
            collection: env_or("QDRANT_COLLECTION", "tutor-knowledge"),
            embedding_dim: env_parse("EMBEDDING_DIM", 768)?,
            context_results: env_parse("CONTEXT_RESULTS", 1)?,
            static_dir: PathBuf::from(env_or("STATIC_DIR", "static")),
        })
    }

    /// Client config for answer generation.
    pub fn generation_config(&self) -> LlmModelConfig {
        LlmModelConfig {
            model: self.model.clone(),
            endpoint: self.ollama_url.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            timeout_secs: Some(self.llm_timeout_secs),
        }
    }

    /// Client config for query embeddings. Sampling options do not apply.
    pub fn embedding_config(&self) -> LlmModelConfig {
        LlmModelConfig {
            model: self.embed_model.clone(),
            endpoint: self.ollama_url.clone(),
            temperature: None,
            top_p: None,
            timeout_secs: Some(self.embed_timeout_secs),
        }
    }

    /// Vector store config.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            qdrant_url: self.qdrant_url.clone(),
            qdrant_api_key: self.qdrant_api_key.clone(),
            collection: self.collection.clone(),
            embedding_dim: self.embedding_dim,
        }
    }
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Text generator; `None` when the LLM server was unreachable at boot.
    pub generator: Option<Arc<dyn TextGenerator>>,
    /// Context retriever; disabled when the vector store was unreachable.
    pub retriever: ContextRetriever,
    /// Completion budget passed to the model per request.
    pub max_tokens: u32,
    /// Directory holding `favicon.ico`.
    pub static_dir: PathBuf,
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.into())
}

fn env_parse<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber {
            var,
            expected: type_name::<T>(),
        }),
        Err(_) => Ok(default),
    }
}

fn env_parse_opt<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                var,
                expected: type_name::<T>(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ApiConfig {
        ApiConfig {
            bind_addr: "0.0.0.0:8000".into(),
            ollama_url: "http://localhost:11434".into(),
            model: "nous-hermes2".into(),
            embed_model: "nomic-embed-text".into(),
            max_tokens: 150,
            temperature: Some(0.2),
            top_p: None,
            llm_timeout_secs: 300,
            embed_timeout_secs: 30,
            qdrant_url: "http://127.0.0.1:6334".into(),
            qdrant_api_key: None,
            collection: "tutor-knowledge".into(),
            embedding_dim: 768,
            context_results: 1,
            static_dir: PathBuf::from("static"),
        }
    }

    #[test]
    fn generation_config_uses_chat_model_and_sampling() {
        let cfg = sample_config().generation_config();
        assert_eq!(cfg.model, "nous-hermes2");
        assert_eq!(cfg.endpoint, "http://localhost:11434");
        assert_eq!(cfg.temperature, Some(0.2));
        assert_eq!(cfg.timeout_secs, Some(300));
    }

    #[test]
    fn embedding_config_uses_embed_model_without_sampling() {
        let cfg = sample_config().embedding_config();
        assert_eq!(cfg.model, "nomic-embed-text");
        assert_eq!(cfg.temperature, None);
        assert_eq!(cfg.top_p, None);
        assert_eq!(cfg.timeout_secs, Some(30));
    }

    #[test]
    fn store_config_carries_collection_and_dim() {
        let cfg = sample_config().store_config();
        assert_eq!(cfg.collection, "tutor-knowledge");
        assert_eq!(cfg.embedding_dim, 768);
        assert!(cfg.qdrant_api_key.is_none());
    }
}
