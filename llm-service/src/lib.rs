//! Thin HTTP client layer for a local Ollama runtime.
//!
//! This crate covers the three calls the backend needs:
//! - `POST {endpoint}/api/generate` — synchronous text generation (`stream=false`)
//! - `POST {endpoint}/api/embed`    — embeddings for retrieval queries
//! - `GET  {endpoint}/api/tags`     — reachability / model presence probe
//!
//! Handlers hold the backend behind the [`TextGenerator`] trait so tests can
//! substitute doubles; [`OllamaClient`] is the production implementation.

pub mod config;
pub mod error_handler;
pub mod generator;
pub mod services;

pub use config::LlmModelConfig;
pub use error_handler::LlmError;
pub use generator::TextGenerator;
pub use services::ollama_service::{OllamaClient, ProbeReport};
