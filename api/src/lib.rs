//! HTTP surface of the tutor backend.
//!
//! Three routes: `GET /` (liveness), `GET /favicon.ico`, and `POST /chat`.
//! [`start`] wires configuration, the Ollama client, and the Qdrant-backed
//! retriever into shared state, then serves until Ctrl+C.

use std::sync::Arc;

mod core;
mod error_handler;
mod routes;

pub use crate::core::app_state::{ApiConfig, AppState, ConfigError};
pub use crate::error_handler::{AppError, AppResult};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use knowledge_store::QdrantFacade;
use llm_service::{OllamaClient, TextGenerator};
use tutor_core::{ContextRetriever, VectorContextSource};

use crate::routes::{chat::chat_route::chat, favicon_route::favicon, status_route::status};

pub async fn start() -> AppResult<()> {
    let config = ApiConfig::from_env()?;

    // The favicon lives here; a missing directory only costs the icon.
    if let Err(err) = tokio::fs::create_dir_all(&config.static_dir).await {
        warn!(
            error = %err,
            dir = %config.static_dir.display(),
            "could not create static directory"
        );
    }

    let generator = init_generator(&config).await;
    let retriever = init_retriever(&config).await;

    let state = Arc::new(AppState {
        generator,
        retriever,
        max_tokens: config.max_tokens,
        static_dir: config.static_dir.clone(),
    });

    let app = router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(AppError::Bind)?;
    info!(addr = %config.bind_addr, "tutor backend listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Builds the application router over shared state.
///
/// Browser clients call `/chat` directly, so CORS stays wide open.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(status))
        .route("/favicon.ico", get(favicon))
        .route("/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Creates the text generator, probing the LLM server first.
///
/// An unreachable server leaves the generator absent and `/chat` answers
/// 503 until restart. A reachable server that does not list the configured
/// model is kept with a warning: a pull can finish after boot.
async fn init_generator(config: &ApiConfig) -> Option<Arc<dyn TextGenerator>> {
    let client = match OllamaClient::new(config.generation_config()) {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "could not construct LLM client");
            return None;
        }
    };

    match client.probe().await {
        Ok(report) if report.model_available => {
            info!(model = %config.model, latency_ms = report.latency_ms, "LLM ready");
        }
        Ok(report) => {
            warn!(model = %config.model, detail = %report.message, "LLM reachable, model not listed");
        }
        Err(err) => {
            error!(error = %err, "LLM server unreachable; /chat will answer 503");
            return None;
        }
    }

    Some(Arc::new(client))
}

/// Wires the Qdrant-backed context retriever.
///
/// Retrieval is an enhancement: any failure here disables it and the
/// backend answers from the model alone.
async fn init_retriever(config: &ApiConfig) -> ContextRetriever {
    let facade = match QdrantFacade::new(&config.store_config()) {
        Ok(facade) => facade,
        Err(err) => {
            warn!(error = %err, "vector store client failed; context retrieval disabled");
            return ContextRetriever::disabled();
        }
    };

    if let Err(err) = facade.ensure_collection().await {
        warn!(error = %err, "vector store unavailable; context retrieval disabled");
        return ContextRetriever::disabled();
    }

    let embedder = match OllamaClient::new(config.embedding_config()) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            warn!(error = %err, "embedding client failed; context retrieval disabled");
            return ContextRetriever::disabled();
        }
    };

    info!(collection = %facade.collection(), "context retrieval enabled");
    let source = VectorContextSource::new(embedder, Arc::new(facade));
    ContextRetriever::new(Arc::new(source), config.context_results)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    // Wait for the Ctrl+C signal
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
