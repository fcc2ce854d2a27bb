//! Error types for context retrieval.

use knowledge_store::StoreError;
use llm_service::LlmError;
use thiserror::Error;

/// Errors raised while fetching context for a question.
///
/// Callers are expected to absorb these: a failed retrieval downgrades the
/// answer, it does not fail the request.
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Embedding the question failed.
    #[error("[Tutor Core] embedding failed: {0}")]
    Embedding(#[from] LlmError),

    /// Vector store lookup failed.
    #[error("[Tutor Core] store lookup failed: {0}")]
    Store(#[from] StoreError),
}
