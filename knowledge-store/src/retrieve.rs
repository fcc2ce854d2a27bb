//! Retrieval helpers: vector search mapped to document hits.

use crate::errors::StoreError;
use crate::qdrant_facade::QdrantFacade;

use tracing::trace;

/// One scored document returned from the knowledge collection.
#[derive(Debug, Clone)]
pub struct DocumentHit {
    /// Similarity score reported by the store.
    pub score: f32,
    /// Document body from the `text` payload field; empty when the payload
    /// carried none.
    pub text: String,
}

/// Runs a similarity search for a precomputed query vector and maps the
/// payloads to [`DocumentHit`]s, best match first.
///
/// # Errors
/// Returns `StoreError::Qdrant` on client failures.
pub async fn top_documents(
    store: &QdrantFacade,
    query_vector: Vec<f32>,
    limit: u64,
) -> Result<Vec<DocumentHit>, StoreError> {
    trace!("retrieve::top_documents limit={limit}");
    let scored = store.search(query_vector, limit).await?;
    Ok(hits_from_scored(scored))
}

/// Extracts the `text` payload field from scored search results.
///
/// A missing or non-string `text` is not an error; the hit keeps an empty
/// body and the caller decides what to do with it.
fn hits_from_scored(scored: Vec<(f32, serde_json::Value)>) -> Vec<DocumentHit> {
    scored
        .into_iter()
        .map(|(score, payload)| {
            let text = payload
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            DocumentHit { score, text }
        })
        .collect()
}
