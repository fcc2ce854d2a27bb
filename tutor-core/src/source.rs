//! Qdrant-backed context source: embed the question, search the collection.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use knowledge_store::{QdrantFacade, top_documents};
use llm_service::OllamaClient;
use tracing::debug;

use crate::error::RetrieveError;
use crate::retrieve::ContextSource;

/// [`ContextSource`] backed by an Ollama embedder and a Qdrant collection.
pub struct VectorContextSource {
    embedder: Arc<OllamaClient>,
    store: Arc<QdrantFacade>,
}

impl VectorContextSource {
    pub fn new(embedder: Arc<OllamaClient>, store: Arc<QdrantFacade>) -> Self {
        Self { embedder, store }
    }
}

impl ContextSource for VectorContextSource {
    fn fetch<'a>(
        &'a self,
        question: &'a str,
        limit: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, RetrieveError>> + Send + 'a>> {
        Box::pin(async move {
            let vector = self.embedder.embed(question).await?;
            let hits = top_documents(&self.store, vector, limit).await?;
            debug!(hits = hits.len(), "vector search finished");
            Ok(hits.into_iter().map(|hit| hit.text).collect())
        })
    }
}
