//! Failure-absorbing context retrieval.
//!
//! [`ContextRetriever`] never surfaces retrieval errors to the chat flow:
//! any failure is logged and collapses to `None`, which callers treat as
//! "answer without context".

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::RetrieveError;

/// Source of candidate documents for a question.
///
/// Implementations embed the question and run a similarity search; the
/// returned strings are document bodies ordered best match first.
pub trait ContextSource: Send + Sync {
    fn fetch<'a>(
        &'a self,
        question: &'a str,
        limit: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, RetrieveError>> + Send + 'a>>;
}

/// Picks the single best context document for a question.
#[derive(Clone)]
pub struct ContextRetriever {
    source: Option<Arc<dyn ContextSource>>,
    n_results: u64,
}

impl ContextRetriever {
    /// Creates a retriever over `source`, asking it for `n_results`
    /// candidates per question (clamped to at least 1).
    pub fn new(source: Arc<dyn ContextSource>, n_results: u64) -> Self {
        Self {
            source: Some(source),
            n_results: n_results.max(1),
        }
    }

    /// Creates a retriever that never returns context. Used when the vector
    /// store is unreachable at startup.
    pub fn disabled() -> Self {
        Self {
            source: None,
            n_results: 1,
        }
    }

    /// True when a source is attached.
    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    /// Fetches the best matching document for `question`.
    ///
    /// Returns `None` when the retriever is disabled, the search came back
    /// empty, the top document has no text, or any step failed. Failures
    /// are logged and absorbed so the caller can still answer.
    pub async fn get_context(&self, question: &str) -> Option<String> {
        let source = match &self.source {
            Some(source) => source,
            None => {
                debug!("context retrieval disabled; answering without context");
                return None;
            }
        };

        match source.fetch(question, self.n_results).await {
            Ok(docs) => {
                let top = docs.into_iter().next()?;
                if top.is_empty() {
                    debug!("top context document has no text; skipping");
                    None
                } else {
                    Some(top)
                }
            }
            Err(err) => {
                warn!(error = %err, "context retrieval failed; answering without context");
                None
            }
        }
    }
}
