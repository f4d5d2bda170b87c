use std::sync::Arc;

use shared_types::Evidence;
use tracing::debug;

use crate::embeddings::Embedder;
use crate::error::RetrievalError;
use crate::index::ReferenceIndex;

/// Evidence text is cut to this many chars
pub const MAX_EVIDENCE_CHARS: usize = 1000;

/// Read-only view over a shared index plus the embedder that built it
#[derive(Clone)]
pub struct Retriever {
    index: Arc<ReferenceIndex>,
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    pub fn new(
        index: Arc<ReferenceIndex>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, RetrievalError> {
        index.ensure_compatible(embedder.as_ref())?;
        Ok(Self { index, embedder })
    }

    /// Top `k` reference chunks for `query` as report evidence
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Evidence>, RetrievalError> {
        if self.index.is_empty() {
            return Err(crate::error::IndexError::EmptyIndex.into());
        }

        let mut vectors = self.embedder.embed(&[query.to_string()]).await?;
        let query_vec = vectors.pop().unwrap_or_default();
        let hits = self.index.search(&query_vec, k)?;

        debug!(query, hits = hits.len(), "Retrieved evidence");
        Ok(hits
            .into_iter()
            .map(|hit| Evidence {
                source_id: hit.chunk.source_id.clone(),
                score: hit.score.clamp(0.0, 1.0),
                text: truncate_chars(&hit.chunk.text, MAX_EVIDENCE_CHARS),
            })
            .collect())
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
