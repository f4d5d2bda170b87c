//! Persisted reference index
//!
//! The index file is a single JSON document holding the embedder identity,
//! a manifest of ingested sources and every embedded chunk. Saving writes a
//! sibling temp file and renames it over the target, so concurrent readers
//! see either the previous index or the new one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared_types::ReferenceChunk;
use tracing::info;

use crate::embeddings::{cosine_similarity, Embedder};
use crate::error::IndexError;

/// Manifest entry for one ingested source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub file_name: String,
    /// Hex SHA-256 of the file bytes
    pub sha256: String,
    pub chunk_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceIndex {
    pub model_id: String,
    pub dimension: usize,
    pub sources: Vec<SourceRecord>,
    pub chunks: Vec<ReferenceChunk>,
}

/// A chunk paired with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a ReferenceChunk,
    pub score: f32,
}

impl ReferenceIndex {
    pub fn new(model_id: impl Into<String>, dimension: usize) -> Self {
        Self {
            model_id: model_id.into(),
            dimension,
            sources: Vec::new(),
            chunks: Vec::new(),
        }
    }

    /// Empty index keyed to `embedder`
    pub fn for_embedder(embedder: &dyn Embedder) -> Self {
        Self::new(embedder.model_id(), embedder.dimension())
    }

    pub fn add_source(&mut self, record: SourceRecord, chunks: Vec<ReferenceChunk>) {
        self.sources.push(record);
        self.chunks.extend(chunks);
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Fails when `embedder` is not the one the index was built with
    pub fn ensure_compatible(&self, embedder: &dyn Embedder) -> Result<(), IndexError> {
        if embedder.model_id() == self.model_id && embedder.dimension() == self.dimension {
            return Ok(());
        }
        Err(IndexError::EmbedderMismatch {
            indexed: format!("{} ({} dims)", self.model_id, self.dimension),
            query: format!("{} ({} dims)", embedder.model_id(), embedder.dimension()),
        })
    }

    /// The `k` chunks most similar to `query`, best first; equal scores keep
    /// ingestion order
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk<'_>>, IndexError> {
        if self.chunks.is_empty() {
            return Err(IndexError::EmptyIndex);
        }
        if query.len() != self.dimension {
            return Err(IndexError::EmbedderMismatch {
                indexed: format!("{} dims", self.dimension),
                query: format!("{} dims", query.len()),
            });
        }

        let mut scored: Vec<ScoredChunk<'_>> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                chunk,
                score: cosine_similarity(query, &chunk.embedding),
            })
            .collect();

        // stable sort
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }

    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write the index atomically
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = temp_path(path);
        let json = serde_json::to_vec(self)?;
        if let Err(e) = fs::write(&tmp, json).and_then(|_| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        info!(
            path = %path.display(),
            sources = self.sources.len(),
            chunks = self.chunks.len(),
            "Saved reference index"
        );
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
