//! Corpus Core - reference corpus ingestion and retrieval
//!
//! This crate provides:
//! - Fixed-size overlapping text windows
//! - The `Embedder` boundary (local feature hashing or a remote provider)
//! - A persisted `ReferenceIndex` of embedded chunks
//! - Cosine-similarity retrieval of evidence for findings

pub mod chunker;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod index;
pub mod ingest;
pub mod retriever;

// Re-export commonly used types
pub use chunker::{chunk_text, ChunkerConfig};
pub use config::{build_embedder, EmbedderKind, EmbeddingConfig, RetrievalConfig};
pub use embeddings::{cosine_similarity, Embedder, HashingEmbedder, OpenAiEmbedder};
pub use error::{EmbeddingError, IndexError, RetrievalError};
pub use index::{ReferenceIndex, ScoredChunk, SourceRecord};
pub use ingest::{ingest_dir, IngestSummary};
pub use retriever::Retriever;
