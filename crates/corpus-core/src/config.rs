//! Retrieval and embedder configuration

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chunker::{
    ChunkerConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_SEGMENT_SIZE,
};
use crate::embeddings::{
    Embedder, HashingEmbedder, OpenAiEmbedder, DEFAULT_HASHING_DIM, OPENAI_BASE_URL,
    OPENAI_EMBEDDING_DIM, OPENAI_EMBEDDING_MODEL,
};
use crate::error::EmbeddingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    #[default]
    Hashing,
    OpenAi,
}

impl std::str::FromStr for EmbedderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashing" => Ok(EmbedderKind::Hashing),
            "openai" => Ok(EmbedderKind::OpenAi),
            other => Err(format!("unknown embedder: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbedderKind,
    /// Remote model name; ignored by the hashing embedder
    pub model: String,
    pub dimension: usize,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbedderKind::Hashing,
            model: OPENAI_EMBEDDING_MODEL.to_string(),
            dimension: DEFAULT_HASHING_DIM,
            base_url: OPENAI_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl RetrievalConfig {
    pub fn chunker(&self) -> ChunkerConfig {
        ChunkerConfig {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            segment_size: DEFAULT_SEGMENT_SIZE,
        }
    }
}

/// Select the embedder once from configuration
///
/// `api_key` is the OpenAI key; it is only required for the OpenAI embedder.
pub fn build_embedder(
    config: &EmbeddingConfig,
    api_key: Option<&str>,
) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match config.provider {
        EmbedderKind::Hashing => Ok(Arc::new(HashingEmbedder::new(config.dimension))),
        EmbedderKind::OpenAi => {
            let key = api_key
                .filter(|k| !k.trim().is_empty())
                .ok_or(EmbeddingError::MissingCredentials("OPENAI_API_KEY"))?;
            // the hashing default is never a valid OpenAI dimension
            let dimension = if config.dimension == DEFAULT_HASHING_DIM {
                OPENAI_EMBEDDING_DIM
            } else {
                config.dimension
            };
            Ok(Arc::new(OpenAiEmbedder::new(
                &config.base_url,
                key,
                config.model.clone(),
                dimension,
                Duration::from_secs(config.timeout_secs),
            )))
        }
    }
}
