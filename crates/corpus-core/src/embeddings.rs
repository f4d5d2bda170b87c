//! Embedding boundary
//!
//! `HashingEmbedder` produces feature-hashed term-frequency vectors locally:
//! the same text always yields the same vector, independent of the corpus.
//! `OpenAiEmbedder` calls the `/v1/embeddings` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::EmbeddingError;

pub const HASHING_MODEL_ID: &str = "feature-hash-v1";
pub const DEFAULT_HASHING_DIM: usize = 256;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Identifier recorded in the index; queries must use the same model
    fn model_id(&self) -> &str;

    fn dimension(&self) -> usize;

    /// One vector per input text, in input order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Lowercased alphanumeric tokens hashed into buckets, then L2-normalized
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut tf = vec![0.0f32; self.dimension];

        let tokens = text
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|t| !t.is_empty());
        for token in tokens {
            let bucket = (fnv1a(&token.to_lowercase()) % self.dimension as u64) as usize;
            tf[bucket] += 1.0;
        }

        let norm: f32 = tf.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut tf {
                *x /= norm;
            }
        }
        tf
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIM)
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn model_id(&self) -> &str {
        HASHING_MODEL_ID
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// 64-bit FNV-1a; stable across builds, unlike `DefaultHasher`
fn fnv1a(token: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    token.bytes().fold(OFFSET, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(PRIME)
    })
}

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const OPENAI_EMBEDDING_DIM: usize = 1536;

/// OpenAI embeddings over HTTPS
#[derive(Clone)]
pub struct OpenAiEmbedder {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
        timeout: Duration,
    ) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            dimension,
        }
    }

    pub fn request_body(&self, texts: &[String]) -> serde_json::Value {
        json!({
            "model": self.model,
            "input": texts,
        })
    }

    /// Vectors from a response body, reordered by their `index` field
    pub fn parse_response(
        &self,
        body: &str,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut parsed: EmbeddingResponse =
            serde_json::from_str(body).map_err(|e| EmbeddingError::Malformed(e.to_string()))?;

        if parsed.data.len() != expected {
            return Err(EmbeddingError::Malformed(format!(
                "expected {} embeddings, got {}",
                expected,
                parsed.data.len()
            )));
        }
        parsed.data.sort_by_key(|d| d.index);

        parsed
            .data
            .into_iter()
            .map(|d| {
                if d.embedding.len() == self.dimension {
                    Ok(d.embedding)
                } else {
                    Err(EmbeddingError::Dimension {
                        expected: self.dimension,
                        actual: d.embedding.len(),
                    })
                }
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(model = %self.model, count = texts.len(), "Requesting embeddings");

        let resp = self
            .http
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(texts))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(EmbeddingError::Status {
                code: status.as_u16(),
                body,
            });
        }

        self.parse_response(&body, texts.len())
    }
}

/// Calculate cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
