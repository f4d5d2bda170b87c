use serde::{Deserialize, Serialize};

/// One embedded window of a reference source. Written at ingestion and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceChunk {
    /// File name of the source the chunk was cut from
    pub source_id: String,
    /// Position of the chunk within its source
    pub chunk_index: usize,
    pub text: String,
    pub embedding: Vec<f32>,
}
