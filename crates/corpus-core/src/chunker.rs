//! Fixed-size overlapping windows over reference text
//!
//! Sizes are counted in `char`s so a window never splits a code point.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CHUNK_SIZE: usize = 1200;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
/// Long texts are cut into segments of this many chars before windowing
pub const DEFAULT_SEGMENT_SIZE: usize = 6000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub segment_size: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            segment_size: DEFAULT_SEGMENT_SIZE,
        }
    }
}

impl ChunkerConfig {
    /// Windows for every segment of `text`, in order; blank windows are dropped
    pub fn chunks(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let segment = self.segment_size.max(1);

        chars
            .chunks(segment)
            .flat_map(|seg| windows(seg, self.chunk_size, self.chunk_overlap))
            .collect()
    }
}

/// Split `text` into windows of `chunk_size` chars overlapping by `overlap`
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    windows(&chars, chunk_size, overlap)
}

fn windows(chars: &[char], chunk_size: usize, overlap: usize) -> Vec<String> {
    let size = chunk_size.max(1);
    // overlap >= size would never advance
    let step = size - overlap.min(size - 1);
    let mut out = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + size).min(chars.len());
        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            out.push(chunk.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }

    out
}
