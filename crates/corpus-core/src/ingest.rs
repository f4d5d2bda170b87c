//! Reference corpus ingestion
//!
//! Reads every `.pdf` and `.docx` in a directory (sorted by name), cuts the
//! text into windows, embeds them and builds a fresh [`ReferenceIndex`].
//! Rebuilding always replaces the whole index.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use shared_types::ReferenceChunk;
use tracing::{debug, info, warn};

use crate::chunker::ChunkerConfig;
use crate::embeddings::Embedder;
use crate::error::IndexError;
use crate::index::{ReferenceIndex, SourceRecord};

/// Chunks sent to the embedder per request
pub const EMBED_BATCH_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Pdf,
    Docx,
}

impl SourceKind {
    fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(SourceKind::Pdf),
            "docx" => Some(SourceKind::Docx),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub ingested: Vec<String>,
    /// Files skipped as unsupported or unreadable
    pub skipped: Vec<String>,
    pub chunks: usize,
}

/// Build a new index from the reference sources in `dir`
pub async fn ingest_dir(
    dir: &Path,
    embedder: &dyn Embedder,
    chunker: &ChunkerConfig,
) -> Result<(ReferenceIndex, IngestSummary), IndexError> {
    if !dir.is_dir() {
        return Err(IndexError::NotADirectory(dir.display().to_string()));
    }

    let mut index = ReferenceIndex::for_embedder(embedder);
    let mut summary = IngestSummary::default();

    for path in list_files(dir)? {
        let name = file_name(&path);
        let Some(kind) = SourceKind::of(&path) else {
            info!(file = %name, "Skipping unsupported file");
            summary.skipped.push(name);
            continue;
        };

        let bytes = fs::read(&path)?;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        let text = match extract(&path, kind).await {
            Ok(text) => text,
            Err(reason) => {
                warn!(file = %name, error = %reason, "Could not read reference source");
                summary.skipped.push(name);
                continue;
            }
        };

        let windows = chunker.chunks(&text);
        let embeddings = embed_batched(embedder, &windows).await?;
        let chunks: Vec<ReferenceChunk> = windows
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(chunk_index, (text, embedding))| ReferenceChunk {
                source_id: name.clone(),
                chunk_index,
                text,
                embedding,
            })
            .collect();

        info!(file = %name, chunks = chunks.len(), "Ingested reference source");
        summary.chunks += chunks.len();
        index.add_source(
            SourceRecord {
                file_name: name.clone(),
                sha256,
                chunk_count: chunks.len(),
            },
            chunks,
        );
        summary.ingested.push(name);
    }

    info!(
        sources = summary.ingested.len(),
        skipped = summary.skipped.len(),
        chunks = summary.chunks,
        "Ingestion complete"
    );
    Ok((index, summary))
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>, IndexError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && !is_hidden(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    let name = file_name(path);
    name.starts_with('.') || name.starts_with("~$")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Text extraction runs on the blocking pool; PDF parsing is CPU-bound
async fn extract(path: &Path, kind: SourceKind) -> Result<String, String> {
    let path = path.to_path_buf();
    let task = tokio::task::spawn_blocking(move || match kind {
        SourceKind::Pdf => pdf_extract::extract_text(&path).map_err(|e| e.to_string()),
        SourceKind::Docx => shared_docx::extract_text(&path).map_err(|e| e.to_string()),
    });
    task.await.map_err(|e| e.to_string())?
}

async fn embed_batched(
    embedder: &dyn Embedder,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, IndexError> {
    let mut out = Vec::with_capacity(texts.len());
    for batch in texts.chunks(EMBED_BATCH_SIZE) {
        debug!(size = batch.len(), "Embedding batch");
        out.extend(embedder.embed(batch).await?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashingEmbedder;
    use pretty_assertions::assert_eq;
    use shared_docx::DocxBuilder;

    #[tokio::test]
    async fn test_ingest_docx_and_skip_others() {
        let dir = tempfile::tempdir().unwrap();
        DocxBuilder::new()
            .heading("ADGM Companies Regulations")
            .paragraph("The Courts of ADGM shall have exclusive jurisdiction.")
            .write_to(&dir.path().join("b_regs.docx"))
            .unwrap();
        DocxBuilder::new()
            .paragraph("Every company shall have at least two authorised signatories.")
            .write_to(&dir.path().join("a_checklist.docx"))
            .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("~$lock.docx"), "lock").unwrap();

        let embedder = HashingEmbedder::default();
        let (index, summary) = ingest_dir(dir.path(), &embedder, &ChunkerConfig::default())
            .await
            .unwrap();

        assert_eq!(summary.ingested, vec!["a_checklist.docx", "b_regs.docx"]);
        assert_eq!(summary.skipped, vec!["notes.txt"]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.sources[0].chunk_count, 1);
        assert_eq!(index.sources[0].sha256.len(), 64);
        assert_eq!(index.chunks[1].source_id, "b_regs.docx");
        assert!(index.ensure_compatible(&embedder).is_ok());
    }

    #[tokio::test]
    async fn test_unreadable_source_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.docx"), "not a zip").unwrap();

        let (index, summary) =
            ingest_dir(dir.path(), &HashingEmbedder::default(), &ChunkerConfig::default())
                .await
                .unwrap();

        assert!(index.is_empty());
        assert_eq!(summary.skipped, vec!["broken.docx"]);
    }

    #[tokio::test]
    async fn test_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = ingest_dir(
            &dir.path().join("nope"),
            &HashingEmbedder::default(),
            &ChunkerConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(IndexError::NotADirectory(_))));
    }
}
