//! Shared fixtures for pipeline integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use llm_adjudicator::{AdjudicationError, Adjudicator};
use shared_docx::DocxBuilder;

/// Board resolution that violates nothing
pub fn clean_resolution(dir: &Path) -> PathBuf {
    let path = dir.join("clean_resolution.docx");
    DocxBuilder::new()
        .heading("Written Resolution of the Board")
        .paragraph("The directors resolve to open a bank account with an ADGM bank.")
        .paragraph("This resolution is governed by the laws of the Abu Dhabi Global Market.")
        .empty_paragraph()
        .paragraph("Signed: Jane Doe")
        .paragraph("Position: Director")
        .paragraph("Date: 1 January 2025")
        .write_to(&path)
        .unwrap();
    path
}

/// Articles with a non-ADGM forum, hedging language and no signature block
pub fn flawed_articles(dir: &Path) -> PathBuf {
    let path = dir.join("flawed articles.docx");
    DocxBuilder::new()
        .heading("Articles of Association")
        .paragraph("These company articles govern Example Holdings Ltd.")
        .heading("Disputes")
        .paragraph("Any dispute shall be referred to the courts of England and Wales.")
        .paragraph("The directors may appoint a company secretary.")
        .paragraph("These articles take effect on incorporation.")
        .write_to(&path)
        .unwrap();
    path
}

/// Clean body with no signature, name, title or date in the tail
pub fn unsigned_memo(dir: &Path) -> PathBuf {
    let path = dir.join("unsigned.docx");
    DocxBuilder::new()
        .paragraph("Memorandum of Association of Example Ltd.")
        .paragraph("The objects of the company are unrestricted.")
        .paragraph("The liability of the members is limited.")
        .paragraph("The share capital is divided into ordinary shares.")
        .write_to(&path)
        .unwrap();
    path
}

/// `contract.docx` inside `dir`, which is created if missing
pub fn contract_in(dir: &Path, governing_law: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join("contract.docx");
    DocxBuilder::new()
        .heading("Employment Contract")
        .paragraph(governing_law)
        .paragraph("Signed: Jane Doe")
        .paragraph("Date: 1 January 2025")
        .write_to(&path)
        .unwrap();
    path
}

/// Memorandum with `paragraphs` body paragraphs
pub fn long_memo(dir: &Path, paragraphs: usize) -> PathBuf {
    let path = dir.join("long_memo.docx");
    let mut builder = DocxBuilder::new().heading("Memorandum of Association");
    for i in 0..paragraphs {
        builder = builder.paragraph(&format!("Clause {}: the members agree to the objects.", i));
    }
    builder.write_to(&path).unwrap();
    path
}

/// Reference corpus with one docx source
pub fn reference_dir(dir: &Path) -> PathBuf {
    let refs = dir.join("refs");
    std::fs::create_dir_all(&refs).unwrap();
    DocxBuilder::new()
        .paragraph("ADGM jurisdiction requirement: disputes are heard by the ADGM Courts.")
        .paragraph("Signature blocks state the signatory name, position and date.")
        .write_to(&refs.join("adgm_guidance.docx"))
        .unwrap();
    refs
}

/// Answers every prompt with a fixed judgment; stalls on prompts
/// containing `stall_on`
pub struct ScriptedAdjudicator {
    pub reply: String,
    pub stall_on: Option<String>,
    pub calls: AtomicUsize,
}

impl ScriptedAdjudicator {
    pub fn new(severity: &str, suggestion: &str) -> Self {
        Self {
            reply: format!(
                "Assessment follows.\n{{\"severity\": \"{}\", \"suggestion\": \"{}\"}}",
                severity, suggestion
            ),
            stall_on: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn stalling_on(mut self, needle: &str) -> Self {
        self.stall_on = Some(needle.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Adjudicator for ScriptedAdjudicator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, AdjudicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(needle) = &self.stall_on {
            if prompt.contains(needle.as_str()) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        }
        Ok(self.reply.clone())
    }
}

/// Always fails at the transport level
pub struct FailingAdjudicator;

#[async_trait]
impl Adjudicator for FailingAdjudicator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, AdjudicationError> {
        Err(AdjudicationError::Status {
            code: 503,
            body: "unavailable".to_string(),
        })
    }
}

/// File names in `dir`, sorted
pub fn list(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
