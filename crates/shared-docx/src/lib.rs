//! Shared DOCX handling utilities
//!
//! Reads WordprocessingML bodies into the [`shared_types::Document`] model,
//! writes annotated copies, and builds minimal `.docx` packages.

pub mod annotator;
pub mod builder;
pub mod error;
pub mod reader;

pub use annotator::{annotate, Annotation, AnnotationSummary};
pub use builder::DocxBuilder;
pub use error::DocxError;
pub use reader::{extract_text, read_document, read_document_bytes};

/// Main document part inside a `.docx` package
pub const DOCUMENT_PART: &str = "word/document.xml";
