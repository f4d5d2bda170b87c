//! ADGM compliance checker
//!
//! Wires the document reader, rule engine, reference retrieval and model
//! adjudication into a per-document pipeline that writes an annotated copy
//! and a JSON issue report.

pub mod config;
pub mod error;
pub mod inputs;
pub mod pipeline;
pub mod report;

pub use config::{CheckerConfig, Secrets};
pub use error::AnalysisError;
pub use pipeline::{AnalysisOutcome, Analyzer, AnalyzerSettings, Evaluation};
