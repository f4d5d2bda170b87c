//! Per-document analysis pipeline
//!
//! Reader → classifier → rule engine → (per finding) retrieval and
//! adjudication → annotated copy and JSON report. One run owns its document
//! and findings; the retriever's index is shared read-only.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use compliance_engine::{Classification, ComplianceEngine, Rule};
use corpus_core::Retriever;
use llm_adjudicator::{build_prompt, AdjudicationError, Adjudicator, PromptInput};
use shared_docx::{Annotation, AnnotationSummary, DocxError};
use shared_types::{Document, Finding, Report, Severity};
use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::report::{annotated_file_name, report_file_name, write_report, OutputNames};

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub output_dir: PathBuf,
    /// Reference chunks retrieved per finding
    pub top_k: usize,
    pub adjudication_timeout: Duration,
    /// Bound on reading and evaluating one document; nothing is written when it elapses
    pub document_timeout: Option<Duration>,
}

impl AnalyzerSettings {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            top_k: 3,
            adjudication_timeout: Duration::from_secs(30),
            document_timeout: None,
        }
    }
}

/// Classification and findings for one document, before anything is written
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub file_name: String,
    pub paragraph_count: usize,
    pub classification: Classification,
    pub findings: Vec<Finding>,
}

impl Evaluation {
    pub fn report(&self) -> Report {
        Report::new(
            self.file_name.clone(),
            self.classification.label(),
            self.classification.confidence,
            self.paragraph_count,
            &self.findings,
        )
    }
}

#[derive(Debug)]
pub struct AnalysisOutcome {
    pub report: Report,
    pub report_path: PathBuf,
    pub annotated_path: PathBuf,
    pub annotation: AnnotationSummary,
}

impl AnalysisOutcome {
    /// One line for the batch summary
    pub fn summary_line(&self) -> String {
        let report = &self.report;
        format!(
            "[OK] {} ({}, {:.2}): {} issues (High {}, Medium {}, Low {}) -> {}",
            report.file_analyzed,
            report.doc_type,
            report.classification_confidence,
            report.issues_found.len(),
            report.count_by_severity(Severity::High),
            report.count_by_severity(Severity::Medium),
            report.count_by_severity(Severity::Low),
            self.report_path.display()
        )
    }
}

pub struct Analyzer {
    engine: ComplianceEngine,
    retriever: Option<Retriever>,
    adjudicator: Option<Arc<dyn Adjudicator>>,
    outputs: OutputNames,
    settings: AnalyzerSettings,
}

impl Analyzer {
    pub fn new(settings: AnalyzerSettings) -> Self {
        Self {
            engine: ComplianceEngine::new(),
            retriever: None,
            adjudicator: None,
            outputs: OutputNames::new(),
            settings,
        }
    }

    pub fn with_retriever(mut self, retriever: Retriever) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn with_adjudicator(mut self, adjudicator: Arc<dyn Adjudicator>) -> Self {
        self.adjudicator = Some(adjudicator);
        self
    }

    /// Analyse one `.docx` and write its annotated copy and report
    pub async fn analyze(&self, path: &Path) -> Result<AnalysisOutcome, AnalysisError> {
        let started = Utc::now();
        let evaluation = match self.settings.document_timeout {
            Some(limit) => tokio::time::timeout(limit, self.evaluate_path(path))
                .await
                .map_err(|_| AnalysisError::Timeout {
                    path: path.display().to_string(),
                    secs: limit.as_secs(),
                })??,
            None => self.evaluate_path(path).await?,
        };

        let name = self.outputs.claim(path).await;
        self.persist(path, &name, &evaluation, started)
    }

    /// Read off the runtime so a document timeout can abandon a slow parse
    pub async fn evaluate_path(&self, path: &Path) -> Result<Evaluation, AnalysisError> {
        let owned = path.to_path_buf();
        let read = tokio::task::spawn_blocking(move || shared_docx::read_document(&owned))
            .await
            .map_err(|e| DocxError::Io(std::io::Error::other(e)))
            .and_then(|result| result);
        let document = read.map_err(|source| AnalysisError::Input {
            path: path.display().to_string(),
            source,
        })?;
        self.evaluate(&document).await
    }

    /// Classify, run the rules, then enrich each finding in order
    pub async fn evaluate(&self, document: &Document) -> Result<Evaluation, AnalysisError> {
        let classification = self.engine.classify(document);
        let mut findings = self.engine.check_document(document);

        info!(
            file = %document.file_name,
            doc_type = classification.label(),
            confidence = classification.confidence,
            findings = findings.len(),
            "Rule checks complete"
        );

        for finding in &mut findings {
            let Some(rule) = self.engine.rule(&finding.rule_id) else {
                continue;
            };
            self.enrich(document, classification.label(), rule, finding)
                .await?;
        }

        Ok(Evaluation {
            file_name: document.file_name.clone(),
            paragraph_count: document.paragraph_count,
            classification,
            findings,
        })
    }

    async fn enrich(
        &self,
        document: &Document,
        doc_type: &str,
        rule: &Rule,
        finding: &mut Finding,
    ) -> Result<(), AnalysisError> {
        let paragraph = document
            .paragraph(finding.paragraph_index)
            .map(|p| p.text.as_str())
            .unwrap_or_default();

        if let Some(retriever) = &self.retriever {
            let query = format!("{} {}", rule.retrieval_query, paragraph);
            match retriever.retrieve(&query, self.settings.top_k).await {
                Ok(evidence) => finding.evidence = evidence,
                Err(e) if e.is_empty_index() => {
                    return Err(AnalysisError::IndexNotReady(e.to_string()))
                }
                Err(e) => warn!(
                    rule = rule.id,
                    error = %e,
                    "Retrieval failed; continuing without evidence"
                ),
            }
        }

        // without an adjudicator the finding stays `skipped`
        let Some(adjudicator) = &self.adjudicator else {
            return Ok(());
        };

        let prompt = build_prompt(&PromptInput {
            doc_type,
            paragraph,
            rule_description: rule.description,
            issue: &finding.issue,
            evidence: &finding.evidence,
        });

        let result = tokio::time::timeout(
            self.settings.adjudication_timeout,
            adjudicator.adjudicate(&prompt),
        )
        .await
        .unwrap_or(Err(AdjudicationError::Timeout));

        match result {
            Ok(judgment) => {
                debug!(
                    rule = rule.id,
                    paragraph = finding.paragraph_index,
                    severity = %judgment.severity,
                    "Finding adjudicated"
                );
                finding.adjudicate(judgment.severity, judgment.suggestion);
            }
            Err(e) => {
                warn!(
                    adjudicator = adjudicator.name(),
                    rule = rule.id,
                    paragraph = finding.paragraph_index,
                    error = %e,
                    "Adjudication failed; keeping rule defaults"
                );
                finding.mark_unadjudicated();
            }
        }
        Ok(())
    }

    /// Annotated copy first, then the report; the report is written even if
    /// the annotated copy fails
    fn persist(
        &self,
        source: &Path,
        name: &str,
        evaluation: &Evaluation,
        at: DateTime<Utc>,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let dir = &self.settings.output_dir;
        fs::create_dir_all(dir).map_err(|e| AnalysisError::output(dir, e))?;

        let report = evaluation.report();
        let annotated_path = dir.join(annotated_file_name(name));
        let report_path = dir.join(report_file_name(name, at));

        let annotations: Vec<Annotation> = evaluation
            .findings
            .iter()
            .map(|f| Annotation::new(f.paragraph_index, f.annotation_text()))
            .collect();
        let annotated = shared_docx::annotate(source, &annotations, &annotated_path);

        write_report(&report, &report_path).map_err(|e| AnalysisError::output(&report_path, e))?;
        info!(path = %report_path.display(), issues = report.issues_found.len(), "Saved report");

        let annotation = annotated.map_err(|e| AnalysisError::output(&annotated_path, e))?;

        Ok(AnalysisOutcome {
            report,
            report_path,
            annotated_path,
            annotation,
        })
    }
}
