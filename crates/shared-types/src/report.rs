//! Structured issue report
//!
//! Field order in these structs is the field order of the serialized JSON, so
//! identical findings always produce identical bytes.

use serde::{Deserialize, Serialize};

use crate::finding::{AdjudicationStatus, Evidence, Finding, Severity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub file_analyzed: String,
    pub doc_type: String,
    pub classification_confidence: f64,
    pub num_paragraphs: usize,
    pub issues_found: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub section: String,
    pub issue: String,
    pub severity: Severity,
    pub suggestion: String,
    pub rule_id: String,
    pub paragraph_index: usize,
    pub adjudication: AdjudicationStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
}

impl From<&Finding> for Issue {
    fn from(finding: &Finding) -> Self {
        Self {
            section: finding.section.clone(),
            issue: finding.issue.clone(),
            severity: finding.severity,
            suggestion: finding.suggestion.clone(),
            rule_id: finding.rule_id.clone(),
            paragraph_index: finding.paragraph_index,
            adjudication: finding.adjudication,
            evidence: finding.evidence.clone(),
        }
    }
}

impl Report {
    pub fn new(
        file_analyzed: impl Into<String>,
        doc_type: impl Into<String>,
        classification_confidence: f64,
        num_paragraphs: usize,
        findings: &[Finding],
    ) -> Self {
        Self {
            file_analyzed: file_analyzed.into(),
            doc_type: doc_type.into(),
            classification_confidence,
            num_paragraphs,
            issues_found: findings.iter().map(Issue::from).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.issues_found
            .iter()
            .filter(|i| i.severity == severity)
            .count()
    }
}
