use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown severity: {0}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// Outcome of the adjudication step for one finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjudicationStatus {
    /// Severity and suggestion come from the generative model
    Adjudicated,
    /// The provider call failed; rule-engine defaults were kept
    Unadjudicated,
    /// Adjudication was disabled for this run
    Skipped,
}

/// A reference chunk retrieved as supporting context for a finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub source_id: String,
    pub score: f32,
    pub text: String,
}

/// A single compliance issue tied to a paragraph of the source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub section_id: String,
    /// Display label used in the report, e.g. "Paragraph 12" or "Signatures"
    pub section: String,
    pub paragraph_index: usize,
    pub rule_id: String,
    pub severity: Severity,
    pub issue: String,
    pub suggestion: String,
    pub adjudication: AdjudicationStatus,
    pub evidence: Vec<Evidence>,
}

impl Finding {
    /// Apply a model judgment, replacing the rule-engine defaults
    pub fn adjudicate(&mut self, severity: Severity, suggestion: String) {
        self.severity = severity;
        self.suggestion = suggestion;
        self.adjudication = AdjudicationStatus::Adjudicated;
    }

    /// Keep rule-engine defaults and record that adjudication failed
    pub fn mark_unadjudicated(&mut self) {
        self.adjudication = AdjudicationStatus::Unadjudicated;
    }

    /// Text of the inline note written into the annotated document
    pub fn annotation_text(&self) -> String {
        format!("{}. Suggestion: {}", self.issue, self.suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding() -> Finding {
        Finding {
            section_id: "preamble".to_string(),
            section: "Paragraph 3".to_string(),
            paragraph_index: 3,
            rule_id: "language.ambiguous".to_string(),
            severity: Severity::Medium,
            issue: "Ambiguous".to_string(),
            suggestion: "Use shall".to_string(),
            adjudication: AdjudicationStatus::Skipped,
            evidence: vec![],
        }
    }

    #[test]
    fn test_severity_parsing() {
        assert_eq!("high".parse::<Severity>(), Ok(Severity::High));
        assert_eq!(" Medium ".parse::<Severity>(), Ok(Severity::Medium));
        assert_eq!("LOW".parse::<Severity>(), Ok(Severity::Low));
        assert!("critical".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_serializes_as_plain_names() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"High\"");
        assert_eq!(
            serde_json::to_string(&AdjudicationStatus::Unadjudicated).unwrap(),
            "\"unadjudicated\""
        );
    }

    #[test]
    fn test_adjudicate_overrides_defaults() {
        let mut f = finding();
        f.adjudicate(Severity::Low, "Fine as is".to_string());
        assert_eq!(f.severity, Severity::Low);
        assert_eq!(f.suggestion, "Fine as is");
        assert_eq!(f.adjudication, AdjudicationStatus::Adjudicated);
    }

    #[test]
    fn test_unadjudicated_keeps_defaults() {
        let mut f = finding();
        f.mark_unadjudicated();
        assert_eq!(f.severity, Severity::Medium);
        assert_eq!(f.suggestion, "Use shall");
        assert_eq!(f.adjudication, AdjudicationStatus::Unadjudicated);
    }
}
