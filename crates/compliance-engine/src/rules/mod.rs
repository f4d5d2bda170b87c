//! Ordered compliance rules
//!
//! Each rule is a pure function over one paragraph and its context. The
//! engine runs every rule, in [`RULES`] order, against every stored
//! paragraph in document order.

pub mod jurisdiction;
pub mod language;
pub mod signatures;

use shared_types::{AdjudicationStatus, Document, Finding, Paragraph, Section, Severity};

/// What a rule sees when it inspects a paragraph
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub document: &'a Document,
    pub section: &'a Section,
    pub paragraph: &'a Paragraph,
    /// True for the last stored paragraph of the document
    pub is_last: bool,
}

/// A rule match before it is turned into a [`Finding`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub issue: String,
    pub suggestion: String,
    /// Overrides the default "Paragraph N" report label
    pub section_label: Option<&'static str>,
}

impl RuleHit {
    pub fn new(issue: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            issue: issue.into(),
            suggestion: suggestion.into(),
            section_label: None,
        }
    }

    pub fn labelled(mut self, label: &'static str) -> Self {
        self.section_label = Some(label);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    /// Plain-language description handed to the adjudicator
    pub description: &'static str,
    /// Query used to pull reference passages for this rule
    pub retrieval_query: &'static str,
    pub default_severity: Severity,
    pub check: fn(&RuleContext<'_>) -> Option<RuleHit>,
}

impl Rule {
    /// Run the rule and build a finding with the rule-engine defaults
    pub fn apply(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        let hit = (self.check)(ctx)?;
        let section = match hit.section_label {
            Some(label) => label.to_string(),
            None => format!("Paragraph {}", ctx.paragraph.index),
        };

        Some(Finding {
            section_id: ctx.section.id.clone(),
            section,
            paragraph_index: ctx.paragraph.index,
            rule_id: self.id.to_string(),
            severity: self.default_severity,
            issue: hit.issue,
            suggestion: hit.suggestion,
            adjudication: AdjudicationStatus::Skipped,
            evidence: Vec::new(),
        })
    }
}

pub const RULES: &[Rule] = &[
    Rule {
        id: jurisdiction::NON_ADGM_ID,
        description: "The document must not name a forum or governing law other than ADGM \
                      (for example UK, England, US, federal courts or the DIFC).",
        retrieval_query: "ADGM jurisdiction requirement",
        default_severity: Severity::High,
        check: jurisdiction::check_non_adgm,
    },
    Rule {
        id: jurisdiction::MISSING_ADGM_ID,
        description: "A governing-law or jurisdiction clause should name ADGM law and the \
                      ADGM Courts.",
        retrieval_query: "ADGM governing law and courts clause",
        default_severity: Severity::Medium,
        check: jurisdiction::check_missing_adgm,
    },
    Rule {
        id: language::AMBIGUOUS_ID,
        description: "Obligations should use binding language such as 'shall' rather than \
                      hedging terms like 'may', 'could' or 'best endeavours'.",
        retrieval_query: "binding language shall vs may",
        default_severity: Severity::Medium,
        check: language::check_ambiguous,
    },
    Rule {
        id: signatures::SINGLE_SIGNATORY_ID,
        description: "Corporate documents should not rely on a single authorised signatory.",
        retrieval_query: "signature requirement multiple signatories",
        default_severity: Severity::Medium,
        check: signatures::check_single_signatory,
    },
    Rule {
        id: signatures::MISSING_SIGNATURE_ID,
        description: "The document should end with a signature block giving name, position \
                      and date.",
        retrieval_query: "signature block example",
        default_severity: Severity::High,
        check: signatures::check_missing_signature,
    },
];
