pub mod classifier;
pub mod patterns;
pub mod rules;

pub use classifier::{classify, Classification, DocType, UNCLASSIFIED};
pub use rules::{Rule, RuleContext, RuleHit, RULES};

use shared_types::{Document, Finding, Paragraph};

/// ComplianceEngine entry point
pub struct ComplianceEngine {
    rules: &'static [Rule],
}

impl ComplianceEngine {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    pub fn rules(&self) -> &[Rule] {
        self.rules
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn classify(&self, document: &Document) -> Classification {
        classify(&document.full_text())
    }

    /// Run every rule over every stored paragraph, in document then rule order
    pub fn check_document(&self, document: &Document) -> Vec<Finding> {
        let last_index = document.last_paragraph().map(|p| p.index);
        let mut findings = Vec::new();

        for (section, paragraph) in document.paragraphs_with_sections() {
            let ctx = RuleContext {
                document,
                section,
                paragraph,
                is_last: Some(paragraph.index) == last_index,
            };
            findings.extend(self.rules.iter().filter_map(|rule| rule.apply(&ctx)));
        }

        findings
    }

    /// Check raw text, one paragraph per non-empty line (for testing)
    pub fn check_text(&self, text: &str) -> Vec<Finding> {
        let paragraphs: Vec<Paragraph> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| Paragraph::new(i, line.trim(), None))
            .collect();
        let document = Document::from_paragraphs("text", paragraphs, text.lines().count());
        self.check_document(&document)
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new()
    }
}
