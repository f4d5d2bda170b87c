//! Document model produced by the `.docx` reader
//!
//! A [`Document`] is immutable once read. Annotated output is written to a
//! separate file and never reflected back into this structure.

use serde::{Deserialize, Serialize};

/// Section id used for paragraphs that precede the first heading
pub const PREAMBLE_SECTION_ID: &str = "preamble";

/// A single non-empty body paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    /// Paragraph style id (e.g. "Heading1", "Normal"), if any
    pub style: Option<String>,
    /// Ordinal among all body-level paragraphs of the source, empty ones included
    pub index: usize,
}

impl Paragraph {
    pub fn new(index: usize, text: impl Into<String>, style: Option<String>) -> Self {
        Self {
            text: text.into(),
            style,
            index,
        }
    }

    /// True when the paragraph style marks a heading or title
    pub fn is_heading(&self) -> bool {
        self.style.as_deref().map(is_heading_style).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub heading: Option<String>,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub file_name: String,
    pub sections: Vec<Section>,
    /// Number of body-level paragraphs in the source, empty ones included
    pub paragraph_count: usize,
}

impl Document {
    /// Group ordered paragraphs into sections, opening a new section at every heading
    pub fn from_paragraphs(
        file_name: impl Into<String>,
        paragraphs: Vec<Paragraph>,
        paragraph_count: usize,
    ) -> Self {
        let mut sections: Vec<Section> = Vec::new();
        let mut current = Section {
            id: PREAMBLE_SECTION_ID.to_string(),
            heading: None,
            paragraphs: Vec::new(),
        };

        for paragraph in paragraphs {
            if paragraph.is_heading() {
                if !current.paragraphs.is_empty() {
                    sections.push(current);
                }
                current = Section {
                    id: format!("section-{}", sections.len() + 1),
                    heading: Some(paragraph.text.clone()),
                    paragraphs: Vec::new(),
                };
            }
            current.paragraphs.push(paragraph);
        }

        if !current.paragraphs.is_empty() {
            sections.push(current);
        }

        Self {
            file_name: file_name.into(),
            sections,
            paragraph_count,
        }
    }

    /// All stored paragraphs in document order
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.sections.iter().flat_map(|s| s.paragraphs.iter())
    }

    /// Paragraphs paired with the section that contains them
    pub fn paragraphs_with_sections(&self) -> impl Iterator<Item = (&Section, &Paragraph)> {
        self.sections
            .iter()
            .flat_map(|s| s.paragraphs.iter().map(move |p| (s, p)))
    }

    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs().find(|p| p.index == index)
    }

    pub fn last_paragraph(&self) -> Option<&Paragraph> {
        self.sections.iter().rev().find_map(|s| s.paragraphs.last())
    }

    /// The last `n` stored paragraphs, in document order
    pub fn tail(&self, n: usize) -> Vec<&Paragraph> {
        let all: Vec<&Paragraph> = self.paragraphs().collect();
        let start = all.len().saturating_sub(n);
        all[start..].to_vec()
    }

    /// Paragraph texts joined by newlines
    pub fn full_text(&self) -> String {
        self.paragraphs()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Heading detection over Word style ids ("Heading1", "heading 2", "Title")
pub fn is_heading_style(style: &str) -> bool {
    let lower = style.to_ascii_lowercase();
    lower.starts_with("heading") || lower == "title"
}
