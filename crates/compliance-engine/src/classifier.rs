//! Keyword classifier for ADGM corporate document types

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Display name reported when no keyword matches
pub const UNCLASSIFIED: &str = "Unclassified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocType {
    #[serde(rename = "Articles of Association")]
    ArticlesOfAssociation,
    #[serde(rename = "Memorandum of Association")]
    MemorandumOfAssociation,
    #[serde(rename = "UBO Declaration Form")]
    UboDeclaration,
    #[serde(rename = "Register of Members and Directors")]
    RegisterOfMembers,
    #[serde(rename = "Board Resolution")]
    BoardResolution,
    #[serde(rename = "Employment Contract")]
    EmploymentContract,
}

impl DocType {
    /// Declaration order; earlier types win ties
    pub const ALL: [DocType; 6] = [
        DocType::ArticlesOfAssociation,
        DocType::MemorandumOfAssociation,
        DocType::UboDeclaration,
        DocType::RegisterOfMembers,
        DocType::BoardResolution,
        DocType::EmploymentContract,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DocType::ArticlesOfAssociation => "Articles of Association",
            DocType::MemorandumOfAssociation => "Memorandum of Association",
            DocType::UboDeclaration => "UBO Declaration Form",
            DocType::RegisterOfMembers => "Register of Members and Directors",
            DocType::BoardResolution => "Board Resolution",
            DocType::EmploymentContract => "Employment Contract",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            DocType::ArticlesOfAssociation => {
                &["articles of association", "aoa", "company articles"]
            }
            DocType::MemorandumOfAssociation => &["memorandum of association", "moa", "memorandum"],
            DocType::UboDeclaration => {
                &["ultimate beneficial owner", "ubo declaration", "ubo form"]
            }
            DocType::RegisterOfMembers => &["register of members", "register of directors"],
            DocType::BoardResolution => &[
                "board resolution",
                "resolution of the board",
                "written resolution",
            ],
            DocType::EmploymentContract => &[
                "employment contract",
                "employee agreement",
                "terms of employment",
            ],
        }
    }

    fn patterns(&self) -> &'static [Regex] {
        &KEYWORD_PATTERNS[*self as usize]
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

lazy_static! {
    static ref KEYWORD_PATTERNS: Vec<Vec<Regex>> = DocType::ALL
        .iter()
        .map(|doc_type| {
            doc_type
                .keywords()
                .iter()
                .map(|kw| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw))).unwrap())
                .collect()
        })
        .collect();
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    /// `None` when nothing matched
    pub doc_type: Option<DocType>,
    pub confidence: f64,
    /// Number of distinct keywords of the winning type found in the text
    pub score: usize,
}

impl Classification {
    pub fn unclassified() -> Self {
        Self {
            doc_type: None,
            confidence: 0.0,
            score: 0,
        }
    }

    /// Name written into the report
    pub fn label(&self) -> &'static str {
        self.doc_type.map(|t| t.name()).unwrap_or(UNCLASSIFIED)
    }
}

/// Classify a document from its full text. Never fails.
pub fn classify(text: &str) -> Classification {
    let mut best = Classification::unclassified();

    for doc_type in DocType::ALL {
        let score = doc_type
            .patterns()
            .iter()
            .filter(|re| re.is_match(text))
            .count();

        // strict comparison keeps the earlier type on ties
        if score > best.score {
            let ratio = (score as f64 / doc_type.keywords().len() as f64).min(1.0);
            best = Classification {
                doc_type: Some(doc_type),
                confidence: (ratio * 100.0).round() / 100.0,
                score,
            };
        }
    }

    best
}
