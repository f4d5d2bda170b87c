use serde::Deserialize;
use shared_types::Severity;

use crate::error::AdjudicationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgment {
    pub severity: Severity,
    pub suggestion: String,
}

#[derive(Deserialize)]
struct RawJudgment {
    severity: String,
    suggestion: String,
}

/// Extract the judgment object from a model reply
///
/// The reply may wrap the object in prose or code fences, and may carry more
/// text (braces included) after it.
pub fn parse_judgment(text: &str) -> Result<Judgment, AdjudicationError> {
    let raw = match serde_json::from_str::<RawJudgment>(text.trim()) {
        Ok(raw) => raw,
        Err(_) => first_embedded(text)?,
    };

    let severity = raw
        .severity
        .parse::<Severity>()
        .map_err(|e| AdjudicationError::Malformed(e.to_string()))?;
    let suggestion = raw.suggestion.trim();
    if suggestion.is_empty() {
        return Err(AdjudicationError::Malformed("empty suggestion".to_string()));
    }

    Ok(Judgment {
        severity,
        suggestion: suggestion.to_string(),
    })
}

/// First `{` from which a judgment object deserializes
fn first_embedded(text: &str) -> Result<RawJudgment, AdjudicationError> {
    let mut last_error = None;
    for (start, _) in text.match_indices('{') {
        let next: Option<serde_json::Result<RawJudgment>> =
            serde_json::Deserializer::from_str(&text[start..]).into_iter().next();
        match next {
            Some(Ok(raw)) => return Ok(raw),
            Some(Err(e)) => last_error = Some(e.to_string()),
            None => {}
        }
    }
    Err(AdjudicationError::Malformed(
        last_error.unwrap_or_else(|| "no JSON object in reply".to_string()),
    ))
}
