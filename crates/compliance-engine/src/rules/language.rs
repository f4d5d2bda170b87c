use crate::patterns::find_ambiguous_term;
use crate::rules::{RuleContext, RuleHit};

pub const AMBIGUOUS_ID: &str = "language.ambiguous";

pub fn check_ambiguous(ctx: &RuleContext<'_>) -> Option<RuleHit> {
    let term = find_ambiguous_term(&ctx.paragraph.text)?;

    Some(RuleHit::new(
        format!(
            "Potentially ambiguous/non-binding language: '{}'",
            term.as_str().to_lowercase()
        ),
        "Consider using stronger binding language (e.g., 'shall') for obligations.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::document;

    fn check(text: &str) -> Option<RuleHit> {
        let doc = document(&[text]);
        let section = &doc.sections[0];
        check_ambiguous(&RuleContext {
            document: &doc,
            section,
            paragraph: &section.paragraphs[0],
            is_last: false,
        })
    }

    #[test]
    fn test_hedging_terms() {
        assert_eq!(
            check("The Directors may call a meeting.").unwrap().issue,
            "Potentially ambiguous/non-binding language: 'may'"
        );
        assert!(check("The Seller will use Best Efforts to deliver.").is_some());
        assert!(check("The Company shall endeavour to comply.").is_some());
    }

    #[test]
    fn test_binding_language_passes() {
        assert!(check("The Directors shall call a meeting.").is_none());
        assert!(check("Dated 12 May 2024").is_none());
    }
}
