//! Signatory and signature-block checks

use crate::patterns::{SIGNATURE_TOKENS, SINGLE_SIGNATORY};
use crate::rules::{RuleContext, RuleHit};

pub const SINGLE_SIGNATORY_ID: &str = "signatory.single";
pub const MISSING_SIGNATURE_ID: &str = "signature.missing";

/// Trailing paragraphs searched for a signature block
pub const SIGNATURE_WINDOW: usize = 3;

pub fn check_single_signatory(ctx: &RuleContext<'_>) -> Option<RuleHit> {
    if !SINGLE_SIGNATORY.is_match(&ctx.paragraph.text) {
        return None;
    }

    Some(RuleHit::new(
        "Only one authorized signatory specified",
        "Confirm checklist requirement; consider adding an additional authorized signatory.",
    ))
}

/// Runs once, on the last stored paragraph
pub fn check_missing_signature(ctx: &RuleContext<'_>) -> Option<RuleHit> {
    if !ctx.is_last {
        return None;
    }

    let signed = ctx
        .document
        .tail(SIGNATURE_WINDOW)
        .iter()
        .any(|p| SIGNATURE_TOKENS.is_match(&p.text));
    if signed {
        return None;
    }

    Some(
        RuleHit::new(
            "Possible missing signature block",
            "Add signature block with name, position and date.",
        )
        .labelled("Signatures"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::document;
    use shared_types::Document;

    fn last_ctx(doc: &Document) -> RuleContext<'_> {
        let section = doc.sections.last().unwrap();
        RuleContext {
            document: doc,
            section,
            paragraph: section.paragraphs.last().unwrap(),
            is_last: true,
        }
    }

    #[test]
    fn test_missing_signature_block() {
        let doc = document(&[
            "Board Resolution",
            "The board resolves to open a bank account.",
            "This resolution takes effect immediately.",
        ]);
        let hit = check_missing_signature(&last_ctx(&doc)).unwrap();
        assert_eq!(hit.issue, "Possible missing signature block");
        assert_eq!(hit.section_label, Some("Signatures"));
    }

    #[test]
    fn test_signature_in_window_passes() {
        let doc = document(&[
            "The board resolves to open a bank account.",
            "Name: Jane Doe",
            "Position: Director",
            "Thank you.",
        ]);
        assert!(check_missing_signature(&last_ctx(&doc)).is_none());
    }

    #[test]
    fn test_signature_outside_window_is_missed() {
        let doc = document(&[
            "Signed by the Director",
            "Clause one.",
            "Clause two.",
            "Clause three.",
        ]);
        assert!(check_missing_signature(&last_ctx(&doc)).is_some());
    }

    #[test]
    fn test_only_last_paragraph_is_checked() {
        let doc = document(&["No signature here.", "Nor here."]);
        let section = &doc.sections[0];
        let ctx = RuleContext {
            document: &doc,
            section,
            paragraph: &section.paragraphs[0],
            is_last: false,
        };
        assert!(check_missing_signature(&ctx).is_none());
    }

    #[test]
    fn test_single_signatory() {
        let doc = document(&["The Company shall have one authorised signatory."]);
        let ctx = last_ctx(&doc);
        assert!(check_single_signatory(&ctx).is_some());

        let doc = document(&["The Company shall have two authorised signatories."]);
        assert!(check_single_signatory(&last_ctx(&doc)).is_none());
    }
}
