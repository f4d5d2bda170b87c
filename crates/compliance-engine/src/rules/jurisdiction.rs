use crate::patterns::{ADGM_ALLOW_LIST, JURISDICTION_CLAUSE, NON_ADGM_JURISDICTION};
use crate::rules::{RuleContext, RuleHit};

pub const NON_ADGM_ID: &str = "jurisdiction.non_adgm";
pub const MISSING_ADGM_ID: &str = "jurisdiction.missing_adgm";

/// Flag a paragraph that names a forum or law other than ADGM
pub fn check_non_adgm(ctx: &RuleContext<'_>) -> Option<RuleHit> {
    let found = NON_ADGM_JURISDICTION.find(&ctx.paragraph.text)?;

    Some(RuleHit::new(
        format!(
            "Non-ADGM jurisdiction referenced: '{}'",
            found.as_str().to_lowercase()
        ),
        "Change jurisdiction to ADGM/ADGM Courts if incorporation is in ADGM.",
    ))
}

/// Flag a governing-law clause that names no forum at all
pub fn check_missing_adgm(ctx: &RuleContext<'_>) -> Option<RuleHit> {
    let text = &ctx.paragraph.text;

    // a named non-ADGM forum is already reported by check_non_adgm
    if !JURISDICTION_CLAUSE.is_match(text)
        || ADGM_ALLOW_LIST.is_match(text)
        || NON_ADGM_JURISDICTION.is_match(text)
    {
        return None;
    }

    Some(RuleHit::new(
        "Governing law or jurisdiction clause does not specify ADGM",
        "State that the document is governed by ADGM law and subject to the jurisdiction of the ADGM Courts.",
    ))
}
