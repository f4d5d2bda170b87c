//! Regex patterns and detection helpers for ADGM compliance checks

use lazy_static::lazy_static;
use regex::{Match, Regex};

lazy_static! {
    /// Forums other than ADGM that corporate documents commonly name
    pub static ref NON_ADGM_JURISDICTION: Regex = Regex::new(
        r"(?i)\b(dubai international financial centre|difc|united kingdom|uk|england(?: and wales)?|united states|usa|federal court)\b"
    )
    .unwrap();

    /// Accepted phrasings for an ADGM forum or governing law
    pub static ref ADGM_ALLOW_LIST: Regex =
        Regex::new(r"(?i)\b(abu dhabi global market|adgm)\b").unwrap();

    /// Language that marks a governing-law or forum clause
    pub static ref JURISDICTION_CLAUSE: Regex = Regex::new(
        r"(?i)\b(governing law|governed by|construed in accordance with|submits? to the (?:exclusive |non-exclusive )?jurisdiction|courts? of)\b"
    )
    .unwrap();

    /// Hedging terms that weaken obligations
    pub static ref AMBIGUOUS_LANGUAGE: Regex = Regex::new(
        r"(?i)\b(best endeavou?rs|best efforts|reasonable endeavou?rs|endeavou?r to|may|could)\b"
    )
    .unwrap();

    /// "one authorised signatory" and close variants
    pub static ref SINGLE_SIGNATORY: Regex = Regex::new(
        r"(?i)\b(one|1|a single|sole)\s+(?:\w+\s+){0,3}?(authori[sz]ed\s+signator(?:y|ies)|signator(?:y|ies))\b"
    )
    .unwrap();

    /// Tokens found in a signature block: signature lines, name, title, date
    pub static ref SIGNATURE_TOKENS: Regex = Regex::new(
        r"(?i)(\bsigned\b|\bsignature\b|\bsig\s*[:.]|\bname\s*:|\btitle\s*:|\bposition\s*:|\bdesignation\s*:|\bdate\s*:|\bdated\b|for and on behalf of|_{4,})"
    )
    .unwrap();

    static ref NUMERIC_TOKEN: Regex = Regex::new(r"^\d{1,4}(st|nd|rd|th)?,?$").unwrap();
}

/// First hedging term in `text`, ignoring "May" used as a month
pub fn find_ambiguous_term(text: &str) -> Option<Match<'_>> {
    AMBIGUOUS_LANGUAGE
        .find_iter(text)
        .find(|m| !(m.as_str().eq_ignore_ascii_case("may") && is_month_reference(text, m)))
}

/// "5 May 2024", "May 5, 2024": a numeric token directly before or after
fn is_month_reference(text: &str, m: &Match<'_>) -> bool {
    let before = text[..m.start()].split_whitespace().next_back();
    let after = text[m.end()..].split_whitespace().next();

    [before, after]
        .into_iter()
        .flatten()
        .any(|token| NUMERIC_TOKEN.is_match(token))
}
