//! Institution detection from document text.

use crate::models::statement::DocumentProfile;

/// Name fragments mapped to institution codes. Adding support for a new
/// institution is one row here plus a parser registration; no logic changes.
const INSTITUTION_FRAGMENTS: &[(&str, &str)] = &[
    ("banco de corrientes", "bcorrientes"),
    ("banco de la pcia de corrientes", "bcorrientes"),
];

/// Resolve the issuing institution from the profile's text sample.
///
/// Pure lookup: lower-cases the sample and returns the code of the first
/// matching fragment, or `None` when nothing matches.
pub fn detect_institution(profile: &DocumentProfile) -> Option<&'static str> {
    let text = profile.sample_text.to_lowercase();

    INSTITUTION_FRAGMENTS
        .iter()
        .find(|(fragment, _)| text.contains(fragment))
        .map(|(_, code)| *code)
}
