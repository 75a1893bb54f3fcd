//! Helpers that turn loosely-shaped source data into canonical fields.
//!
//! City and region derivation are best-effort enrichments: they work off free
//! text, so an empty city or a default region is a normal outcome.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RecordError;
use crate::plan::RegionRule;

/// Display name used when a source gives no reviewer name.
pub const ANONYMOUS_REVIEWER: &str = "Anonyme";

static CITY_AFTER_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{5}\s+([A-Za-z\u{00C0}-\u{017F}\s-]+)").expect("valid regex")
});

static POSTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{5})\b").expect("valid regex"));

/// Derive a city name from a postal address.
///
/// Takes the place name following the first 5-digit postal code, else the
/// second-to-last comma-separated component. Returns `None` when neither
/// yields anything.
#[must_use]
pub fn extract_city(address: &str) -> Option<String> {
    if let Some(city) = CITY_AFTER_POSTCODE
        .captures(address)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|c| !c.is_empty())
    {
        return Some(city);
    }

    let parts: Vec<&str> = address.split(',').collect();
    if parts.len() >= 2 {
        let candidate = parts[parts.len() - 2].trim();
        if !candidate.is_empty() {
            return Some(candidate.to_string());
        }
    }
    None
}

/// Infer an administrative region label from address or area text.
///
/// Rules are tried in order; a rule matches when one of its keywords occurs in
/// the lowercased text or the first postal code starts with one of its
/// prefixes.
#[must_use]
pub fn guess_region(text: &str, rules: &[RegionRule], default_region: &str) -> String {
    let lowered = text.to_lowercase();
    let postcode = POSTCODE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());

    rules
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|kw| !kw.is_empty() && lowered.contains(&kw.to_lowercase()))
                || postcode.is_some_and(|code| {
                    rule.postcode_prefixes
                        .iter()
                        .any(|p| !p.is_empty() && code.starts_with(p.as_str()))
                })
        })
        .map_or_else(|| default_region.to_string(), |rule| rule.label.clone())
}

/// Collapse runs of whitespace and trim.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validate review text against a source's minimum meaningful length.
///
/// # Errors
///
/// Returns [`RecordError::TextTooShort`] when the cleaned text has fewer than
/// `min_len` characters (or is empty).
pub fn validate_text(raw: &str, min_len: usize) -> Result<String, RecordError> {
    let text = clean_text(raw);
    if text.is_empty() || text.chars().count() < min_len {
        return Err(RecordError::TextTooShort {
            min_len: min_len.max(1),
        });
    }
    Ok(text)
}

/// Validate a star rating.
///
/// # Errors
///
/// Returns [`RecordError::RatingOutOfRange`] for anything outside `1..=5`.
pub fn validate_rating(rating: i64) -> Result<u8, RecordError> {
    match u8::try_from(rating) {
        Ok(r @ 1..=5) => Ok(r),
        _ => Err(RecordError::RatingOutOfRange(rating)),
    }
}

/// Reviewer display name, falling back to [`ANONYMOUS_REVIEWER`].
#[must_use]
pub fn reviewer_or_anonymous(name: Option<&str>) -> String {
    name.map(clean_text)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| ANONYMOUS_REVIEWER.to_string())
}
