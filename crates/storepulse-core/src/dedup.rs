//! Content-fingerprint deduplication of review rows.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::record::ReviewRecord;

/// Deterministic digest of a review's text and the store it belongs to.
///
/// SHA-256 over `text || NUL || store_name`, hex-encoded. The store name is
/// part of the key so identical text left at two stores is kept twice.
#[must_use]
pub fn fingerprint(review_text: &str, store_name: &str) -> String {
    let input = format!("{review_text}\x00{store_name}");
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Drop every row whose fingerprint was already seen, keeping the first
/// occurrence and the relative order of kept rows.
#[must_use]
pub fn dedup_reviews(mut records: Vec<ReviewRecord>) -> Vec<ReviewRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records.retain(|r| seen.insert(fingerprint(&r.review_text, &r.store_name)));
    records
}
