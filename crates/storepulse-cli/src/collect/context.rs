//! Per-run identifier state.
//!
//! Review ids and fallback store ids are assigned here, at append time, so
//! they stay unique across work units and across resumed runs. Duplicate
//! reviews are turned away before they take an id, so a resumed run numbers
//! exactly like an uninterrupted one.

use std::collections::{HashMap, HashSet};

use storepulse_core::{fingerprint, ReviewRecord};
use storepulse_scraper::RawStore;

const REVIEW_PREFIX: &str = "REV-";
const STORE_PREFIX: &str = "S";

fn sequence_number(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
}

#[derive(Debug)]
pub(crate) struct RunContext {
    next_review: u64,
    next_store: u64,
    /// Lowercased store name to assigned id, for stores without a source id.
    store_ids: HashMap<String, String>,
    /// Fingerprints of every review already in the batch.
    seen: HashSet<String>,
}

impl RunContext {
    /// Continue numbering after whatever `existing` already used.
    pub(crate) fn resume_from(existing: &[ReviewRecord]) -> Self {
        let next_review = existing
            .iter()
            .filter_map(|r| sequence_number(&r.review_id, REVIEW_PREFIX))
            .max()
            .map_or(1, |n| n + 1);

        let mut store_ids = HashMap::new();
        let mut max_store = None;
        let mut seen = HashSet::with_capacity(existing.len());
        for r in existing {
            seen.insert(fingerprint(&r.review_text, &r.store_name));
            if let Some(n) = sequence_number(&r.store_id, STORE_PREFIX) {
                max_store = max_store.max(Some(n));
                store_ids
                    .entry(r.store_name.to_lowercase())
                    .or_insert_with(|| r.store_id.clone());
            }
        }

        Self {
            next_review,
            next_store: max_store.map_or(0, |n| n + 1),
            store_ids,
            seen,
        }
    }

    /// True the first time a review with this text is offered for this
    /// store, false for every repeat.
    pub(crate) fn admit(&mut self, review_text: &str, store_name: &str) -> bool {
        self.seen.insert(fingerprint(review_text, store_name))
    }

    pub(crate) fn next_review_id(&mut self) -> String {
        let id = format!("{REVIEW_PREFIX}{:05}", self.next_review);
        self.next_review += 1;
        id
    }

    /// The source's own id when it has one, else a sequential id that is
    /// reused for the same store name.
    pub(crate) fn store_id(&mut self, store: &RawStore) -> String {
        if let Some(id) = store.external_id.as_deref().filter(|id| !id.is_empty()) {
            return id.to_string();
        }
        let key = store.name.trim().to_lowercase();
        if let Some(id) = self.store_ids.get(&key) {
            return id.clone();
        }
        let id = format!("{STORE_PREFIX}{:02}", self.next_store);
        self.next_store += 1;
        self.store_ids.insert(key, id.clone());
        id
    }
}
