//! Adapter-level shapes shared by every review source.

use chrono::NaiveDate;
use storepulse_core::ReviewContent;

/// A store as reported by a source, before normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawStore {
    /// Source-assigned identifier (place id), if any.
    pub external_id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Page to visit for reviews (browser sources only).
    pub detail_url: Option<String>,
    /// Work unit that discovered this store.
    pub search_area: String,
}

/// A review as recovered from a source; any field may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawReview {
    pub text: Option<String>,
    pub rating: Option<i64>,
    pub date: Option<NaiveDate>,
    pub reviewer_name: Option<String>,
}

/// Result of fetching one store's reviews.
///
/// `store` may carry details the review page revealed (name, address,
/// coordinates) that the discovery call did not.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreReviews {
    pub store: RawStore,
    pub reviews: Vec<ReviewContent>,
}

impl StoreReviews {
    #[must_use]
    pub fn empty(store: &RawStore) -> Self {
        Self {
            store: store.clone(),
            reviews: Vec::new(),
        }
    }
}
