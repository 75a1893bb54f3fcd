//! Canonical store and review shapes.
//!
//! [`ReviewRecord`] is the flat row persisted to the output file. Every row
//! carries a full copy of its store's attributes as they were at collection
//! time, so downstream consumers never need a lookup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// A validated coordinate pair.
///
/// `(0, 0)` is reserved as the "unknown location" sentinel in the flat output
/// and is therefore never a valid `GeoPoint`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Returns `None` unless both components are finite, in range, and not
    /// the `(0, 0)` sentinel.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let in_range = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        #[allow(clippy::float_cmp)]
        let is_sentinel = lat == 0.0 && lng == 0.0;
        (in_range && !is_sentinel).then_some(Self { lat, lng })
    }
}

/// A physical store with its derived geography.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: Option<GeoPoint>,
    /// Best-effort; empty when no city could be derived.
    pub city: String,
    pub region: String,
    pub zone: Zone,
}

/// Review content after validation, before it is bound to a store and id.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewContent {
    pub text: String,
    pub rating: u8,
    pub date: Option<NaiveDate>,
    pub reviewer_name: String,
}

/// One row of the canonical output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub review_id: String,
    pub review_text: String,
    pub rating: u8,
    /// `YYYY-MM-DD`, or empty when the source gave no usable date.
    pub date: String,
    pub reviewer_name: String,
    #[serde(default)]
    pub store_id: String,
    pub store_name: String,
    pub address: String,
    pub city: String,
    pub zone: Zone,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub source: String,
    /// Work unit that produced this row; the resume signal.
    #[serde(default)]
    pub search_area: String,
}

impl ReviewRecord {
    /// Bind validated review content to its store, denormalizing the store's
    /// attributes onto the row.
    #[must_use]
    pub fn new(
        review_id: String,
        content: ReviewContent,
        store: &Store,
        source: &str,
        search_area: &str,
    ) -> Self {
        let (latitude, longitude) = store.location.map_or((0.0, 0.0), |p| (p.lat, p.lng));
        Self {
            review_id,
            review_text: content.text,
            rating: content.rating,
            date: content
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            reviewer_name: content.reviewer_name,
            store_id: store.id.clone(),
            store_name: store.name.clone(),
            address: store.address.clone(),
            city: store.city.clone(),
            zone: store.zone,
            region: store.region.clone(),
            latitude,
            longitude,
            source: source.to_string(),
            search_area: search_area.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store {
            id: "S00".to_string(),
            name: "Intersport Rivoli".to_string(),
            address: "30 Rue de Rivoli, 75004 Paris".to_string(),
            location: GeoPoint::new(48.8566, 2.3522),
            city: "Paris".to_string(),
            region: "Ile-de-France".to_string(),
            zone: Zone::UrbanCore,
        }
    }

    #[test]
    fn geopoint_rejects_out_of_range_and_sentinel() {
        assert!(GeoPoint::new(48.0, 2.0).is_some());
        assert!(GeoPoint::new(91.0, 2.0).is_none());
        assert!(GeoPoint::new(48.0, -180.5).is_none());
        assert!(GeoPoint::new(0.0, 0.0).is_none());
        assert!(GeoPoint::new(f64::NAN, 2.0).is_none());
    }

    #[test]
    fn record_denormalizes_store_attributes() {
        let content = ReviewContent {
            text: "Tres bon accueil.".to_string(),
            rating: 5,
            date: NaiveDate::from_ymd_opt(2024, 3, 14),
            reviewer_name: "Marie Martin".to_string(),
        };
        let rec = ReviewRecord::new("REV-00001".into(), content, &store(), "simulated", "Paris");
        assert_eq!(rec.store_id, "S00");
        assert_eq!(rec.store_name, "Intersport Rivoli");
        assert_eq!(rec.zone, Zone::UrbanCore);
        assert_eq!(rec.date, "2024-03-14");
        assert_eq!(rec.search_area, "Paris");
        assert_eq!((rec.latitude, rec.longitude), (48.8566, 2.3522));
    }

    #[test]
    fn unknown_location_is_written_as_sentinel() {
        let mut s = store();
        s.location = None;
        let content = ReviewContent {
            text: "Magasin propre.".to_string(),
            rating: 4,
            date: None,
            reviewer_name: "Anonyme".to_string(),
        };
        let rec = ReviewRecord::new("REV-00002".into(), content, &s, "outscraper", "Paris");
        assert_eq!((rec.latitude, rec.longitude), (0.0, 0.0));
        assert!(rec.date.is_empty());
    }
}
