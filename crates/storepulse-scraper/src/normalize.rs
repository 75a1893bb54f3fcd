//! Bridges adapter output onto the canonical model.

use storepulse_core::normalize::{
    clean_text, extract_city, guess_region, reviewer_or_anonymous, validate_rating,
    validate_text,
};
use storepulse_core::{classify_zone, CollectPlan, GeoPoint, ReviewContent, Store};

use crate::types::{RawReview, RawStore};

/// Build a canonical [`Store`] from a raw source store.
///
/// Coordinates are kept only as a valid pair; a partial or out-of-range pair
/// becomes "unknown location". City falls back to the search area when the
/// source gave no address at all. Region is inferred from the address, then
/// from the search area.
#[must_use]
pub fn normalize_store(raw: &RawStore, store_id: String, plan: &CollectPlan) -> Store {
    let address = raw.address.as_deref().map(clean_text).unwrap_or_default();
    let location = match (raw.latitude, raw.longitude) {
        (Some(lat), Some(lng)) => GeoPoint::new(lat, lng),
        _ => None,
    };

    let city = if address.is_empty() {
        raw.search_area.clone()
    } else {
        extract_city(&address).unwrap_or_default()
    };

    let region_text = format!("{address} {}", raw.search_area);
    let region = guess_region(&region_text, &plan.regions, &plan.default_region);
    let zone = classify_zone(location, &region, &plan.metro_areas);

    Store {
        id: store_id,
        name: clean_text(&raw.name),
        address,
        location,
        city,
        region,
        zone,
    }
}

/// Validate a raw review. Returns `None` when text or rating is unusable.
#[must_use]
pub fn normalize_review(raw: &RawReview, min_text_len: usize) -> Option<ReviewContent> {
    let text = validate_text(raw.text.as_deref()?, min_text_len).ok()?;
    let rating = validate_rating(raw.rating?).ok()?;
    Some(ReviewContent {
        text,
        rating,
        date: raw.date,
        reviewer_name: reviewer_or_anonymous(raw.reviewer_name.as_deref()),
    })
}

/// Normalize a batch of raw reviews, dropping rejects and capping at `max`.
#[must_use]
pub fn normalize_reviews(raw: &[RawReview], min_text_len: usize, max: usize) -> Vec<ReviewContent> {
    raw.iter()
        .filter_map(|r| normalize_review(r, min_text_len))
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storepulse_core::Zone;

    fn plan() -> CollectPlan {
        CollectPlan::from_yaml_str(
            r#"
brand_token: intersport
search_query: Intersport
country: France
work_units:
  - name: Paris
  - name: Lyon
default_region: France
regions:
  - label: Ile-de-France
    keywords: [paris]
    postcode_prefixes: ["75", "94"]
  - label: Auvergne-Rhone-Alpes
    keywords: [lyon]
    postcode_prefixes: ["69"]
metro_areas:
  - name: Paris
    region_keywords: [ile-de-france]
    bbox: { lat_min: 48.815, lat_max: 48.902, lng_min: 2.225, lng_max: 2.420 }
"#,
        )
        .unwrap()
    }

    fn raw(address: Option<&str>, lat: Option<f64>, lng: Option<f64>, area: &str) -> RawStore {
        RawStore {
            external_id: None,
            name: "  Intersport   Rivoli ".to_string(),
            address: address.map(str::to_string),
            latitude: lat,
            longitude: lng,
            detail_url: None,
            search_area: area.to_string(),
        }
    }

    #[test]
    fn store_inside_capital_box_is_urban_core() {
        let s = normalize_store(
            &raw(Some("30 Rue de Rivoli, 75004 Paris"), Some(48.8566), Some(2.3522), "Paris"),
            "S00".into(),
            &plan(),
        );
        assert_eq!(s.name, "Intersport Rivoli");
        assert_eq!(s.city, "Paris");
        assert_eq!(s.region, "Ile-de-France");
        assert_eq!(s.zone, Zone::UrbanCore);
    }

    #[test]
    fn postcode_region_outside_box_is_periphery() {
        let s = normalize_store(
            &raw(Some("CC Creteil Soleil, 94000 Creteil"), Some(48.779), Some(2.459), "Creteil"),
            "S01".into(),
            &plan(),
        );
        assert_eq!(s.region, "Ile-de-France");
        assert_eq!(s.zone, Zone::UrbanPeriphery);
    }

    #[test]
    fn partial_coordinates_become_unknown_location() {
        let s = normalize_store(
            &raw(Some("CC Part-Dieu, 69003 Lyon"), Some(45.76), None, "Lyon"),
            "S02".into(),
            &plan(),
        );
        assert!(s.location.is_none());
        assert_eq!(s.zone, Zone::Provincial);
    }

    #[test]
    fn missing_address_uses_search_area_for_city_and_region() {
        let s = normalize_store(&raw(None, None, None, "Lyon"), "S03".into(), &plan());
        assert_eq!(s.city, "Lyon");
        assert_eq!(s.region, "Auvergne-Rhone-Alpes");
        assert!(s.address.is_empty());
    }

    #[test]
    fn review_requires_text_and_positive_rating() {
        let good = RawReview {
            text: Some("Super magasin, bon accueil".into()),
            rating: Some(5),
            date: None,
            reviewer_name: None,
        };
        let content = normalize_review(&good, 10).unwrap();
        assert_eq!(content.reviewer_name, "Anonyme");
        assert_eq!(content.rating, 5);

        let no_rating = RawReview { rating: None, ..good.clone() };
        let zero_rating = RawReview { rating: Some(0), ..good.clone() };
        let short = RawReview { text: Some("ok".into()), ..good.clone() };
        assert!(normalize_review(&no_rating, 10).is_none());
        assert!(normalize_review(&zero_rating, 10).is_none());
        assert!(normalize_review(&short, 10).is_none());
    }

    #[test]
    fn batch_normalization_caps_after_filtering() {
        let reviews: Vec<RawReview> = (0..6)
            .map(|i| RawReview {
                text: Some(if i % 2 == 0 { "Tres bon magasin".into() } else { "x".into() }),
                rating: Some(4),
                date: None,
                reviewer_name: Some(format!("R{i}")),
            })
            .collect();
        let kept = normalize_reviews(&reviews, 5, 2);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].reviewer_name, "R0");
        assert_eq!(kept[1].reviewer_name, "R2");
    }
}
