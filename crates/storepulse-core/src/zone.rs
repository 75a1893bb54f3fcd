//! Coarse geographic zone classification.

use serde::{Deserialize, Serialize};

use crate::plan::MetroArea;
use crate::record::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Zone {
    UrbanCore,
    UrbanPeriphery,
    Provincial,
}

impl Zone {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Zone::UrbanCore => "urban-core",
            Zone::UrbanPeriphery => "urban-periphery",
            Zone::Provincial => "provincial",
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a store location into a [`Zone`].
///
/// When `region_label` names one of the configured metro areas, the location
/// is tested against that area's capital-city box: inside is
/// [`Zone::UrbanCore`], anywhere else (including an unknown location) is
/// [`Zone::UrbanPeriphery`]. Every other region is [`Zone::Provincial`].
/// The first matching metro area wins.
#[must_use]
pub fn classify_zone(location: Option<GeoPoint>, region_label: &str, metros: &[MetroArea]) -> Zone {
    let Some(metro) = metros.iter().find(|m| m.matches_region(region_label)) else {
        return Zone::Provincial;
    };

    match location {
        Some(point) if metro.bbox.contains(point) => Zone::UrbanCore,
        _ => Zone::UrbanPeriphery,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::BoundingBox;

    fn paris() -> Vec<MetroArea> {
        vec![MetroArea {
            name: "Paris".to_string(),
            region_keywords: vec!["ile-de-france".to_string()],
            bbox: BoundingBox {
                lat_min: 48.815,
                lat_max: 48.902,
                lng_min: 2.225,
                lng_max: 2.420,
            },
        }]
    }

    #[test]
    fn inside_capital_box_is_core() {
        let zone = classify_zone(GeoPoint::new(48.8566, 2.3522), "Ile-de-France", &paris());
        assert_eq!(zone, Zone::UrbanCore);
    }

    #[test]
    fn in_region_outside_box_is_periphery() {
        // Creteil
        let zone = classify_zone(GeoPoint::new(48.7835, 2.4598), "Ile-de-France", &paris());
        assert_eq!(zone, Zone::UrbanPeriphery);
    }

    #[test]
    fn box_edges_are_inclusive() {
        let zone = classify_zone(GeoPoint::new(48.815, 2.225), "ile-de-france", &paris());
        assert_eq!(zone, Zone::UrbanCore);
    }

    #[test]
    fn unknown_location_in_metro_region_is_periphery() {
        assert_eq!(
            classify_zone(None, "Ile-de-France", &paris()),
            Zone::UrbanPeriphery
        );
    }

    #[test]
    fn other_regions_are_provincial_even_inside_the_box() {
        let zone = classify_zone(GeoPoint::new(48.8566, 2.3522), "Bretagne", &paris());
        assert_eq!(zone, Zone::Provincial);
    }

    #[test]
    fn no_metros_configured_means_everything_is_provincial() {
        assert_eq!(
            classify_zone(GeoPoint::new(48.8566, 2.3522), "Ile-de-France", &[]),
            Zone::Provincial
        );
    }

    #[test]
    fn classification_is_total_over_a_coordinate_sweep() {
        let metros = paris();
        let mut lat = -90.0;
        while lat <= 90.0 {
            let mut lng = -180.0;
            while lng <= 180.0 {
                for region in ["Ile-de-France", "Occitanie", ""] {
                    let zone = classify_zone(GeoPoint::new(lat, lng), region, &metros);
                    assert!(!zone.as_str().is_empty());
                }
                lng += 7.5;
            }
            lat += 7.5;
        }
    }

    #[test]
    fn serializes_as_kebab_label() {
        let json = serde_json::to_string(&Zone::UrbanPeriphery).unwrap();
        assert_eq!(json, "\"urban-periphery\"");
    }
}
