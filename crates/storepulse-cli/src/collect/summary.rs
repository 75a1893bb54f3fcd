//! End-of-run summary printed for the operator.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use storepulse_core::{ReviewRecord, Zone};

#[derive(Debug, Default, PartialEq)]
pub(crate) struct RunSummary {
    pub reviews: usize,
    pub stores: usize,
    /// City to the distinct store names seen there.
    pub cities: BTreeMap<String, BTreeSet<String>>,
    pub zones: BTreeMap<Zone, usize>,
}

impl RunSummary {
    pub(crate) fn from_records(records: &[ReviewRecord]) -> Self {
        let mut stores = BTreeSet::new();
        let mut cities: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut zones = BTreeMap::new();

        for r in records {
            let store_key = if r.store_id.is_empty() {
                &r.store_name
            } else {
                &r.store_id
            };
            stores.insert(store_key.clone());
            cities
                .entry(r.city.clone())
                .or_default()
                .insert(r.store_name.clone());
            *zones.entry(r.zone).or_insert(0) += 1;
        }

        Self {
            reviews: records.len(),
            stores: stores.len(),
            cities,
            zones,
        }
    }

    /// Cities hosting more than one distinct store.
    pub(crate) fn multi_store_cities(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.cities.iter().filter(|(_, stores)| stores.len() > 1)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} reviews, {} stores, {} cities",
            self.reviews,
            self.stores,
            self.cities.len()
        )?;
        for (city, stores) in self.multi_store_cities() {
            let names: Vec<&str> = stores.iter().map(String::as_str).collect();
            writeln!(f, "  {city}: {} stores ({})", stores.len(), names.join(", "))?;
        }
        for (zone, count) in &self.zones {
            writeln!(f, "  {zone}: {count} reviews")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(store_id: &str, store: &str, city: &str, zone: Zone) -> ReviewRecord {
        ReviewRecord {
            review_id: "REV-00001".into(),
            review_text: "Tres bon accueil".into(),
            rating: 5,
            date: String::new(),
            reviewer_name: "Anonyme".into(),
            store_id: store_id.into(),
            store_name: store.into(),
            address: String::new(),
            city: city.into(),
            zone,
            region: "France".into(),
            latitude: 0.0,
            longitude: 0.0,
            source: "simulated".into(),
            search_area: city.into(),
        }
    }

    #[test]
    fn counts_stores_cities_and_zones() {
        let rows = vec![
            row("S00", "Intersport Rivoli", "Paris", Zone::UrbanCore),
            row("S00", "Intersport Rivoli", "Paris", Zone::UrbanCore),
            row("S01", "Intersport Italie 2", "Paris", Zone::UrbanCore),
            row("S10", "Intersport Part-Dieu", "Lyon", Zone::Provincial),
        ];
        let summary = RunSummary::from_records(&rows);

        assert_eq!(summary.reviews, 4);
        assert_eq!(summary.stores, 3);
        assert_eq!(summary.cities.len(), 2);
        assert_eq!(summary.zones[&Zone::UrbanCore], 3);
        assert_eq!(summary.zones[&Zone::Provincial], 1);

        let multi: Vec<&String> = summary.multi_store_cities().map(|(c, _)| c).collect();
        assert_eq!(multi, vec!["Paris"]);
    }

    #[test]
    fn display_lists_multi_store_cities_and_zones() {
        let rows = vec![
            row("S00", "Intersport Rivoli", "Paris", Zone::UrbanCore),
            row("S01", "Intersport Italie 2", "Paris", Zone::UrbanCore),
        ];
        let text = RunSummary::from_records(&rows).to_string();
        assert!(text.starts_with("2 reviews, 2 stores, 1 cities"));
        assert!(text.contains("Paris: 2 stores (Intersport Italie 2, Intersport Rivoli)"));
        assert!(text.contains("urban-core: 2 reviews"));
    }

    #[test]
    fn empty_run_summarizes_to_zeroes() {
        assert_eq!(RunSummary::from_records(&[]), RunSummary::default());
    }
}
