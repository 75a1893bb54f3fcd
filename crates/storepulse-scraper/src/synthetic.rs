//! Seeded review generator for runs with no live source configured.
//!
//! Stores come from a fixed roster; each store's reviews are drawn from its
//! own RNG derived from the run seed and the store's roster position, so the
//! output for a store does not depend on which other stores were generated
//! before it. That keeps interrupted and resumed runs identical to a single
//! pass.

use chrono::{NaiveDate, TimeDelta};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use storepulse_core::WorkUnit;

use crate::normalize::normalize_reviews;
use crate::types::{RawReview, RawStore, StoreReviews};

pub const MIN_TEXT_LEN: usize = 10;

/// Reviews per store are drawn around this mean.
const MEAN_REVIEWS: usize = 25;
const REVIEW_SPREAD: usize = 8;
const MIN_REVIEWS: usize = 15;
/// Dates fall within this many days after [`FIRST_DAY`].
const DATE_SPAN_DAYS: i64 = 760;
const FIRST_DAY: (i32, u32, u32) = (2023, 1, 1);

struct FixtureStore {
    name: &'static str,
    address: &'static str,
    area: &'static str,
    lat: f64,
    lng: f64,
    /// Shifts the draw towards positive (> 0) or negative reviews.
    bias: f64,
}

const fn store(
    name: &'static str,
    address: &'static str,
    area: &'static str,
    lat: f64,
    lng: f64,
    bias: f64,
) -> FixtureStore {
    FixtureStore {
        name,
        address,
        area,
        lat,
        lng,
        bias,
    }
}

const ROSTER: &[FixtureStore] = &[
    store("Intersport Rivoli", "30 Rue de Rivoli, 75004 Paris", "Paris", 48.8566, 2.3522, -0.3),
    store("Intersport Republique", "5 Place de la Republique, 75003 Paris", "Paris", 48.8676, 2.3636, 0.1),
    store("Intersport Montparnasse", "CC Montparnasse, 75015 Paris", "Paris", 48.8422, 2.3219, -0.1),
    store("Intersport Italie 2", "CC Italie 2, 75013 Paris", "Paris", 48.8283, 2.3558, 0.0),
    store("Intersport Creteil Soleil", "CC Creteil Soleil, 94000 Creteil", "Creteil", 48.7835, 2.4598, 0.2),
    store("Intersport Velizy 2", "CC Velizy 2, 78140 Velizy", "Velizy", 48.7847, 2.1900, 0.3),
    store("Intersport Rosny 2", "CC Rosny 2, 93110 Rosny-sous-Bois", "Paris", 48.8728, 2.4837, -0.2),
    store("Intersport Parly 2", "CC Parly 2, 78150 Le Chesnay", "Velizy", 48.8219, 2.1278, 0.1),
    store("Intersport Grand Place", "CC Grand Place, 38100 Grenoble", "Grenoble", 45.1608, 5.7350, 0.4),
    store("Intersport Caserne de Bonne", "Caserne de Bonne, 38000 Grenoble", "Grenoble", 45.1856, 5.7264, 0.3),
    store("Intersport Part-Dieu", "CC Part-Dieu, 69003 Lyon", "Lyon", 45.7604, 4.8590, 0.1),
    store("Intersport Confluence", "CC Confluence, 69002 Lyon", "Lyon", 45.7420, 4.8184, 0.2),
    store("Intersport Annecy Courier", "CC Courier, 74000 Annecy", "Annecy", 45.9009, 6.1198, 0.5),
    store("Intersport Chamnord", "CC Chamnord, 73000 Chambery", "Annecy", 45.5751, 5.9189, 0.3),
    store("Intersport Labege", "CC Labege 2, 31670 Labege", "Toulouse", 43.5356, 1.5069, 0.0),
    store("Intersport Blagnac", "CC Blagnac, 31700 Blagnac", "Toulouse", 43.6377, 1.3756, 0.0),
    store("Intersport Odysseum", "CC Odysseum, 34000 Montpellier", "Montpellier", 43.6045, 3.9193, 0.0),
    store("Intersport Lac", "CC Bordeaux Lac, 33300 Bordeaux", "Bordeaux", 44.8752, -0.5673, 0.0),
    store("Intersport Meriadeck", "CC Meriadeck, 33000 Bordeaux", "Bordeaux", 44.8378, -0.5792, 0.0),
    store("Intersport Euralille", "CC Euralille, 59000 Lille", "Lille", 50.6365, 3.0701, 0.0),
    store("Intersport Englos", "CC Englos, 59320 Englos", "Lille", 50.6431, 2.9812, -0.2),
    store("Intersport Valentine", "CC La Valentine, 13011 Marseille", "Marseille", 43.2926, 5.4841, -0.4),
    store("Intersport Grand Littoral", "CC Grand Littoral, 13016 Marseille", "Marseille", 43.3619, 5.3520, -0.3),
    store("Intersport Nice TNL", "CC TNL, 06200 Nice", "Nice", 43.7046, 7.2630, -0.1),
    store("Intersport Rivetoile", "CC Rivetoile, 67100 Strasbourg", "Strasbourg", 48.5692, 7.7716, 0.0),
    store("Intersport Alma", "CC Alma, 35000 Rennes", "Rennes", 48.1147, -1.6794, 0.4),
    store("Intersport Atlantis", "CC Atlantis, 44800 Saint-Herblain", "Nantes", 47.2263, -1.6215, 0.2),
];

type Pool = (&'static str, &'static [&'static str]);

const POSITIVE: &[Pool] = &[
    ("accueil", &[
        "Tres bon accueil. Le personnel est souriant et disponible.",
        "Accueil chaleureux, le vendeur m'a aide des mon arrivee.",
        "On se sent bienvenu des la porte. Equipe sympathique.",
    ]),
    ("conseil", &[
        "Le vendeur m'a tres bien conseille sur le modele adapte a ma foulee.",
        "Excellents conseils pour mes chaussures de randonnee. Vrai pro.",
        "Super conseil personnalise pour mon velo. Technicien patient.",
        "Vendeur passionne de trail, test de foulee offert.",
    ]),
    ("reparation", &[
        "Reparation rapide et soignee. Le technicien a verifie chaque detail.",
        "Mon ski repare et teste avant de me le rendre. Impeccable.",
        "Excellent service atelier. Teste apres reparation, tout marche.",
    ]),
    ("prix", &[
        "Bon rapport qualite-prix. Promotions interessantes.",
        "Prix corrects. La carte fidelite offre de vrais avantages.",
    ]),
    ("choix", &[
        "Grand choix de running. Toutes les marques.",
        "Rayon ski complet pour tous niveaux.",
        "Beau magasin bien agence, large choix.",
    ]),
    ("magasin", &[
        "Magasin propre et bien organise.",
        "Bel espace lumineux, parking facile.",
    ]),
    ("fidelite", &[
        "Carte fidelite avantageuse. 20% de reduction. Merci Sophie Martin !",
        "Programme fidelite top. Points cumules vite.",
    ]),
    ("ski", &[
        "Location ski parfaite. Materiel recent.",
        "Rayon ski au top. Bon conseil sur les batons.",
    ]),
    ("velo", &[
        "Nakamura e-Summit achete, ravi. Montage soigne.",
        "Tres bon conseil VTT. Technicien passionne.",
    ]),
];

const NEGATIVE: &[Pool] = &[
    ("reparation", &[
        "Reparation baclee. Mon velo faisait encore du bruit. Pas teste.",
        "Produit rendu sans test. Ne fonctionnait toujours pas.",
        "3 semaines d'attente pour une reparation mal faite.",
        "Le technicien n'a pas teste le produit apres reparation.",
    ]),
    ("attente", &[
        "Attente trop longue en caisse. 2 caisses ouvertes un samedi.",
        "25 minutes d'attente. Magasin en sous-effectif.",
        "File d'attente interminable le week-end.",
    ]),
    ("prix", &[
        "Prix plus eleves qu'en ligne pour le meme produit.",
        "Trop cher par rapport a Decathlon.",
    ]),
    ("choix", &[
        "Peu de choix en grandes tailles. Reparti les mains vides.",
        "Rupture de stock sur le modele voulu.",
    ]),
    ("magasin", &[
        "Magasin en desordre. Tailles melangees.",
        "Parking trop petit.",
    ]),
    ("online", &[
        "Commande en ligne annulee sans explication.",
        "Click and collect: produit pas pret a l'heure.",
        "Site lent et peu intuitif.",
    ]),
    ("sav", &[
        "SAV desastreux. Aucun suivi depuis 2 semaines. Appelez-moi au 06 12 34 56 78.",
        "Retour complique. Procedure dissuasive.",
        "SAV injoignable par telephone.",
    ]),
    ("personnel", &[
        "Vendeur desagreable et condescendant.",
        "Personnel peu aimable. Pas un sourire.",
    ]),
];

const FIRST_NAMES: &[&str] = &[
    "Marie", "Thomas", "Sophie", "Pierre", "Julie", "Nicolas", "Camille", "Francois", "Emilie",
    "Antoine", "Claire", "Julien", "Isabelle", "Maxime", "Nathalie", "Alexandre", "Celine",
    "Vincent", "Sandrine",
];

const LAST_NAMES: &[&str] = &[
    "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand", "Leroy",
    "Moreau", "Simon",
];

const POSITIVE_RATINGS: &[i64] = &[4, 4, 5, 5, 5];
const NEGATIVE_RATINGS: &[i64] = &[1, 1, 2, 2, 3];
const MIXED_RATINGS: &[i64] = &[2, 3, 3, 4];

fn external_id(index: usize) -> String {
    format!("S{index:02}")
}

#[derive(Debug, Clone)]
pub struct SyntheticSource {
    seed: u64,
}

impl SyntheticSource {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Roster stores assigned to `unit` (matched case-insensitively).
    #[must_use]
    pub fn find_stores(&self, unit: &WorkUnit) -> Vec<RawStore> {
        ROSTER
            .iter()
            .enumerate()
            .filter(|(_, s)| s.area.eq_ignore_ascii_case(&unit.name))
            .map(|(idx, s)| RawStore {
                external_id: Some(external_id(idx)),
                name: s.name.to_string(),
                address: Some(s.address.to_string()),
                latitude: Some(s.lat),
                longitude: Some(s.lng),
                detail_url: None,
                search_area: unit.name.clone(),
            })
            .collect()
    }

    /// Generate reviews for a roster store. Unknown stores get none.
    #[must_use]
    pub fn fetch_reviews(&self, store: &RawStore, max: usize) -> StoreReviews {
        let Some(idx) = (0..ROSTER.len())
            .find(|&i| store.external_id.as_deref() == Some(external_id(i).as_str()))
        else {
            return StoreReviews::empty(store);
        };

        let raw = self.generate(idx);
        StoreReviews {
            store: store.clone(),
            reviews: normalize_reviews(&raw, MIN_TEXT_LEN, max),
        }
    }

    fn store_rng(&self, idx: usize) -> StdRng {
        let salt = (idx as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(self.seed ^ salt)
    }

    fn generate(&self, idx: usize) -> Vec<RawReview> {
        let mut rng = self.store_rng(idx);
        let bias = ROSTER[idx].bias;
        let count = rng.random_range(MIN_REVIEWS.max(MEAN_REVIEWS - REVIEW_SPREAD)..=MEAN_REVIEWS + REVIEW_SPREAD);
        let first_day = NaiveDate::from_ymd_opt(FIRST_DAY.0, FIRST_DAY.1, FIRST_DAY.2);

        (0..count)
            .map(|_| {
                let draw = rng.random::<f64>() + bias * 0.3;
                let (pools, ratings) = if draw > 0.55 {
                    (POSITIVE, POSITIVE_RATINGS)
                } else if draw > 0.25 {
                    (NEGATIVE, NEGATIVE_RATINGS)
                } else if rng.random_bool(0.5) {
                    (POSITIVE, MIXED_RATINGS)
                } else {
                    (NEGATIVE, MIXED_RATINGS)
                };
                let text = pools
                    .choose(&mut rng)
                    .and_then(|(_, texts)| texts.choose(&mut rng))
                    .map(|t| (*t).to_string());
                let rating = ratings.choose(&mut rng).copied();
                let offset = rng.random_range(0..=DATE_SPAN_DAYS);
                let date = first_day.and_then(|d| d.checked_add_signed(TimeDelta::days(offset)));
                let reviewer_name = match (FIRST_NAMES.choose(&mut rng), LAST_NAMES.choose(&mut rng)) {
                    (Some(first), Some(last)) => Some(format!("{first} {last}")),
                    _ => None,
                };
                RawReview {
                    text,
                    rating,
                    date,
                    reviewer_name,
                }
            })
            .collect()
    }
}
