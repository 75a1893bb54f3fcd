//! Client for the official Google Places web service.
//!
//! Text search discovers stores; place details returns at most five reviews
//! per store, so volume is far below the scraping sources.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::dates::date_from_unix;
use crate::error::SourceError;
use crate::http::{endpoint_url, get_json, HttpSettings};
use crate::types::{RawReview, RawStore};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

pub const MIN_TEXT_LEN: usize = 10;

/// Search radius around a work unit center, in meters.
const SEARCH_RADIUS_M: &str = "20000";

const DETAIL_FIELDS: &str = "name,formatted_address,geometry,reviews";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: Option<PlaceDetails>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    place_id: Option<String>,
    name: String,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct PlaceDetails {
    #[serde(default)]
    reviews: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PlaceReview {
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    rating: Option<i64>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    time: Option<i64>,
}

/// `OK` and `ZERO_RESULTS` are successes; anything else is an API error.
fn check_status(status: &str, message: Option<String>) -> Result<(), SourceError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(SourceError::Api {
            service: "places",
            status: other.to_string(),
            message: message.unwrap_or_default(),
        }),
    }
}

pub struct PlacesClient {
    client: Client,
    base_url: String,
    api_key: String,
    settings: HttpSettings,
}

impl PlacesClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: &str, settings: HttpSettings) -> Result<Self, SourceError> {
        Ok(Self {
            client: settings.build_client()?,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            settings,
        })
    }

    /// Text search for `query`, biased towards `center` when given.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, non-2xx status, a body
    /// that is not JSON, or an API status other than `OK`/`ZERO_RESULTS`.
    pub async fn text_search(
        &self,
        query: &str,
        center: Option<(f64, f64)>,
        search_area: &str,
    ) -> Result<Vec<RawStore>, SourceError> {
        let location = center.map(|(lat, lng)| format!("{lat},{lng}"));
        let mut params = vec![
            ("query", query),
            ("language", self.settings.language.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(location) = location.as_deref() {
            params.push(("location", location));
            params.push(("radius", SEARCH_RADIUS_M));
        }
        let url = endpoint_url(&self.base_url, "/maps/api/place/textsearch/json", &params)?;

        let result = get_json::<SearchResponse>(
            &self.client,
            url,
            &[],
            self.settings.timeout,
            &format!("text search for {query}"),
        )
        .await;
        self.settings.pacer.pause().await;

        let response = result?;
        check_status(&response.status, response.error_message)?;

        Ok(response
            .results
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<PlaceResult>(item) {
                Ok(place) => Some(place),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed place result");
                    None
                }
            })
            .map(|place| RawStore {
                external_id: place.place_id.filter(|id| !id.is_empty()),
                name: place.name,
                address: place.formatted_address,
                latitude: place.geometry.as_ref().map(|g| g.location.lat),
                longitude: place.geometry.as_ref().map(|g| g.location.lng),
                detail_url: None,
                search_area: search_area.to_string(),
            })
            .collect())
    }

    /// Reviews attached to a place's details, newest first.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PlacesClient::text_search`].
    pub async fn place_reviews(&self, place_id: &str) -> Result<Vec<RawReview>, SourceError> {
        let url = endpoint_url(
            &self.base_url,
            "/maps/api/place/details/json",
            &[
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
                ("reviews_sort", "newest"),
                ("language", self.settings.language.as_str()),
                ("key", self.api_key.as_str()),
            ],
        )?;

        let result = get_json::<DetailsResponse>(
            &self.client,
            url,
            &[],
            self.settings.review_timeout(),
            &format!("details for {place_id}"),
        )
        .await;
        self.settings.pacer.pause().await;

        let response = result?;
        check_status(&response.status, response.error_message)?;

        Ok(response
            .result
            .map(|details| details.reviews)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| serde_json::from_value::<PlaceReview>(item).ok())
            .map(|review| RawReview {
                text: review.text,
                rating: review.rating,
                date: review.time.and_then(date_from_unix),
                reviewer_name: review.author_name,
            })
            .collect())
    }
}
