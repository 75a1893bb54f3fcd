//! Client for the Outscraper hosted scraping API.
//!
//! Both endpoints wrap results in a `data` array whose items are either place
//! objects or arrays of place objects, depending on how many queries were
//! batched. Items are decoded one at a time so a single malformed entry is
//! skipped instead of failing the call.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::dates::parse_api_date;
use crate::error::SourceError;
use crate::http::{endpoint_url, get_json, HttpSettings};
use crate::types::{RawReview, RawStore};

pub const DEFAULT_BASE_URL: &str = "https://api.app.outscraper.com";

/// Reviews shorter than this are not worth keeping.
pub const MIN_TEXT_LEN: usize = 10;

const SEARCH_LIMIT: &str = "20";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PlaceItem {
    name: String,
    #[serde(default)]
    full_address: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewsItem {
    #[serde(default)]
    reviews_data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ReviewItem {
    #[serde(default)]
    review_text: Option<String>,
    #[serde(default)]
    review_rating: Option<f64>,
    #[serde(default)]
    review_datetime_utc: Option<String>,
    #[serde(default)]
    author_title: Option<String>,
}

pub struct OutscraperClient {
    client: Client,
    base_url: String,
    api_key: String,
    settings: HttpSettings,
}

impl OutscraperClient {
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

    /// Search places matching `query` near `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, non-2xx status, or an
    /// envelope that is not JSON.
    pub async fn search_places(
        &self,
        query: &str,
        location: &str,
        search_area: &str,
    ) -> Result<Vec<RawStore>, SourceError> {
        let url = endpoint_url(
            &self.base_url,
            "/maps/search-v3",
            &[
                ("query", query),
                ("location", location),
                ("limit", SEARCH_LIMIT),
                ("language", self.settings.language.as_str()),
                ("async", "false"),
            ],
        )?;
        let result = get_json::<Envelope>(
            &self.client,
            url,
            &[("X-API-KEY", self.api_key.as_str())],
            self.settings.timeout,
            &format!("place search near {location}"),
        )
        .await;
        self.settings.pacer.pause().await;

        Ok(flatten(result?.data)
            .filter_map(|item| decode::<PlaceItem>(item, "place"))
            .map(|place| RawStore {
                external_id: place.place_id.filter(|id| !id.is_empty()),
                name: place.name,
                address: place.full_address,
                latitude: place.latitude,
                longitude: place.longitude,
                detail_url: None,
                search_area: search_area.to_string(),
            })
            .collect())
    }

    /// Fetch up to `limit` newest reviews for one place id.
    ///
    /// # Errors
    ///
    /// Same conditions as [`OutscraperClient::search_places`].
    pub async fn place_reviews(
        &self,
        place_id: &str,
        limit: usize,
    ) -> Result<Vec<RawReview>, SourceError> {
        let limit = limit.to_string();
        let url = endpoint_url(
            &self.base_url,
            "/maps/reviews-v3",
            &[
                ("query", place_id),
                ("reviewsLimit", limit.as_str()),
                ("language", self.settings.language.as_str()),
                ("sort", "newest"),
                ("async", "false"),
            ],
        )?;
        let result = get_json::<Envelope>(
            &self.client,
            url,
            &[("X-API-KEY", self.api_key.as_str())],
            self.settings.review_timeout(),
            &format!("reviews for {place_id}"),
        )
        .await;
        self.settings.pacer.pause().await;

        Ok(flatten(result?.data)
            .filter_map(|item| decode::<ReviewsItem>(item, "review container"))
            .flat_map(|container| container.reviews_data)
            .filter_map(|item| decode::<ReviewItem>(item, "review"))
            .map(|review| RawReview {
                text: review.review_text,
                rating: review.review_rating.and_then(round_rating),
                date: review.review_datetime_utc.as_deref().and_then(parse_api_date),
                reviewer_name: review.author_title,
            })
            .collect())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_rating(rating: f64) -> Option<i64> {
    (rating.is_finite() && (0.0..=10.0).contains(&rating)).then(|| rating.round() as i64)
}

fn flatten(data: Vec<Value>) -> impl Iterator<Item = Value> {
    data.into_iter().flat_map(|item| match item {
        Value::Array(items) => items,
        other => vec![other],
    })
}

fn decode<T: serde::de::DeserializeOwned>(item: Value, what: &str) -> Option<T> {
    match serde_json::from_value(item) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::debug!(error = %e, "skipping malformed {what} entry");
            None
        }
    }
}
