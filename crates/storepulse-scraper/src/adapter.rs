//! The source adapter seam.
//!
//! A run picks one variant up front. The wrappers here enforce the contract
//! every variant shares: discovery results are brand-filtered, and a failed
//! call becomes an empty result after being logged. The only error that
//! escapes is a browser session fault, which the caller uses to abandon the
//! rest of the current work unit.

use storepulse_core::{AppConfig, CollectPlan, SourceKind, WorkUnit};

use crate::browser::{BrowserOptions, BrowserSource, WebDriverClient};
use crate::error::SourceError;
use crate::http::HttpSettings;
use crate::normalize::normalize_reviews;
use crate::outscraper::{self, OutscraperClient};
use crate::places::{self, PlacesClient};
use crate::synthetic::SyntheticSource;
use crate::types::{RawStore, StoreReviews};

pub enum SourceAdapter {
    RemoteApi(OutscraperClient),
    OfficialApi(PlacesClient),
    Browser(BrowserSource),
    Synthetic(SyntheticSource),
}

impl SourceAdapter {
    /// Build the adapter for `kind` against the production endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if an HTTP client cannot be built, or
    /// [`SourceError::MissingCredential`] if the selected source has no key.
    pub fn from_config(
        kind: SourceKind,
        config: &AppConfig,
        plan: &CollectPlan,
        browser: BrowserOptions,
    ) -> Result<Self, SourceError> {
        let settings = HttpSettings::new(
            config.request_timeout_secs,
            &config.user_agent,
            &plan.language,
            config.inter_request_delay_ms,
        );
        match kind {
            SourceKind::RemoteApi => {
                let key = credential(config.outscraper_api_key.as_deref(), "OUTSCRAPER_API_KEY")?;
                Ok(Self::RemoteApi(OutscraperClient::new(
                    outscraper::DEFAULT_BASE_URL,
                    key,
                    settings,
                )?))
            }
            SourceKind::OfficialApi => {
                let key = credential(config.places_api_key.as_deref(), "GOOGLE_PLACES_API_KEY")?;
                Ok(Self::OfficialApi(PlacesClient::new(
                    places::DEFAULT_BASE_URL,
                    key,
                    settings,
                )?))
            }
            SourceKind::Browser => {
                // Page loads can be slow; allow each command several timeouts' worth.
                let client = WebDriverClient::new(&config.webdriver_url, settings.timeout * 4)?;
                Ok(Self::Browser(BrowserSource::new(client, browser)))
            }
            SourceKind::Synthetic => Ok(Self::Synthetic(SyntheticSource::new(config.synthetic_seed))),
        }
    }

    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::RemoteApi(_) => SourceKind::RemoteApi,
            Self::OfficialApi(_) => SourceKind::OfficialApi,
            Self::Browser(_) => SourceKind::Browser,
            Self::Synthetic(_) => SourceKind::Synthetic,
        }
    }

    /// Acquire per-unit resources. Only the browser holds any.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the browser session cannot be started.
    pub async fn open_unit(&mut self, unit: &WorkUnit) -> Result<(), SourceError> {
        if let Self::Browser(browser) = self {
            tracing::debug!(unit = %unit.name, "starting browser session");
            browser.open().await?;
        }
        Ok(())
    }

    /// Release per-unit resources. Always safe to call.
    pub async fn close_unit(&mut self) {
        if let Self::Browser(browser) = self {
            browser.close().await;
        }
    }

    /// Stores for `unit` whose name carries the plan's brand token.
    ///
    /// Failures are logged and yield an empty list.
    pub async fn find_stores(&mut self, plan: &CollectPlan, unit: &WorkUnit) -> Vec<RawStore> {
        let location = plan.location_query(unit);
        let result = match self {
            Self::RemoteApi(client) => {
                client
                    .search_places(&plan.search_query, &location, &unit.name)
                    .await
            }
            Self::OfficialApi(client) => {
                let query = format!("{} {location}", plan.search_query);
                client
                    .text_search(&query, unit.center.map(|c| (c.lat, c.lng)), &unit.name)
                    .await
            }
            Self::Browser(browser) => browser.find_stores(plan, unit).await,
            Self::Synthetic(synthetic) => Ok(synthetic.find_stores(unit)),
        };

        match result {
            Ok(stores) => {
                let found = stores.len();
                let kept: Vec<RawStore> = stores
                    .into_iter()
                    .filter(|s| plan.matches_brand(&s.name))
                    .collect();
                tracing::info!(
                    unit = %unit.name,
                    source = %self.kind(),
                    found,
                    kept = kept.len(),
                    "store discovery complete"
                );
                kept
            }
            Err(e) => {
                tracing::warn!(unit = %unit.name, source = %self.kind(), error = %e, "store discovery failed");
                Vec::new()
            }
        }
    }

    /// Up to `max` validated reviews for one store.
    ///
    /// # Errors
    ///
    /// Returns the error only when it is a session fault; every other
    /// failure is logged and yields an empty review set.
    pub async fn fetch_reviews(
        &mut self,
        store: &RawStore,
        max: usize,
    ) -> Result<StoreReviews, SourceError> {
        let result = match self {
            Self::RemoteApi(client) => match store.external_id.as_deref() {
                Some(id) => client
                    .place_reviews(id, max)
                    .await
                    .map(|raw| StoreReviews {
                        store: store.clone(),
                        reviews: normalize_reviews(&raw, outscraper::MIN_TEXT_LEN, max),
                    }),
                None => Ok(StoreReviews::empty(store)),
            },
            Self::OfficialApi(client) => match store.external_id.as_deref() {
                Some(id) => client.place_reviews(id).await.map(|raw| StoreReviews {
                    store: store.clone(),
                    reviews: normalize_reviews(&raw, places::MIN_TEXT_LEN, max),
                }),
                None => Ok(StoreReviews::empty(store)),
            },
            Self::Browser(browser) => browser.fetch_reviews(store, max).await,
            Self::Synthetic(synthetic) => Ok(synthetic.fetch_reviews(store, max)),
        };

        match result {
            Ok(found) => Ok(found),
            Err(e) if e.is_session_fault() => Err(e),
            Err(e) => {
                tracing::warn!(store = %store.name, source = %self.kind(), error = %e, "review fetch failed");
                Ok(StoreReviews::empty(store))
            }
        }
    }
}

fn credential<'a>(value: Option<&'a str>, var: &'static str) -> Result<&'a str, SourceError> {
    value.ok_or(SourceError::MissingCredential(var))
}
