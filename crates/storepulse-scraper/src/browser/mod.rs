//! Review collection by driving a real browser through the maps UI.
//!
//! One browser session serves one work unit. It is opened before the unit's
//! search and deleted afterwards, so a crashed or bloated browser costs at
//! most the rest of that unit.

pub mod extract;
pub mod scripts;
pub mod webdriver;

use std::time::Duration;

use serde_json::{json, Value};
use storepulse_core::{CollectPlan, WorkUnit};

use crate::error::SourceError;
use crate::normalize::normalize_reviews;
use crate::pacing::Pacer;
use crate::types::{RawStore, StoreReviews};

pub use webdriver::{WebDriverClient, WebDriverSession};

pub const DEFAULT_MAPS_URL: &str = "https://www.google.com";

/// Shortest review body kept from rendered pages.
pub const MIN_TEXT_LEN: usize = 5;

/// Feed scroll steps before giving up on the result count stabilizing.
const FEED_SCROLL_STEPS: usize = 10;

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    pub maps_base_url: String,
    /// Wait after each navigation for the page to render.
    pub page_settle: Duration,
    /// Wait after each scroll step for more results to load.
    pub scroll_pause: Duration,
    /// Wait after each store before moving to the next.
    pub store_delay: Duration,
}

impl BrowserOptions {
    #[must_use]
    pub fn new(headless: bool, store_delay_ms: u64) -> Self {
        Self {
            headless,
            maps_base_url: DEFAULT_MAPS_URL.to_string(),
            page_settle: Duration::from_secs(5),
            scroll_pause: Duration::from_millis(1500),
            store_delay: Duration::from_millis(store_delay_ms),
        }
    }

    /// No waits at all; for driving a scripted server.
    #[must_use]
    pub fn immediate(maps_base_url: &str) -> Self {
        Self {
            headless: true,
            maps_base_url: maps_base_url.to_string(),
            page_settle: Duration::ZERO,
            scroll_pause: Duration::ZERO,
            store_delay: Duration::ZERO,
        }
    }
}

pub struct BrowserSource {
    client: WebDriverClient,
    options: BrowserOptions,
    session: Option<WebDriverSession>,
}

impl BrowserSource {
    #[must_use]
    pub fn new(client: WebDriverClient, options: BrowserOptions) -> Self {
        Self {
            client,
            options,
            session: None,
        }
    }

    /// Start a fresh session, ending any previous one first.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if no session can be created.
    pub async fn open(&mut self) -> Result<(), SourceError> {
        self.close().await;
        let session = self.client.new_session(self.options.headless).await?;
        if let Err(e) = session.execute(scripts::HIDE_WEBDRIVER, Vec::new()).await {
            tracing::debug!(error = %e, "could not mask automation flag");
        }
        self.session = Some(session);
        Ok(())
    }

    /// End the current session, if any. Failures are logged, not returned.
    pub async fn close(&mut self) {
        if let Some(session) = self.session.take() {
            let id = session.id().to_string();
            if let Err(e) = session.delete().await {
                tracing::warn!(session = %id, error = %e, "failed to end browser session");
            }
        }
    }

    fn session(&self) -> Result<&WebDriverSession, SourceError> {
        self.session
            .as_ref()
            .ok_or_else(|| SourceError::SessionUnavailable("no open browser session".into()))
    }

    /// Search the unit's area and collect store links from the result feed.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if a browser command fails.
    pub async fn find_stores(
        &mut self,
        plan: &CollectPlan,
        unit: &WorkUnit,
    ) -> Result<Vec<RawStore>, SourceError> {
        let url = self.search_url(plan, unit);
        let session = self.session()?;
        session.navigate(&url).await?;
        Pacer::new(self.options.page_settle).pause().await;

        if accepted(session.execute(scripts::ACCEPT_COOKIES, Vec::new()).await) {
            tracing::debug!(unit = %unit.name, "accepted consent dialog");
            Pacer::new(self.options.scroll_pause).pause().await;
        }

        self.scroll_until_stable(
            scripts::FEED_CONTAINERS,
            scripts::STORE_LINK,
            FEED_SCROLL_STEPS,
            None,
        )
        .await?;

        let html = self.session()?.page_source().await?;
        Ok(extract::parse_store_links(&html)
            .into_iter()
            .map(|link| RawStore {
                external_id: None,
                name: link.name,
                address: None,
                latitude: None,
                longitude: None,
                detail_url: Some(link.href),
                search_area: unit.name.clone(),
            })
            .collect())
    }

    /// Visit a store page and collect up to `max` reviews.
    ///
    /// The returned store carries the page's name, address and coordinates
    /// where they were found. A store page with no reachable review list
    /// yields an empty review set.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if a browser command fails.
    pub async fn fetch_reviews(
        &mut self,
        store: &RawStore,
        max: usize,
    ) -> Result<StoreReviews, SourceError> {
        let result = self.visit_store(store, max).await;
        Pacer::new(self.options.store_delay).pause().await;
        result
    }

    async fn visit_store(&self, store: &RawStore, max: usize) -> Result<StoreReviews, SourceError> {
        let Some(href) = store.detail_url.as_deref() else {
            return Ok(StoreReviews::empty(store));
        };
        let session = self.session()?;
        session.navigate(href).await?;
        Pacer::new(self.options.page_settle).pause().await;

        let html = session.page_source().await?;
        let header = extract::parse_place_header(&html);
        let coords = extract::parse_coordinates(&session.current_url().await?);

        let mut found = store.clone();
        if let Some(name) = header.name {
            found.name = name;
        }
        found.address = header.address.or(found.address);
        if let Some((lat, lng)) = coords {
            found.latitude = Some(lat);
            found.longitude = Some(lng);
        }

        if !self.open_reviews().await? {
            tracing::debug!(store = %found.name, "no review list on store page");
            return Ok(StoreReviews::empty(&found));
        }
        self.sort_newest().await;

        self.scroll_until_stable(
            scripts::REVIEW_CONTAINERS,
            scripts::REVIEW_BLOCK,
            max / 4 + 5,
            Some(max),
        )
        .await?;

        let session = self.session()?;
        if let Err(e) = session.execute(scripts::EXPAND_MORE, Vec::new()).await {
            tracing::debug!(error = %e, "could not expand truncated reviews");
        }

        let html = session.page_source().await?;
        let today = chrono::Local::now().date_naive();
        let raw = extract::parse_reviews(&html, today);
        let reviews = normalize_reviews(&raw, MIN_TEXT_LEN, max);
        tracing::debug!(
            store = %found.name,
            parsed = raw.len(),
            kept = reviews.len(),
            "parsed review blocks"
        );

        Ok(StoreReviews {
            store: found,
            reviews,
        })
    }

    /// Try each way of reaching the review list until one acts.
    async fn open_reviews(&self) -> Result<bool, SourceError> {
        let session = self.session()?;
        for &(name, script) in scripts::OPEN_REVIEWS_STRATEGIES {
            match session.execute(script, Vec::new()).await {
                Ok(Value::Bool(true)) => {
                    tracing::debug!(strategy = name, "opened review list");
                    Pacer::new(self.options.page_settle).pause().await;
                    return Ok(true);
                }
                Ok(_) => {}
                Err(e) if e.is_session_fault() => return Err(e),
                Err(e) => tracing::debug!(strategy = name, error = %e, "strategy failed"),
            }
        }
        Ok(false)
    }

    /// Best effort; the default order is kept if the menu is missing.
    async fn sort_newest(&self) {
        let Ok(session) = self.session() else {
            return;
        };
        if !accepted(session.execute(scripts::OPEN_SORT_MENU, Vec::new()).await) {
            return;
        }
        Pacer::new(self.options.scroll_pause).pause().await;
        if accepted(session.execute(scripts::PICK_NEWEST, Vec::new()).await) {
            Pacer::new(self.options.page_settle).pause().await;
        }
    }

    /// Scroll a container until the matched count stops growing, reaches
    /// `target`, or `max_steps` is exhausted. Returns the last count seen.
    async fn scroll_until_stable(
        &self,
        containers: &[&str],
        items: &str,
        max_steps: usize,
        target: Option<usize>,
    ) -> Result<usize, SourceError> {
        let session = self.session()?;
        let args = vec![json!(containers), json!(items)];
        let mut last = 0usize;
        for _ in 0..max_steps {
            let count = match session.execute(scripts::SCROLL_AND_COUNT, args.clone()).await {
                Ok(value) => value.as_i64().unwrap_or(-1),
                Err(e) if e.is_session_fault() => return Err(e),
                Err(e) => {
                    tracing::debug!(error = %e, "scroll step failed");
                    break;
                }
            };
            let Ok(count) = usize::try_from(count) else {
                break;
            };
            Pacer::new(self.options.scroll_pause).pause().await;
            if count == last || target.is_some_and(|t| count >= t) {
                last = count;
                break;
            }
            last = count;
        }

        if last == 0 {
            if let Ok(Some(n)) = session
                .execute(scripts::COUNT, vec![json!(items)])
                .await
                .map(|v| v.as_u64())
            {
                last = usize::try_from(n).unwrap_or(0);
            }
        }
        Ok(last)
    }

    fn search_url(&self, plan: &CollectPlan, unit: &WorkUnit) -> String {
        let base = self.options.maps_base_url.trim_end_matches('/');
        let query = plan.search_query.replace(' ', "+");
        match unit.center {
            Some(c) => format!("{base}/maps/search/{query}/@{},{},12z", c.lat, c.lng),
            None => format!(
                "{base}/maps/search/{query}+{}",
                plan.location_query(unit).replace(' ', "+")
            ),
        }
    }
}

fn accepted(result: Result<Value, SourceError>) -> bool {
    matches!(result, Ok(Value::Bool(true)))
}
