//! Request plumbing shared by the JSON API sources.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::SourceError;
use crate::pacing::Pacer;

/// Connection and pacing settings common to every HTTP source.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Timeout for discovery calls. Review fetches use twice this.
    pub timeout: Duration,
    pub user_agent: String,
    pub language: String,
    pub pacer: Pacer,
}

impl HttpSettings {
    #[must_use]
    pub fn new(timeout_secs: u64, user_agent: &str, language: &str, delay_ms: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            user_agent: user_agent.to_string(),
            language: language.to_string(),
            pacer: Pacer::from_millis(delay_ms),
        }
    }

    #[must_use]
    pub fn review_timeout(&self) -> Duration {
        self.timeout * 2
    }

    pub(crate) fn build_client(&self) -> Result<Client, SourceError> {
        Ok(Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&self.user_agent)
            .build()?)
    }
}

/// Join `path` onto `base_url` and append query pairs.
pub(crate) fn endpoint_url(
    base_url: &str,
    path: &str,
    query: &[(&str, &str)],
) -> Result<Url, SourceError> {
    let joined = format!("{}{path}", base_url.trim_end_matches('/'));
    let mut url = Url::parse(&joined).map_err(|e| SourceError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// GET `url` and decode a JSON body.
///
/// Any non-2xx status is an error; so is a body that does not decode as `T`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
    headers: &[(&'static str, &str)],
    timeout: Duration,
    context: &str,
) -> Result<T, SourceError> {
    let mut request = client
        .get(url.clone())
        .timeout(timeout)
        .header(reqwest::header::ACCEPT, "application/json");
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    // Transport errors carry the request URL, query credentials included.
    let response = request.send().await.map_err(reqwest::Error::without_url)?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::UnexpectedStatus {
            status: status.as_u16(),
            url: redact_query(&url),
        });
    }

    let body = response
        .text()
        .await
        .map_err(reqwest::Error::without_url)?;
    serde_json::from_str::<T>(&body).map_err(|e| SourceError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

/// URL without its query string, so credentials passed as query parameters
/// never reach the logs.
fn redact_query(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}
