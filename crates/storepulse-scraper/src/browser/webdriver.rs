//! Minimal W3C WebDriver client over HTTP.
//!
//! Only the handful of commands the maps flow needs: create and delete a
//! session, navigate, read the current URL and page source, and run a
//! synchronous script. Element interaction happens inside scripts.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::SourceError;

const CHROME_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--window-size=1920,1080",
    "--lang=fr-FR",
    "--disable-blink-features=AutomationControlled",
];

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct WireError {
    value: WireErrorValue,
}

#[derive(Debug, Deserialize)]
struct WireErrorValue {
    error: String,
    #[serde(default)]
    message: String,
}

/// Connection to a WebDriver server (chromedriver or a remote grid).
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: Client,
    base_url: String,
}

impl WebDriverClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, command_timeout: Duration) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(command_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Start a fresh Chrome session.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::SessionUnavailable`] when the server cannot be
    /// reached or does not hand back a session id, and
    /// [`SourceError::WebDriver`] when it refuses to create one.
    pub async fn new_session(&self, headless: bool) -> Result<WebDriverSession, SourceError> {
        let mut args: Vec<&str> = CHROME_ARGS.to_vec();
        if headless {
            args.push("--headless=new");
        }
        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": args,
                        "excludeSwitches": ["enable-automation"],
                    }
                }
            }
        });

        let url = format!("{}/session", self.base_url);
        let raw = send(&self.http, Method::POST, &url, Some(&body), "POST /session").await?;

        // W3C servers nest the id under `value`; older ones put it top-level.
        let id = raw
            .pointer("/value/sessionId")
            .or_else(|| raw.get("sessionId"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SourceError::SessionUnavailable("new session response has no sessionId".into())
            })?;

        tracing::debug!(session = id, headless, "webdriver session created");
        Ok(WebDriverSession {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            id: id.to_string(),
        })
    }
}

/// One live browser session. Dropping it does not end the session; call
/// [`WebDriverSession::delete`].
#[derive(Debug)]
pub struct WebDriverSession {
    http: Client,
    base_url: String,
    id: String,
}

impl WebDriverSession {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] if the command fails.
    pub async fn navigate(&self, url: &str) -> Result<(), SourceError> {
        self.command(Method::POST, "url", Some(&json!({ "url": url })))
            .await
            .map(|_| ())
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] if the command fails or returns a non-string.
    pub async fn current_url(&self) -> Result<String, SourceError> {
        let value = self.command(Method::GET, "url", None).await?;
        expect_string(value, "GET /url")
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] if the command fails or returns a non-string.
    pub async fn page_source(&self) -> Result<String, SourceError> {
        let value = self.command(Method::GET, "source", None).await?;
        expect_string(value, "GET /source")
    }

    /// Run `script` synchronously in the page and return its result.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the command fails, including a script error.
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, SourceError> {
        let body = json!({ "script": script, "args": args });
        self.command(Method::POST, "execute/sync", Some(&body)).await
    }

    /// End the session and close the browser.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the server rejects the delete.
    pub async fn delete(self) -> Result<(), SourceError> {
        let url = format!("{}/session/{}", self.base_url, self.id);
        send(&self.http, Method::DELETE, &url, None, "DELETE /session")
            .await
            .map(|_| ())
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, SourceError> {
        let url = format!("{}/session/{}/{path}", self.base_url, self.id);
        let label = format!("{method} /{path}");
        let raw = send(&self.http, method, &url, body, &label).await?;
        Ok(serde_json::from_value::<WireResponse>(raw)
            .map(|r| r.value)
            .unwrap_or(Value::Null))
    }
}

/// Send one command and return the raw JSON body.
///
/// Connection failures mean the server is gone and are reported as
/// [`SourceError::SessionUnavailable`]. Error bodies are decoded into
/// [`SourceError::WebDriver`] so the session-fault heuristic can see the
/// error code.
async fn send(
    http: &Client,
    method: Method,
    url: &str,
    body: Option<&Value>,
    label: &str,
) -> Result<Value, SourceError> {
    let mut request = http.request(method, url);
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_connect() {
            SourceError::SessionUnavailable(format!("{label}: {e}"))
        } else {
            SourceError::Http(e)
        }
    })?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(match serde_json::from_str::<WireError>(&text) {
            Ok(wire) => SourceError::WebDriver {
                command: label.to_string(),
                error: wire.value.error,
                message: wire.value.message,
            },
            Err(_) => SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            },
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| SourceError::Deserialize {
        context: label.to_string(),
        source: e,
    })
}

fn expect_string(value: Value, command: &str) -> Result<String, SourceError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(SourceError::WebDriver {
            command: command.to_string(),
            error: "unexpected value".to_string(),
            message: format!("expected a string, got {other}"),
        }),
    }
}
