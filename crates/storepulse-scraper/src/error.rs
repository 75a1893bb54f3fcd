use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} API error ({status}): {message}")]
    Api {
        service: &'static str,
        status: String,
        message: String,
    },

    #[error("WebDriver command {command} failed ({error}): {message}")]
    WebDriver {
        command: String,
        error: String,
        message: String,
    },

    #[error("browser session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),
}

/// WebDriver error codes that mean the session itself is gone.
const SESSION_FAULT_CODES: &[&str] = &[
    "invalid session id",
    "no such window",
    "session not created",
    "disconnected",
];

impl SourceError {
    /// Returns `true` when the error means the rendering session is dead and
    /// further commands against it will fail.
    ///
    /// Session faults abort the remaining stores of a work unit; every other
    /// error only costs the current call.
    #[must_use]
    pub fn is_session_fault(&self) -> bool {
        match self {
            SourceError::SessionUnavailable(_) => true,
            SourceError::WebDriver { error, message, .. } => {
                SESSION_FAULT_CODES.contains(&error.as_str())
                    || message.to_lowercase().contains("session")
                    || message.to_lowercase().contains("chrome not reachable")
            }
            _ => false,
        }
    }
}
