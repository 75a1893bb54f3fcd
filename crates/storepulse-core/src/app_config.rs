use std::path::PathBuf;

/// Which review source a run uses. Selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Browser,
    RemoteApi,
    OfficialApi,
    Synthetic,
}

impl SourceKind {
    /// Provenance tag written into every record produced by this source.
    #[must_use]
    pub fn provenance(self) -> &'static str {
        match self {
            SourceKind::Browser => "google_maps",
            SourceKind::RemoteApi => "outscraper",
            SourceKind::OfficialApi => "google_places",
            SourceKind::Synthetic => "simulated",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Browser => write!(f, "browser"),
            SourceKind::RemoteApi => write!(f, "remote-api"),
            SourceKind::OfficialApi => write!(f, "official-api"),
            SourceKind::Synthetic => write!(f, "synthetic"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub outscraper_api_key: Option<String>,
    pub places_api_key: Option<String>,
    pub use_browser: bool,
    pub allow_synthetic: bool,
    pub max_reviews_per_store: usize,
    pub output_path: PathBuf,
    pub plan_path: PathBuf,
    pub webdriver_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub inter_request_delay_ms: u64,
    pub browser_store_delay_ms: u64,
    pub unit_delay_ms: u64,
    pub synthetic_seed: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "outscraper_api_key",
                &self.outscraper_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("use_browser", &self.use_browser)
            .field("allow_synthetic", &self.allow_synthetic)
            .field("max_reviews_per_store", &self.max_reviews_per_store)
            .field("output_path", &self.output_path)
            .field("plan_path", &self.plan_path)
            .field("webdriver_url", &self.webdriver_url)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("browser_store_delay_ms", &self.browser_store_delay_ms)
            .field("unit_delay_ms", &self.unit_delay_ms)
            .field("synthetic_seed", &self.synthetic_seed)
            .finish()
    }
}
