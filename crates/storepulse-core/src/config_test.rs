use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("empty env is valid");
    assert!(cfg.outscraper_api_key.is_none());
    assert!(cfg.places_api_key.is_none());
    assert!(!cfg.use_browser);
    assert!(cfg.allow_synthetic);
    assert_eq!(cfg.max_reviews_per_store, 50);
    assert_eq!(
        cfg.output_path,
        std::path::PathBuf::from("data/raw/reviews_raw.csv")
    );
    assert_eq!(cfg.webdriver_url, "http://localhost:9515");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.inter_request_delay_ms, 1000);
    assert_eq!(cfg.browser_store_delay_ms, 2000);
    assert_eq!(cfg.unit_delay_ms, 3000);
    assert_eq!(cfg.synthetic_seed, 42);
}

#[test]
fn blank_credentials_are_treated_as_absent() {
    let mut map = HashMap::new();
    map.insert("OUTSCRAPER_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.outscraper_api_key.is_none());
}

#[test]
fn browser_flag_accepts_loose_spellings() {
    for raw in ["1", "true", "YES", "On"] {
        let mut map = HashMap::new();
        map.insert("STOREPULSE_USE_BROWSER", raw);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.use_browser, "{raw} should enable the browser");
    }
}

#[test]
fn invalid_flag_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STOREPULSE_USE_BROWSER", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOREPULSE_USE_BROWSER"),
        "expected InvalidEnvVar(STOREPULSE_USE_BROWSER), got: {result:?}"
    );
}

#[test]
fn invalid_max_reviews_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STOREPULSE_MAX_REVIEWS_PER_STORE", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOREPULSE_MAX_REVIEWS_PER_STORE")
    );
}

#[test]
fn zero_max_reviews_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STOREPULSE_MAX_REVIEWS_PER_STORE", "0");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn debug_output_redacts_credentials() {
    let mut map = HashMap::new();
    map.insert("OUTSCRAPER_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn browser_takes_priority_over_credentials() {
    let mut map = HashMap::new();
    map.insert("STOREPULSE_USE_BROWSER", "true");
    map.insert("OUTSCRAPER_API_KEY", "key");
    map.insert("GOOGLE_PLACES_API_KEY", "key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(select_source(&cfg).unwrap(), SourceKind::Browser);
}

#[test]
fn remote_api_beats_official_api() {
    let mut map = HashMap::new();
    map.insert("OUTSCRAPER_API_KEY", "key");
    map.insert("GOOGLE_PLACES_API_KEY", "key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(select_source(&cfg).unwrap(), SourceKind::RemoteApi);
}

#[test]
fn official_api_selected_with_only_its_key() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_PLACES_API_KEY", "key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(select_source(&cfg).unwrap(), SourceKind::OfficialApi);
}

#[test]
fn synthetic_is_the_last_resort() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(select_source(&cfg).unwrap(), SourceKind::Synthetic);
}

#[test]
fn disabled_synthetic_without_sources_is_a_config_fault() {
    let mut map = HashMap::new();
    map.insert("STOREPULSE_ALLOW_SYNTHETIC", "false");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(matches!(
        select_source(&cfg),
        Err(ConfigError::NoSourceAvailable)
    ));
}
