use crate::app_config::{AppConfig, SourceKind};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty credentials are treated as absent so `KEY=` in a .env file does
    // not select an adapter.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_flag = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Ok(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{raw}'"),
            }),
            Err(_) => Ok(default),
        }
    };

    let max_reviews_per_store = parse_usize("STOREPULSE_MAX_REVIEWS_PER_STORE", "50")?;
    if max_reviews_per_store == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREPULSE_MAX_REVIEWS_PER_STORE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        outscraper_api_key: optional("OUTSCRAPER_API_KEY"),
        places_api_key: optional("GOOGLE_PLACES_API_KEY"),
        use_browser: parse_flag("STOREPULSE_USE_BROWSER", false)?,
        allow_synthetic: parse_flag("STOREPULSE_ALLOW_SYNTHETIC", true)?,
        max_reviews_per_store,
        output_path: PathBuf::from(or_default(
            "STOREPULSE_OUTPUT_PATH",
            "data/raw/reviews_raw.csv",
        )),
        plan_path: PathBuf::from(or_default("STOREPULSE_PLAN_PATH", "config/collect.yaml")),
        webdriver_url: or_default("STOREPULSE_WEBDRIVER_URL", "http://localhost:9515"),
        log_level: or_default("STOREPULSE_LOG_LEVEL", "info"),
        request_timeout_secs: parse_u64("STOREPULSE_REQUEST_TIMEOUT_SECS", "30")?,
        user_agent: or_default("STOREPULSE_USER_AGENT", "storepulse/0.1 (review-collection)"),
        inter_request_delay_ms: parse_u64("STOREPULSE_INTER_REQUEST_DELAY_MS", "1000")?,
        browser_store_delay_ms: parse_u64("STOREPULSE_BROWSER_STORE_DELAY_MS", "2000")?,
        unit_delay_ms: parse_u64("STOREPULSE_UNIT_DELAY_MS", "3000")?,
        synthetic_seed: parse_u64("STOREPULSE_SYNTHETIC_SEED", "42")?,
    })
}

/// Parse the loose boolean spellings accepted in env files.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Pick the review source for a run.
///
/// Precedence: browser automation when explicitly requested, then the remote
/// scraping API when its key is present, then the official places API, then
/// the synthetic generator.
///
/// # Errors
///
/// Returns [`ConfigError::NoSourceAvailable`] when nothing is selectable and
/// the synthetic generator is disabled.
pub fn select_source(config: &AppConfig) -> Result<SourceKind, ConfigError> {
    if config.use_browser {
        Ok(SourceKind::Browser)
    } else if config.outscraper_api_key.is_some() {
        Ok(SourceKind::RemoteApi)
    } else if config.places_api_key.is_some() {
        Ok(SourceKind::OfficialApi)
    } else if config.allow_synthetic {
        Ok(SourceKind::Synthetic)
    } else {
        Err(ConfigError::NoSourceAvailable)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
