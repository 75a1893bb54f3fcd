use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read collection plan at {path}: {source}")]
    PlanFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse collection plan: {0}")]
    PlanFileParse(#[from] serde_yaml::Error),

    #[error("collection plan validation failed: {0}")]
    Validation(String),

    #[error(
        "no review source is available: set OUTSCRAPER_API_KEY or GOOGLE_PLACES_API_KEY, \
         enable STOREPULSE_USE_BROWSER, or allow the synthetic generator"
    )]
    NoSourceAvailable,
}

/// Reasons a raw review is rejected during normalization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("review text is shorter than {min_len} characters")]
    TextTooShort { min_len: usize },

    #[error("rating {0} is outside 1..=5")]
    RatingOutOfRange(i64),
}
