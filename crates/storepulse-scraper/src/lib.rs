//! Review sources for storepulse.
//!
//! Four interchangeable variants behind [`SourceAdapter`]: the Outscraper
//! scraping API, the official Places API, a WebDriver-driven browser, and a
//! seeded synthetic generator.

pub mod adapter;
pub mod browser;
pub mod dates;
pub mod error;
pub mod http;
pub mod normalize;
pub mod outscraper;
pub mod pacing;
pub mod places;
pub mod synthetic;
pub mod types;

pub use adapter::SourceAdapter;
pub use browser::{BrowserOptions, BrowserSource, WebDriverClient, WebDriverSession};
pub use error::SourceError;
pub use http::HttpSettings;
pub use normalize::{normalize_review, normalize_reviews, normalize_store};
pub use outscraper::OutscraperClient;
pub use pacing::Pacer;
pub use places::PlacesClient;
pub use synthetic::SyntheticSource;
pub use types::{RawReview, RawStore, StoreReviews};
