//! Canonical data model and pure collection logic for storepulse.
//!
//! Holds everything the collection pipeline needs that does not touch the
//! network: configuration, the canonical review record, zone classification,
//! deduplication, and the normalization helpers that turn adapter output into
//! canonical rows.

pub mod app_config;
pub mod config;
pub mod dedup;
pub mod error;
pub mod normalize;
pub mod plan;
pub mod record;
pub mod zone;

pub use app_config::{AppConfig, SourceKind};
pub use config::{load_app_config, load_app_config_from_env, select_source};
pub use dedup::{dedup_reviews, fingerprint};
pub use error::{ConfigError, RecordError};
pub use plan::{load_plan, BoundingBox, CollectPlan, MetroArea, RegionRule, WorkUnit};
pub use record::{GeoPoint, ReviewContent, ReviewRecord, Store};
pub use zone::{classify_zone, Zone};
