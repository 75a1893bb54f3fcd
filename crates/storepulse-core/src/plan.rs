//! Collection plan: the YAML file describing what to collect and how to
//! classify it.
//!
//! The plan carries all geography-specific data (work units, region keyword
//! tables, metropolitan bounding boxes) so the classifier and normalizers stay
//! free of embedded constants.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::record::GeoPoint;
use crate::ConfigError;

/// One geographic area searched for stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkUnit {
    pub name: String,
    #[serde(default)]
    pub center: Option<GeoPoint>,
}

/// Maps address or area text onto an administrative region label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionRule {
    pub label: String,
    /// Lowercase substrings matched against lowercased text.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Prefixes matched against the first 5-digit postal code in the text.
    #[serde(default)]
    pub postcode_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl BoundingBox {
    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.lat_min..=self.lat_max).contains(&point.lat)
            && (self.lng_min..=self.lng_max).contains(&point.lng)
    }
}

/// A metropolitan region whose capital city box splits it into core and
/// periphery zones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetroArea {
    pub name: String,
    /// Case-insensitive substrings identifying the region label.
    pub region_keywords: Vec<String>,
    pub bbox: BoundingBox,
}

impl MetroArea {
    #[must_use]
    pub fn matches_region(&self, region_label: &str) -> bool {
        let label = region_label.to_lowercase();
        self.region_keywords
            .iter()
            .any(|kw| label.contains(&kw.to_lowercase()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectPlan {
    /// Store names must contain this token (case-insensitive) to be kept.
    pub brand_token: String,
    /// Free-text query sent to search-capable sources.
    pub search_query: String,
    pub country: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub work_units: Vec<WorkUnit>,
    #[serde(default)]
    pub regions: Vec<RegionRule>,
    #[serde(default = "default_region")]
    pub default_region: String,
    #[serde(default)]
    pub metro_areas: Vec<MetroArea>,
}

fn default_language() -> String {
    "fr".to_string()
}

fn default_region() -> String {
    "unknown".to_string()
}

impl CollectPlan {
    /// Parse and validate a plan from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PlanFileParse`] for malformed YAML and
    /// [`ConfigError::Validation`] for semantically invalid plans.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let plan: CollectPlan = serde_yaml::from_str(content)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Case-insensitive brand filter applied to every discovered store name.
    #[must_use]
    pub fn matches_brand(&self, store_name: &str) -> bool {
        store_name
            .to_lowercase()
            .contains(&self.brand_token.to_lowercase())
    }

    /// Location string for sources that search by text, e.g. `"Lyon, France"`.
    #[must_use]
    pub fn location_query(&self, unit: &WorkUnit) -> String {
        if self.country.trim().is_empty() {
            unit.name.clone()
        } else {
            format!("{}, {}", unit.name, self.country)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.brand_token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand_token must be non-empty".to_string(),
            ));
        }
        if self.work_units.is_empty() {
            return Err(ConfigError::Validation(
                "at least one work unit is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for unit in &self.work_units {
            if unit.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "work unit name must be non-empty".to_string(),
                ));
            }
            if !seen.insert(unit.name.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate work unit: '{}'",
                    unit.name
                )));
            }
            if let Some(center) = unit.center {
                if GeoPoint::new(center.lat, center.lng).is_none() {
                    return Err(ConfigError::Validation(format!(
                        "work unit '{}' has an out-of-range center ({}, {})",
                        unit.name, center.lat, center.lng
                    )));
                }
            }
        }

        for region in &self.regions {
            if region.label.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "region label must be non-empty".to_string(),
                ));
            }
        }

        for metro in &self.metro_areas {
            let b = metro.bbox;
            if b.lat_min > b.lat_max || b.lng_min > b.lng_max {
                return Err(ConfigError::Validation(format!(
                    "metro area '{}' has an inverted bounding box",
                    metro.name
                )));
            }
            if metro.region_keywords.iter().all(|kw| kw.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "metro area '{}' needs at least one region keyword",
                    metro.name
                )));
            }
        }

        Ok(())
    }
}

/// Load and validate the collection plan from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_plan(path: &Path) -> Result<CollectPlan, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PlanFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    CollectPlan::from_yaml_str(&content)
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
