#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Project configuration schema.
//!
//! Defines the TOML schema for a marine-planning project: registered
//! reference datasources, metric groups with their classes, geographies,
//! and the precomputed whole-domain totals produced by the offline
//! precalculation tooling.

use serde::{Deserialize, Serialize};

/// Full project configuration, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Registered reference datasources.
    pub datasources: Vec<Datasource>,
    /// Metric groups available to class-overlap reports.
    pub metric_groups: Vec<MetricGroup>,
    /// Geographies a report can be scoped to.
    pub geographies: Vec<Geography>,
    /// Injected whole-domain totals.
    pub precalc: PrecalcTotals,
}

/// Kind of a registered datasource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoType {
    /// Vector features (polygons).
    Vector,
    /// Raster coverage. Not consumed by the overlap pipeline.
    Raster,
}

/// A registered reference dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datasource {
    /// Unique datasource identifier (e.g. `"bathy"`).
    pub datasource_id: String,
    /// Vector or raster.
    pub geo_type: GeoType,
    /// Location of the spatially indexed feature store.
    pub url: String,
    /// Property names used to split features into classes.
    #[serde(default)]
    pub class_keys: Vec<String>,
}

impl Datasource {
    /// Whether this datasource holds vector features.
    #[must_use]
    pub fn is_vector(&self) -> bool {
        self.geo_type == GeoType::Vector
    }
}

/// A group of related metrics computed together by one report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricGroup {
    /// Metric identifier stamped on every produced metric.
    pub metric_id: String,
    /// Classes to compute, possibly spanning several datasources.
    pub classes: Vec<MetricClass>,
}

/// A named category within a metric group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricClass {
    /// Class identifier (e.g. a habitat type).
    pub class_id: String,
    /// Datasource the class's features come from.
    pub datasource_id: Option<String>,
    /// Property name used to filter features into this sub-class.
    pub class_key: Option<String>,
    /// Display label for report UIs.
    pub display: String,
}

impl MetricClass {
    /// Whether this class represents all features of the datasource, with
    /// no property filter applied.
    #[must_use]
    pub fn is_unfiltered(&self, datasource_id: &str) -> bool {
        self.class_key.is_none() || self.class_id == format!("{datasource_id}_all")
    }
}

/// A geography a report can be scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geography {
    /// Unique geography identifier.
    pub geography_id: String,
    /// Display label.
    pub display: String,
    /// Datasource holding the geography's boundary features; a geography
    /// without one applies no clipping.
    pub datasource_id: Option<String>,
    /// Groups this geography belongs to (e.g. `"default-boundary"`).
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Whole-domain totals produced by offline precalculation and injected as
/// configuration; never hardcoded in analysis code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PrecalcTotals {
    /// Total EEZ area in square kilometers.
    pub eez_area_sq_km: f64,
    /// Total number of seamounts in the EEZ.
    pub eez_seamount_count: u64,
}
