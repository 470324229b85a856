#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result schemas returned by the report functions. These serialize to the
//! JSON consumed by the report clients, so field shapes are a wire contract.

use marine_plan_geoprocessing_models::Metric;
use serde::{Deserialize, Serialize};

/// Per-request report parameters passed alongside the sketch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraParams {
    /// Geographies to scope the analysis to, in priority order.
    #[serde(default)]
    pub geography_ids: Vec<String>,
}

impl ExtraParams {
    /// The geography the analysis should run against, when one was given.
    #[must_use]
    pub fn first_geography_id(&self) -> Option<&str> {
        self.geography_ids.first().map(String::as_str)
    }
}

/// Overlap of one sketch with one island group boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupArea {
    /// Island group name, from the boundary dataset.
    pub island_group: String,
    /// Overlap area in square meters.
    pub area: f64,
    /// Overlap area as a fraction of the island group's total area.
    pub fraction_of_group: f64,
}

/// Area breakdown for one sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchAreaResult {
    /// Display name of the sketch.
    pub sketch_name: String,
    /// Sketch area in square meters.
    pub area: f64,
    /// Overlap with each island group, sorted by group name.
    pub group_areas: Vec<GroupArea>,
}

/// Result of the area report: per-sketch breakdowns plus totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaResults {
    /// One entry per member sketch, in input order.
    pub sketch_area: Vec<SketchAreaResult>,
    /// Total area of the input in square meters. For a collection this is
    /// the area of the union of its members, so overlap is not counted
    /// twice.
    pub total_area: f64,
    /// Precalculated area of the exclusive economic zone in square meters.
    pub eez_area: f64,
}

/// One depth histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthBin {
    /// Inclusive lower depth edge in meters below sea level.
    pub min: f64,
    /// Sketch area at this depth range in square meters.
    pub area: f64,
}

/// Result of the depth report.
///
/// Depths are positive meters below sea level. All three summary values
/// are absent when the sketch overlaps no bathymetry contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthResults {
    /// Shallowest depth the sketch reaches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_depth: Option<f64>,
    /// Deepest depth the sketch reaches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<f64>,
    /// Area-weighted mean depth across overlapped contours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_depth: Option<f64>,
    /// Area by 100 m depth bucket, ordered by bucket edge.
    pub histogram: Vec<DepthBin>,
}

/// Result of the seamounts report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeamountsResults {
    /// Distinct seamounts the sketch overlaps.
    pub count: u64,
    /// Precalculated seamount count in the exclusive economic zone.
    pub count_eez: u64,
    /// Shallowest peak among overlapped seamounts, in positive meters.
    /// Absent when no seamount is overlapped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_peak_depth: Option<f64>,
    /// Deepest peak among overlapped seamounts, in positive meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_peak_depth: Option<f64>,
    /// Overlapped seamount area in square kilometers.
    pub area: f64,
    /// Overlapped seamount area as a fraction of the zone's total area.
    pub fraction_of_eez: f64,
}

/// Result of a class-overlap habitat report: a flat metric list, rekeyed
/// and canonically sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResult {
    /// The computed metrics.
    pub metrics: Vec<Metric>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_geography_id_takes_the_head() {
        let params = ExtraParams {
            geography_ids: vec!["nearshore".to_string(), "eez".to_string()],
        };
        assert_eq!(params.first_geography_id(), Some("nearshore"));
        assert_eq!(ExtraParams::default().first_geography_id(), None);
    }

    #[test]
    fn absent_peak_depths_are_omitted_from_json() {
        let results = SeamountsResults {
            count: 0,
            count_eez: 199,
            min_peak_depth: None,
            max_peak_depth: None,
            area: 0.0,
            fraction_of_eez: 0.0,
        };
        let json = serde_json::to_value(&results).unwrap();
        assert!(json.get("min_peak_depth").is_none());
        assert!(json.get("max_peak_depth").is_none());
        assert_eq!(json["count_eez"], 199);
    }

    #[test]
    fn depth_results_serialize_histogram_in_order() {
        let results = DepthResults {
            min_depth: Some(5.0),
            max_depth: Some(250.0),
            mean_depth: Some(120.0),
            histogram: vec![
                DepthBin { min: 0.0, area: 10.0 },
                DepthBin {
                    min: 100.0,
                    area: 20.0,
                },
            ],
        };
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["histogram"][0]["min"], 0.0);
        assert_eq!(json["histogram"][1]["area"], 20.0);
    }
}
