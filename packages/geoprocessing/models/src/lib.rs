#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Core data model for the sketch/feature overlap-analysis pipeline.
//!
//! Sketches are user-drawn planning polygons, features come from reference
//! datasets (habitat classes, bathymetry contours, seamount footprints, EEZ
//! boundaries), and metrics are the scalar measurements the report functions
//! produce from their overlap. All geometry is WGS84 longitude/latitude
//! degrees.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// Bounding box as `[min_x, min_y, max_x, max_y]` in WGS84 degrees.
///
/// Longitudes are normalized to `[-180, 180]`; `min_x <= max_x` holds except
/// for an antimeridian-crossing box that has not been split yet.
pub type BBox = [f64; 4];

/// The whole-world bounding box. Querying a source with it retrieves the
/// full dataset.
pub const WORLD_BBOX: BBox = [-180.0, -90.0, 180.0, 90.0];

/// A feature from a reference dataset: polygon geometry plus a property bag.
///
/// Polygon inputs are normalized to a single-member [`MultiPolygon`] so all
/// consumers deal with one geometry shape.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Stable feature identifier, when the dataset provides one.
    pub id: Option<String>,
    /// Polygon geometry in WGS84 degrees.
    pub geometry: MultiPolygon<f64>,
    /// Arbitrary dataset-specific properties.
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Feature {
    /// Creates a feature with no id and empty properties.
    #[must_use]
    pub fn new(geometry: MultiPolygon<f64>) -> Self {
        Self {
            id: None,
            geometry,
            properties: serde_json::Map::new(),
        }
    }

    /// Returns a string property value, if present and a string.
    #[must_use]
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(serde_json::Value::as_str)
    }

    /// Returns a numeric property value, if present and numeric.
    #[must_use]
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(serde_json::Value::as_f64)
    }
}

/// A user-drawn planning polygon.
#[derive(Debug, Clone)]
pub struct Sketch {
    /// Unique sketch identifier.
    pub id: String,
    /// Display name, shown in per-sketch report breakdowns.
    pub name: String,
    /// Polygon geometry in WGS84 degrees.
    pub geometry: MultiPolygon<f64>,
    /// Arbitrary sketch-class properties.
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Sketch {
    /// Creates a sketch with empty properties.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            geometry,
            properties: serde_json::Map::new(),
        }
    }
}

/// An ordered group of sketches analyzed together.
///
/// For collection-level area accounting the effective geometry is the union
/// of the children; children are still processed independently for
/// per-sketch breakdowns.
#[derive(Debug, Clone)]
pub struct SketchCollection {
    /// Unique collection identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Member sketches.
    pub sketches: Vec<Sketch>,
}

/// Input to an analysis function: a bare sketch or a collection.
#[derive(Debug, Clone)]
pub enum SketchInput {
    /// A single sketch.
    Single(Sketch),
    /// A collection of sketches.
    Collection(SketchCollection),
}

impl SketchInput {
    /// Flattens to the member sketches. A bare sketch is a one-element list.
    #[must_use]
    pub fn sketches(&self) -> &[Sketch] {
        match self {
            Self::Single(sketch) => std::slice::from_ref(sketch),
            Self::Collection(collection) => &collection.sketches,
        }
    }

    /// Identifier of the sketch or collection.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Single(sketch) => &sketch.id,
            Self::Collection(collection) => &collection.id,
        }
    }

    /// Whether this input is a collection.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }
}

impl From<Sketch> for SketchInput {
    fn from(sketch: Sketch) -> Self {
        Self::Single(sketch)
    }
}

impl From<SketchCollection> for SketchInput {
    fn from(collection: SketchCollection) -> Self {
        Self::Collection(collection)
    }
}

/// One computed measurement tied to a sketch, class, and geography.
///
/// Immutable once produced; the aggregator only reorders and rekeys, never
/// mutates values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Metric group identifier (e.g. `"benthic_features"`).
    pub metric_id: String,
    /// Class within the metric group, when class-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    /// Sketch or collection this measurement belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sketch_id: Option<String>,
    /// Geography the measurement was computed for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geography_id: Option<String>,
    /// Measured value (square meters for area metrics).
    pub value: f64,
}

impl Metric {
    /// Composite key identifying the logical measurement.
    ///
    /// Two metrics with the same key are the same measurement; the
    /// aggregator collapses them rather than emitting duplicates.
    #[must_use]
    pub fn key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.metric_id,
            self.sketch_id.as_deref().unwrap_or(""),
            self.class_id.as_deref().unwrap_or(""),
            self.geography_id.as_deref().unwrap_or(""),
        )
    }
}

/// One histogram bucket: the half-open interval `[min, next.min)` and the
/// value accumulated into it. The last bin of a sequence is unbounded above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Inclusive lower edge of the interval.
    pub min: f64,
    /// Accumulated value (area in square meters for depth histograms).
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn unit_square() -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]])
    }

    #[test]
    fn single_sketch_flattens_to_one_element() {
        let input = SketchInput::from(Sketch::new("s1", "one", unit_square()));
        assert_eq!(input.sketches().len(), 1);
        assert_eq!(input.id(), "s1");
        assert!(!input.is_collection());
    }

    #[test]
    fn collection_flattens_to_members() {
        let input = SketchInput::from(SketchCollection {
            id: "c1".to_string(),
            name: "pair".to_string(),
            sketches: vec![
                Sketch::new("s1", "one", unit_square()),
                Sketch::new("s2", "two", unit_square()),
            ],
        });
        assert_eq!(input.sketches().len(), 2);
        assert_eq!(input.id(), "c1");
        assert!(input.is_collection());
    }

    #[test]
    fn metric_key_includes_all_identifiers() {
        let metric = Metric {
            metric_id: "depth".to_string(),
            class_id: Some("bathy_all".to_string()),
            sketch_id: Some("s1".to_string()),
            geography_id: Some("eez".to_string()),
            value: 1.0,
        };
        assert_eq!(metric.key(), "depth|s1|bathy_all|eez");
    }

    #[test]
    fn metric_key_tolerates_missing_identifiers() {
        let metric = Metric {
            metric_id: "depth".to_string(),
            class_id: None,
            sketch_id: None,
            geography_id: None,
            value: 1.0,
        };
        assert_eq!(metric.key(), "depth|||");
    }

    #[test]
    fn feature_property_accessors() {
        let mut feature = Feature::new(unit_square());
        feature
            .properties
            .insert("UNION".to_string(), serde_json::json!("Gilbert Islands"));
        feature
            .properties
            .insert("amin".to_string(), serde_json::json!(-300.5));

        assert_eq!(feature.property_str("UNION"), Some("Gilbert Islands"));
        assert_eq!(feature.property_f64("amin"), Some(-300.5));
        assert_eq!(feature.property_str("amin"), None);
        assert_eq!(feature.property_f64("missing"), None);
    }
}
