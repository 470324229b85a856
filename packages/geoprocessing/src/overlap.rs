//! Overlap accumulation: feature-against-sketch intersection areas.

use geo::{BooleanOps, MultiPolygon};
use marine_plan_geoprocessing_models::{Feature, Metric, SketchInput};

use crate::geometry::{area_sq_m, union_all};

/// Accumulated overlap of a feature set against one geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapResult {
    /// Total intersected area in square meters.
    pub area: f64,
    /// Number of features with a non-empty intersection.
    pub count: usize,
}

/// Intersects every feature with the geometry and accumulates area and
/// count. Features whose intersection is empty contribute zero.
///
/// The geometry must already be antimeridian-normalized.
#[must_use]
pub fn overlap(features: &[Feature], geometry: &MultiPolygon<f64>) -> OverlapResult {
    let mut area = 0.0;
    let mut count = 0;

    for feature in features {
        let clipped = geometry.intersection(&feature.geometry);
        if !clipped.0.is_empty() {
            area += area_sq_m(&clipped);
            count += 1;
        }
    }

    OverlapResult { area, count }
}

/// Union of all member geometries; the effective geometry of a collection
/// for area purposes.
#[must_use]
pub fn union_geometry(sketch: &SketchInput) -> MultiPolygon<f64> {
    union_all(sketch.sketches().iter().map(|member| &member.geometry))
}

/// Computes one area metric per member sketch, plus a collection-level
/// metric over the union of the members so overlapping children are not
/// double-counted.
#[must_use]
pub fn overlap_features(
    metric_id: &str,
    features: &[Feature],
    sketch: &SketchInput,
) -> Vec<Metric> {
    let mut metrics: Vec<Metric> = sketch
        .sketches()
        .iter()
        .map(|member| Metric {
            metric_id: metric_id.to_string(),
            class_id: None,
            sketch_id: Some(member.id.clone()),
            geography_id: None,
            value: overlap(features, &member.geometry).area,
        })
        .collect();

    if sketch.is_collection() {
        metrics.push(Metric {
            metric_id: metric_id.to_string(),
            class_id: None,
            sketch_id: Some(sketch.id().to_string()),
            geography_id: None,
            value: overlap(features, &union_geometry(sketch)).area,
        });
    }

    metrics
}
