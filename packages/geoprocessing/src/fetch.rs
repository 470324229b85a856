//! Bounded feature fetching with de-duplication.
//!
//! Fetches reference features intersecting the bounding boxes of each
//! member sketch of a collection (or a single sketch). Overlapping member
//! bboxes, and large features spanning both halves of an antimeridian
//! split, make the same feature come back from multiple range queries; the
//! merged result is de-duplicated so downstream area and count sums never
//! double-count.

use std::collections::HashSet;

use futures::future::try_join_all;
use geo::MultiPolygon;
use marine_plan_geoprocessing_models::{Feature, SketchInput};

use crate::SourceError;
use crate::antimeridian::split_bbox_at_antimeridian;
use crate::geometry::bbox_of;
use crate::sources::VectorSource;

/// Loads the features intersecting the bounding boxes of each member
/// sketch, de-duplicated.
///
/// Each member's bbox is split at the antimeridian and one range query is
/// issued per sub-box; all queries run concurrently and are awaited
/// jointly. Identity for de-duplication is, in priority order: the
/// feature's own id, the value of `unique_id_property` when supplied, and a
/// hash of the coordinate sequence. First occurrence wins.
///
/// # Errors
///
/// Returns [`SourceError`] if any range query fails. An empty result is a
/// valid zero-match outcome.
pub async fn features_for_sketch_bboxes(
    sketch: &SketchInput,
    source: &dyn VectorSource,
    unique_id_property: Option<&str>,
) -> Result<Vec<Feature>, SourceError> {
    let batches = try_join_all(sketch.sketches().iter().map(|member| async move {
        let boxes = split_bbox_at_antimeridian(bbox_of(&member.geometry));
        let results = try_join_all(
            boxes
                .into_iter()
                .map(|sub_box| source.load_features_in_bbox(sub_box)),
        )
        .await?;
        Ok::<Vec<Feature>, SourceError>(results.into_iter().flatten().collect())
    }))
    .await?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut features = Vec::new();
    for feature in batches.into_iter().flatten() {
        if seen.insert(feature_identity(&feature, unique_id_property)) {
            features.push(feature);
        }
    }

    Ok(features)
}

/// Derives the de-duplication identity of a feature.
///
/// Falls back to a hash of the raw coordinate sequence when neither an id
/// nor the unique property is available. The hash conflates features that
/// are geometrically identical but differ in properties; callers that care
/// must supply `unique_id_property`.
#[must_use]
pub fn feature_identity(feature: &Feature, unique_id_property: Option<&str>) -> String {
    if let Some(id) = &feature.id {
        return id.clone();
    }

    if let Some(property) = unique_id_property {
        match feature.properties.get(property) {
            Some(serde_json::Value::String(value)) => return value.clone(),
            Some(value) if !value.is_null() => return value.to_string(),
            _ => {
                log::debug!(
                    "Feature missing unique id property '{property}', falling back to coordinate hash"
                );
            }
        }
    }

    coordinate_hash(&feature.geometry)
}

/// MD5 over the raw coordinate bit patterns, stable across runs.
fn coordinate_hash(geometry: &MultiPolygon<f64>) -> String {
    let mut bytes = Vec::new();
    for polygon in &geometry.0 {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            for coord in &ring.0 {
                bytes.extend_from_slice(&coord.x.to_bits().to_le_bytes());
                bytes.extend_from_slice(&coord.y.to_bits().to_le_bytes());
            }
        }
    }
    format!("{:x}", md5::compute(&bytes))
}

#[cfg(test)]
mod tests {
    use geo::polygon;
    use marine_plan_geoprocessing_models::{Sketch, SketchCollection};

    use super::*;
    use crate::sources::memory::MemorySource;

    fn square(min_x: f64, min_y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: min_x, y: min_y),
            (x: min_x + size, y: min_y),
            (x: min_x + size, y: min_y + size),
            (x: min_x, y: min_y + size),
            (x: min_x, y: min_y),
        ]])
    }

    fn feature_with_id(id: &str, geometry: MultiPolygon<f64>) -> Feature {
        let mut feature = Feature::new(geometry);
        feature.id = Some(id.to_string());
        feature
    }

    #[tokio::test]
    async fn overlapping_member_bboxes_yield_each_feature_once() {
        let source = MemorySource::from_features(vec![
            feature_with_id("shared", square(0.0, 0.0, 3.0)),
            feature_with_id("east", square(2.5, 0.0, 1.0)),
        ]);

        let collection = SketchInput::from(SketchCollection {
            id: "c1".to_string(),
            name: "overlapping".to_string(),
            sketches: vec![
                Sketch::new("s1", "one", square(0.0, 0.0, 2.0)),
                Sketch::new("s2", "two", square(1.0, 0.0, 2.0)),
            ],
        });

        let features = features_for_sketch_bboxes(&collection, &source, None)
            .await
            .unwrap();
        let mut ids: Vec<_> = features.iter().map(|f| f.id.clone().unwrap()).collect();
        ids.sort();
        assert_eq!(ids, vec!["east", "shared"]);
    }

    #[tokio::test]
    async fn antimeridian_crossing_sketch_queries_both_halves() {
        let source = MemorySource::from_features(vec![
            feature_with_id("west", square(-180.0, -5.0, 2.0)),
            feature_with_id("east", square(176.0, -5.0, 2.0)),
            feature_with_id("far", square(0.0, 0.0, 1.0)),
        ]);

        // Crossing sketch: bbox normalizes to min_x > max_x.
        let sketch = SketchInput::from(Sketch::new(
            "s1",
            "crossing",
            MultiPolygon(vec![polygon![
                (x: 177.0, y: -4.0),
                (x: 183.0, y: -4.0),
                (x: 183.0, y: -1.0),
                (x: 177.0, y: -1.0),
                (x: 177.0, y: -4.0),
            ]]),
        ));

        let features = features_for_sketch_bboxes(&sketch, &source, None)
            .await
            .unwrap();
        let mut ids: Vec<_> = features.iter().map(|f| f.id.clone().unwrap()).collect();
        ids.sort();
        assert_eq!(ids, vec!["east", "west"]);
    }

    #[tokio::test]
    async fn dedup_by_unique_property_when_id_missing() {
        let mut a = Feature::new(square(0.0, 0.0, 1.0));
        a.properties
            .insert("SeamountID".to_string(), serde_json::json!("sm-1"));
        let mut b = Feature::new(square(0.5, 0.0, 1.0));
        b.properties
            .insert("SeamountID".to_string(), serde_json::json!("sm-1"));

        let source = MemorySource::from_features(vec![a, b]);
        let sketch = SketchInput::from(Sketch::new("s1", "one", square(0.0, 0.0, 2.0)));

        let features = features_for_sketch_bboxes(&sketch, &source, Some("SeamountID"))
            .await
            .unwrap();
        assert_eq!(features.len(), 1);
    }

    #[tokio::test]
    async fn hash_fallback_conflates_identical_geometry() {
        // Known ambiguity: identical coordinates, different properties.
        let mut a = Feature::new(square(0.0, 0.0, 1.0));
        a.properties.insert("class".to_string(), serde_json::json!("reef"));
        let mut b = Feature::new(square(0.0, 0.0, 1.0));
        b.properties.insert("class".to_string(), serde_json::json!("rock"));

        let source = MemorySource::from_features(vec![a, b]);
        let sketch = SketchInput::from(Sketch::new("s1", "one", square(0.0, 0.0, 2.0)));

        let features = features_for_sketch_bboxes(&sketch, &source, None)
            .await
            .unwrap();
        assert_eq!(features.len(), 1);
    }

    #[test]
    fn identity_prefers_id_over_property_over_hash() {
        let mut feature = feature_with_id("f1", square(0.0, 0.0, 1.0));
        feature
            .properties
            .insert("gid".to_string(), serde_json::json!(42));

        assert_eq!(feature_identity(&feature, Some("gid")), "f1");

        feature.id = None;
        assert_eq!(feature_identity(&feature, Some("gid")), "42");

        let hashed = feature_identity(&feature, None);
        assert_eq!(hashed.len(), 32);
        assert_eq!(feature_identity(&feature, Some("missing")), hashed);
    }
}
