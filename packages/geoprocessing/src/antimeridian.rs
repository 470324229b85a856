//! Antimeridian normalization for bounding boxes and sketch geometry.
//!
//! Bounding boxes and polygons that cross the ±180° longitude line are
//! split into two non-crossing parts so downstream range queries and
//! intersections never span the discontinuity. All operations are pure and
//! idempotent: splitting an already-non-crossing input returns it unchanged
//! up to longitude normalization.

use geo::{BooleanOps, LineString, MapCoords, MultiPolygon, Polygon, Rect, coord};
use marine_plan_geoprocessing_models::{BBox, Sketch, SketchInput};

/// Normalizes a longitude into `[-180, 180]` via modulo arithmetic.
#[must_use]
pub fn normalize_lon(x: f64) -> f64 {
    ((x + 180.0) % 360.0 + 360.0) % 360.0 - 180.0
}

/// Splits a bounding box at the antimeridian if it crosses it.
///
/// A crossing box (normalized `min_x > max_x`) yields an eastern-hemisphere
/// part `[min_x, min_y, 180, max_y]` and a western-hemisphere part
/// `[-180, min_y, max_x, max_y]`. A non-crossing box is returned alone,
/// normalized.
#[must_use]
pub fn split_bbox_at_antimeridian(bbox: BBox) -> Vec<BBox> {
    let [min_x, min_y, max_x, max_y] = bbox;
    let norm_min_x = normalize_lon(min_x);
    // An eastern edge at exactly 180 must stay 180; wrapping it to -180
    // would turn a full-width box (the bbox of already-split geometry)
    // into a degenerate crossing one.
    let norm_max_x = if max_x == 180.0 {
        180.0
    } else {
        normalize_lon(max_x)
    };

    if norm_min_x > norm_max_x {
        vec![
            [norm_min_x, min_y, 180.0, max_y],
            [-180.0, min_y, norm_max_x, max_y],
        ]
    } else {
        vec![[norm_min_x, min_y, norm_max_x, max_y]]
    }
}

/// Splits every antimeridian-crossing polygon of a multipolygon into a
/// western and an eastern part.
///
/// Consumers needing true geometric intersection must operate on the split
/// geometry, not the original.
#[must_use]
pub fn split_multipolygon_antimeridian(geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    let mut parts: Vec<Polygon<f64>> = Vec::new();

    for polygon in &geometry.0 {
        let normalized = polygon.map_coords(|c| coord! { x: normalize_ring_lon(c.x), y: c.y });

        if ring_crosses_antimeridian(normalized.exterior()) {
            // Work in a continuous [0, 360) frame, then clip each side of
            // the 180° meridian back into [-180, 180].
            let shifted = normalized.map_coords(|c| {
                if c.x < 0.0 {
                    coord! { x: c.x + 360.0, y: c.y }
                } else {
                    c
                }
            });

            let west = Rect::new(coord! { x: 0.0, y: -90.0 }, coord! { x: 180.0, y: 90.0 });
            let east = Rect::new(coord! { x: 180.0, y: -90.0 }, coord! { x: 360.0, y: 90.0 });

            let shifted = MultiPolygon(vec![shifted]);
            parts.extend(shifted.intersection(&MultiPolygon(vec![west.to_polygon()])).0);
            parts.extend(
                shifted
                    .intersection(&MultiPolygon(vec![east.to_polygon()]))
                    .map_coords(|c| coord! { x: c.x - 360.0, y: c.y })
                    .0,
            );
        } else {
            parts.push(normalized);
        }
    }

    MultiPolygon(parts)
}

/// Splits the geometry of every member sketch at the antimeridian.
#[must_use]
pub fn split_sketch_antimeridian(sketch: &SketchInput) -> SketchInput {
    match sketch {
        SketchInput::Single(member) => SketchInput::Single(split_member(member)),
        SketchInput::Collection(collection) => {
            let mut split = collection.clone();
            split.sketches = collection.sketches.iter().map(split_member).collect();
            SketchInput::Collection(split)
        }
    }
}

fn split_member(sketch: &Sketch) -> Sketch {
    let mut split = sketch.clone();
    split.geometry = split_multipolygon_antimeridian(&sketch.geometry);
    split
}

/// Ring coordinates keep 180 as-is so an eastern edge touching the
/// antimeridian does not flip to -180 and fake a crossing.
fn normalize_ring_lon(x: f64) -> f64 {
    if x == 180.0 { 180.0 } else { normalize_lon(x) }
}

/// A ring crosses the antimeridian when two consecutive normalized
/// longitudes jump by more than 180°.
fn ring_crosses_antimeridian(ring: &LineString<f64>) -> bool {
    ring.0
        .windows(2)
        .any(|pair| (pair[1].x - pair[0].x).abs() > 180.0)
}

#[cfg(test)]
mod tests {
    use geo::polygon;
    use marine_plan_geoprocessing_models::WORLD_BBOX;

    use super::*;
    use crate::geometry::{area_sq_m, bbox_of};

    #[test]
    fn crossing_bbox_splits_into_two_parts() {
        let split = split_bbox_at_antimeridian([170.0, -10.0, -170.0, 10.0]);
        assert_eq!(
            split,
            vec![[170.0, -10.0, 180.0, 10.0], [-180.0, -10.0, -170.0, 10.0]]
        );
    }

    #[test]
    fn non_crossing_bbox_is_unchanged() {
        let split = split_bbox_at_antimeridian([10.0, -10.0, 20.0, 10.0]);
        assert_eq!(split, vec![[10.0, -10.0, 20.0, 10.0]]);
    }

    #[test]
    fn split_is_idempotent_for_non_crossing_boxes() {
        for bbox in [
            [10.0, -10.0, 20.0, 10.0],
            [-179.0, -10.0, -170.0, 10.0],
            [170.0, -10.0, 179.0, 10.0],
            WORLD_BBOX,
        ] {
            let once = split_bbox_at_antimeridian(bbox);
            assert_eq!(once.len(), 1);
            assert_eq!(split_bbox_at_antimeridian(once[0]), once);
        }
    }

    #[test]
    fn full_width_bbox_keeps_its_eastern_edge() {
        // The bbox of already-split crossing geometry spans -180..180; it
        // must come back as one full-width box, not collapse at -180.
        let split = split_bbox_at_antimeridian([-180.0, -10.0, 180.0, 10.0]);
        assert_eq!(split, vec![[-180.0, -10.0, 180.0, 10.0]]);
    }

    #[test]
    fn bbox_touching_the_antimeridian_from_the_east_does_not_split() {
        let split = split_bbox_at_antimeridian([170.0, -10.0, 180.0, 10.0]);
        assert_eq!(split, vec![[170.0, -10.0, 180.0, 10.0]]);
    }

    #[test]
    fn out_of_range_longitudes_are_normalized() {
        let split = split_bbox_at_antimeridian([190.0, -10.0, 200.0, 10.0]);
        assert_eq!(split, vec![[-170.0, -10.0, -160.0, 10.0]]);
    }

    #[test]
    fn crossing_polygon_splits_into_both_hemispheres() {
        let crossing = MultiPolygon(vec![polygon![
            (x: 170.0, y: -10.0),
            (x: -170.0, y: -10.0),
            (x: -170.0, y: 10.0),
            (x: 170.0, y: 10.0),
            (x: 170.0, y: -10.0),
        ]]);

        let split = split_multipolygon_antimeridian(&crossing);
        assert_eq!(split.0.len(), 2);

        let bbox = bbox_of(&split);
        assert!(bbox[0] >= -180.0 && bbox[2] <= 180.0);

        // No part straddles the discontinuity anymore.
        for part in &split.0 {
            assert!(!ring_crosses_antimeridian(part.exterior()));
        }
    }

    #[test]
    fn splitting_preserves_area() {
        let crossing = MultiPolygon(vec![polygon![
            (x: 175.0, y: -5.0),
            (x: -175.0, y: -5.0),
            (x: -175.0, y: 5.0),
            (x: 175.0, y: 5.0),
            (x: 175.0, y: -5.0),
        ]]);

        let split = split_multipolygon_antimeridian(&crossing);
        let shifted_whole = MultiPolygon(vec![polygon![
            (x: 175.0, y: -5.0),
            (x: 185.0, y: -5.0),
            (x: 185.0, y: 5.0),
            (x: 175.0, y: 5.0),
            (x: 175.0, y: -5.0),
        ]]);

        // Geodesic edges of the 10°-wide quad do not follow parallels, so
        // the two clipped halves differ slightly from the unsplit shape.
        let split_area = area_sq_m(&split);
        let whole_area = area_sq_m(&shifted_whole);
        assert!((split_area - whole_area).abs() / whole_area < 1e-2);
    }

    #[test]
    fn non_crossing_polygon_is_unchanged() {
        let plain = MultiPolygon(vec![polygon![
            (x: 10.0, y: 0.0),
            (x: 11.0, y: 0.0),
            (x: 11.0, y: 1.0),
            (x: 10.0, y: 1.0),
            (x: 10.0, y: 0.0),
        ]]);

        let split = split_multipolygon_antimeridian(&plain);
        assert_eq!(split, plain);
    }
}
