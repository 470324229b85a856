//! Shared geometry helpers: bounding boxes, geodesic area, unions.

use geo::{BooleanOps, BoundingRect, GeodesicArea, MultiPolygon, Polygon, Rect, coord};
use marine_plan_geoprocessing_models::BBox;

/// Computes the `[min_x, min_y, max_x, max_y]` bounding box of a
/// multipolygon. An empty geometry yields a degenerate box at the origin.
#[must_use]
pub fn bbox_of(geometry: &MultiPolygon<f64>) -> BBox {
    geometry.bounding_rect().map_or([0.0, 0.0, 0.0, 0.0], |rect| {
        [rect.min().x, rect.min().y, rect.max().x, rect.max().y]
    })
}

/// Converts a bounding box to a rectangle polygon.
#[must_use]
pub fn bbox_polygon(bbox: BBox) -> Polygon<f64> {
    Rect::new(
        coord! { x: bbox[0], y: bbox[1] },
        coord! { x: bbox[2], y: bbox[3] },
    )
    .to_polygon()
}

/// Geodesic (ellipsoidal) area of a multipolygon in square meters.
#[must_use]
pub fn area_sq_m(geometry: &MultiPolygon<f64>) -> f64 {
    geometry.geodesic_area_unsigned()
}

/// Dissolves multiple multipolygons into one.
#[must_use]
pub fn union_all<'a>(geometries: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> MultiPolygon<f64> {
    let mut merged = MultiPolygon::<f64>(Vec::new());
    for geometry in geometries {
        if merged.0.is_empty() {
            merged = geometry.clone();
        } else {
            merged = merged.union(geometry);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn square(min_x: f64, min_y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: min_x, y: min_y),
            (x: min_x + size, y: min_y),
            (x: min_x + size, y: min_y + size),
            (x: min_x, y: min_y + size),
            (x: min_x, y: min_y),
        ]])
    }

    #[test]
    fn bbox_covers_all_members() {
        let mut geometry = square(0.0, 0.0, 1.0);
        geometry.0.extend(square(5.0, 3.0, 2.0).0);
        assert_eq!(bbox_of(&geometry), [0.0, 0.0, 7.0, 5.0]);
    }

    #[test]
    fn bbox_of_empty_geometry_is_degenerate() {
        assert_eq!(bbox_of(&MultiPolygon(Vec::new())), [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn equatorial_degree_square_area_is_plausible() {
        // 1°×1° at the equator is roughly 110.6 km × 110.6 km.
        let area = area_sq_m(&square(0.0, 0.0, 1.0));
        assert!(area > 1.2e10 && area < 1.25e10, "got {area}");
    }

    #[test]
    fn union_of_overlapping_squares_is_smaller_than_sum() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.5, 0.0, 1.0);
        let merged = union_all([&a, &b]);

        let sum = area_sq_m(&a) + area_sq_m(&b);
        let union_area = area_sq_m(&merged);
        assert!(union_area < sum);
        assert!(union_area > area_sq_m(&a));
    }

    #[test]
    fn union_of_nothing_is_empty() {
        assert!(union_all([]).0.is_empty());
    }
}
