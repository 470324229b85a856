//! Polygon validation: self-crossing detection and size guidelines.

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{Line, LineString, MultiPolygon};
use marine_plan_geoprocessing::geometry::area_sq_m;
use marine_plan_geoprocessing_models::Feature;

use crate::ValidationError;

/// Validation thresholds. Sizes are in square kilometers.
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    /// Whether self-crossing rings are tolerated.
    pub allow_self_crossing: bool,
    /// Minimum polygon size in square kilometers.
    pub min_size_sq_km: f64,
    /// Whether the minimum size is enforced.
    pub enforce_min_size: bool,
    /// Maximum polygon size in square kilometers.
    pub max_size_sq_km: f64,
    /// Whether the maximum size is enforced.
    pub enforce_max_size: bool,
}

impl Default for ValidationOptions {
    /// Sketch-class defaults: 100 m² minimum, 1,000,000 km² maximum, no
    /// self-crossing.
    fn default() -> Self {
        Self {
            allow_self_crossing: false,
            min_size_sq_km: 0.0001,
            enforce_min_size: true,
            max_size_sq_km: 1_000_000.0,
            enforce_max_size: true,
        }
    }
}

/// Checks a polygon against the validation options.
///
/// # Errors
///
/// Returns the specific [`ValidationError`] describing the first failed
/// check; the messages are UI contract strings.
pub fn ensure_valid_polygon(
    geometry: &MultiPolygon<f64>,
    options: &ValidationOptions,
) -> Result<(), ValidationError> {
    if geometry.0.is_empty() {
        return Err(ValidationError::NotAPolygon);
    }

    if !options.allow_self_crossing && multipolygon_crosses_itself(geometry) {
        return Err(ValidationError::SelfCrossing);
    }

    let area = area_sq_m(geometry);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    if options.enforce_min_size && area < options.min_size_sq_km * 1e6 {
        return Err(ValidationError::TooSmall {
            min_sq_m: (options.min_size_sq_km * 1e6).round() as u64,
        });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    if options.enforce_max_size && area > options.max_size_sq_km * 1e6 {
        return Err(ValidationError::TooLarge {
            max_sq_km: format_thousands(options.max_size_sq_km.round() as u64),
        });
    }

    Ok(())
}

/// Validates a sketch polygon against the default size guidelines and
/// returns it without modification.
///
/// # Errors
///
/// Returns [`ValidationError`] when the polygon is self-crossing, smaller
/// than 100 m², or larger than 1,000,000 km².
pub fn validate_polygon(feature: &Feature) -> Result<Feature, ValidationError> {
    ensure_valid_polygon(&feature.geometry, &ValidationOptions::default())?;
    Ok(feature.clone())
}

fn multipolygon_crosses_itself(geometry: &MultiPolygon<f64>) -> bool {
    geometry.0.iter().any(|polygon| {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .any(ring_crosses_itself)
    })
}

/// Pairwise proper-intersection test over non-adjacent ring segments.
/// Quadratic, but sketch rings are small.
fn ring_crosses_itself(ring: &LineString<f64>) -> bool {
    let segments: Vec<Line<f64>> = ring.lines().collect();
    let count = segments.len();

    for i in 0..count {
        for j in (i + 1)..count {
            // Adjacent segments share an endpoint, including the
            // first/last wrap-around pair.
            if j == i + 1 || (i == 0 && j == count - 1) {
                continue;
            }
            match line_intersection(segments[i], segments[j]) {
                Some(LineIntersection::SinglePoint { .. } | LineIntersection::Collinear { .. }) => {
                    return true;
                }
                None => {}
            }
        }
    }

    false
}

fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
