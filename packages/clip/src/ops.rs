//! Ordered polygon clip operations.

use geo::{BooleanOps, MultiPolygon};
use marine_plan_geoprocessing::geometry::{area_sq_m, union_all};
use marine_plan_geoprocessing_models::Feature;

use crate::ValidationError;

/// One clip step: keep or erase the union of a set of clip features.
#[derive(Debug, Clone)]
pub enum ClipOperation {
    /// Keep the portion inside the clip features.
    Intersection(Vec<Feature>),
    /// Erase the portion inside the clip features.
    Difference(Vec<Feature>),
}

/// Options for [`clip_to_polygon_features`].
#[derive(Debug, Clone, Copy)]
pub struct ClipOptions {
    /// When clipping yields several disjoint polygons, keep only the
    /// largest.
    pub ensure_polygon: bool,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            ensure_polygon: true,
        }
    }
}

/// Executes clip operations in order against a geometry.
///
/// # Errors
///
/// Returns [`ValidationError::OutsideBoundary`] when nothing of the
/// geometry survives the clip sequence.
pub fn clip_to_polygon_features(
    geometry: &MultiPolygon<f64>,
    operations: &[ClipOperation],
    options: &ClipOptions,
) -> Result<MultiPolygon<f64>, ValidationError> {
    let mut clipped = geometry.clone();

    for operation in operations {
        clipped = match operation {
            ClipOperation::Intersection(features) => {
                let mask = union_all(features.iter().map(|f| &f.geometry));
                clipped.intersection(&mask)
            }
            ClipOperation::Difference(features) => {
                let mask = union_all(features.iter().map(|f| &f.geometry));
                if mask.0.is_empty() {
                    clipped
                } else {
                    clipped.difference(&mask)
                }
            }
        };
    }

    if clipped.0.is_empty() || area_sq_m(&clipped) == 0.0 {
        return Err(ValidationError::OutsideBoundary);
    }

    if options.ensure_polygon && clipped.0.len() > 1 {
        log::debug!(
            "Clip produced {} disjoint parts, keeping the largest",
            clipped.0.len()
        );
        clipped = keep_largest(clipped);
    }

    Ok(clipped)
}

/// Keeps the largest polygon of a multipolygon.
fn keep_largest(geometry: MultiPolygon<f64>) -> MultiPolygon<f64> {
    let largest = geometry
        .0
        .into_iter()
        .max_by(|a, b| {
            let area_a = area_sq_m(&MultiPolygon(vec![a.clone()]));
            let area_b = area_sq_m(&MultiPolygon(vec![b.clone()]));
            area_a.total_cmp(&area_b)
        })
        .into_iter()
        .collect();
    MultiPolygon(largest)
}
