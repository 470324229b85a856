//! Depth report: area-weighted depth profile from bathymetry contours.

use geo::BooleanOps;
use marine_plan_geoprocessing::antimeridian::split_sketch_antimeridian;
use marine_plan_geoprocessing::fetch::features_for_sketch_bboxes;
use marine_plan_geoprocessing::geometry::area_sq_m;
use marine_plan_geoprocessing::histogram::{fill_bins, make_bins, weighted_mean};
use marine_plan_geoprocessing_models::SketchInput;
use marine_plan_reports_models::{DepthBin, DepthResults};

use crate::{ReportContext, ReportError};

/// Histogram range and resolution over absolute depth in meters.
const BIN_MIN: f64 = 0.0;
const BIN_MAX: f64 = 7000.0;
const BIN_STEP: f64 = 100.0;

/// Computes the sketch's depth profile from bathymetry contour features.
///
/// Each contour carries signed `amin`/`amax` depth bounds; intersected
/// area accumulates into 100 m bins over the absolute depth range, and the
/// mean is area-weighted over the bins. A sketch overlapping no contour
/// yields absent min/max/mean and an all-zero histogram.
///
/// # Errors
///
/// Returns [`ReportError`] when the bathymetry datasource is broken or
/// unreachable.
pub async fn depth(
    sketch: &SketchInput,
    context: &ReportContext,
) -> Result<DepthResults, ReportError> {
    let source = context.resolve_vector("bathy")?;
    let normalized = split_sketch_antimeridian(sketch);

    let contours = features_for_sketch_bboxes(&normalized, source.as_ref(), None).await?;

    let mut bins = make_bins(BIN_MIN, BIN_MAX, BIN_STEP);
    let mut min_depth: Option<f64> = None;
    let mut max_depth: Option<f64> = None;

    for member in normalized.sketches() {
        for contour in &contours {
            let clipped = member.geometry.intersection(&contour.geometry);
            if clipped.0.is_empty() {
                continue;
            }

            let (Some(amin), Some(amax)) = (
                contour.property_f64("amin"),
                contour.property_f64("amax"),
            ) else {
                // Data anomaly, not fatal: the contour is ignored.
                log::debug!("Skipping bathymetry contour without amin/amax bounds");
                continue;
            };

            let shallow = amin.abs();
            let deep = shallow.max(amax.abs());
            fill_bins(&mut bins, shallow, amax.abs(), area_sq_m(&clipped));

            if min_depth.is_none_or(|current| shallow < current) {
                min_depth = Some(shallow);
            }
            if max_depth.is_none_or(|current| deep > current) {
                max_depth = Some(deep);
            }
        }
    }

    Ok(DepthResults {
        min_depth,
        max_depth,
        mean_depth: weighted_mean(&bins),
        histogram: bins
            .into_iter()
            .map(|bin| DepthBin {
                min: bin.min,
                area: bin.value,
            })
            .collect(),
    })
}
