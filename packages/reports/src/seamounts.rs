//! Seamounts report: distinct seamounts overlapped, peak depth range, and
//! habitat area as a fraction of the zone.

use std::collections::HashSet;

use geo::BooleanOps;
use marine_plan_geoprocessing::antimeridian::split_sketch_antimeridian;
use marine_plan_geoprocessing::fetch::features_for_sketch_bboxes;
use marine_plan_geoprocessing::geometry::area_sq_m;
use marine_plan_geoprocessing_models::SketchInput;
use marine_plan_reports_models::SeamountsResults;

use crate::geography::clip_to_geography;
use crate::{ReportContext, ReportError};

/// Property identifying a seamount across its polygon pieces.
const SEAMOUNT_ID_PROPERTY: &str = "SeamountID";

/// Property holding the signed depth of a seamount's peak.
const PEAK_DEPTH_PROPERTY: &str = "Peak_Depth";

/// Counts the distinct seamounts a sketch overlaps.
///
/// A single seamount may be stored as several polygon pieces sharing a
/// `SeamountID`; pieces are de-duplicated into one count while every
/// piece's intersected area still contributes. Peak depths are reported as
/// positive meters. The area fraction is computed against the injected
/// whole-zone total.
///
/// # Errors
///
/// Returns [`ReportError`] when the seamounts datasource or the requested
/// geography is broken or unreachable.
pub async fn seamounts(
    sketch: &SketchInput,
    context: &ReportContext,
) -> Result<SeamountsResults, ReportError> {
    let source = context.resolve_vector("seamounts")?;
    let geography = context.geography()?.clone();

    let normalized = split_sketch_antimeridian(sketch);
    let clipped_sketch = clip_to_geography(&normalized, &geography, context).await?;

    let mut results = SeamountsResults {
        count: 0,
        count_eez: context.project.precalc().eez_seamount_count,
        min_peak_depth: None,
        max_peak_depth: None,
        area: 0.0,
        fraction_of_eez: 0.0,
    };

    let mut seamount_ids: HashSet<String> = HashSet::new();
    let mut unknown_count: u64 = 0;

    for member in clipped_sketch.sketches() {
        let member_input = SketchInput::from(member.clone());
        let features = features_for_sketch_bboxes(&member_input, source.as_ref(), None).await?;

        for feature in &features {
            let piece = member.geometry.intersection(&feature.geometry);
            if piece.0.is_empty() {
                continue;
            }

            match feature.properties.get(SEAMOUNT_ID_PROPERTY) {
                Some(value) if !value.is_null() => {
                    let id = value
                        .as_str()
                        .map_or_else(|| value.to_string(), str::to_string);
                    seamount_ids.insert(id);
                }
                _ => unknown_count += 1,
            }

            results.area += area_sq_m(&piece) * 1e-6;

            if let Some(peak_depth) = feature.property_f64(PEAK_DEPTH_PROPERTY) {
                let peak_depth = peak_depth.abs();
                if results
                    .max_peak_depth
                    .is_none_or(|current| peak_depth > current)
                {
                    results.max_peak_depth = Some(peak_depth);
                }
                if results
                    .min_peak_depth
                    .is_none_or(|current| peak_depth < current)
                {
                    results.min_peak_depth = Some(peak_depth);
                }
            }
        }
    }

    if unknown_count > 0 {
        log::warn!("{unknown_count} intersected seamount pieces carry no {SEAMOUNT_ID_PROPERTY}");
    }

    results.count = seamount_ids.len() as u64;
    results.fraction_of_eez = results.area / context.project.precalc().eez_area_sq_km;

    Ok(results)
}
