//! Area report: sketch overlap with each EEZ island group.

use std::collections::HashMap;

use geo::{BooleanOps, MultiPolygon};
use marine_plan_geoprocessing::antimeridian::split_sketch_antimeridian;
use marine_plan_geoprocessing::geometry::area_sq_m;
use marine_plan_geoprocessing::overlap::union_geometry;
use marine_plan_geoprocessing_models::{Feature, SketchInput, WORLD_BBOX};
use marine_plan_reports_models::{AreaResults, GroupArea, SketchAreaResult};

use crate::{ReportContext, ReportError};

/// Property holding the island group name on EEZ boundary features.
const ISLAND_GROUP_PROPERTY: &str = "UNION";

/// Computes sketch area per island group of the exclusive economic zone.
///
/// Every member sketch is intersected with every island group boundary;
/// the per-group overlap is reported both in square meters and as a
/// fraction of the group's full area. The overall total uses the union of
/// the members so overlapping children are not counted twice.
///
/// # Errors
///
/// Returns [`ReportError`] when the EEZ datasource is broken or
/// unreachable, or the requested geography is unknown.
pub async fn area(
    sketch: &SketchInput,
    context: &ReportContext,
) -> Result<AreaResults, ReportError> {
    // Resolve the geography eagerly so an unknown id fails the invocation
    // even though island groups already partition the whole zone.
    let _ = context.geography()?;

    let normalized = split_sketch_antimeridian(sketch);

    let source = context.resolve_vector("eez")?;
    let groups = source
        .fetch_union(WORLD_BBOX, ISLAND_GROUP_PROPERTY)
        .await?;

    let group_totals: HashMap<&str, f64> = groups
        .iter()
        .filter_map(|group| {
            group
                .property_str(ISLAND_GROUP_PROPERTY)
                .map(|name| (name, area_sq_m(&group.geometry)))
        })
        .collect();
    let eez_area = group_totals.values().sum();

    let mut results = AreaResults {
        sketch_area: Vec::new(),
        total_area: 0.0,
        eez_area,
    };

    for member in normalized.sketches() {
        let mut entry = SketchAreaResult {
            sketch_name: member.name.clone(),
            area: 0.0,
            group_areas: group_overlaps(&member.geometry, &groups, &group_totals),
        };
        entry.area = entry.group_areas.iter().map(|group| group.area).sum();
        results.sketch_area.push(entry);
    }

    let union_overlaps = group_overlaps(&union_geometry(&normalized), &groups, &group_totals);
    results.total_area = union_overlaps.iter().map(|group| group.area).sum();

    Ok(results)
}

/// Overlap of one geometry with every named island group, sorted by group
/// name. Groups without the name property are skipped.
fn group_overlaps(
    geometry: &MultiPolygon<f64>,
    groups: &[Feature],
    group_totals: &HashMap<&str, f64>,
) -> Vec<GroupArea> {
    let mut overlaps: Vec<GroupArea> = groups
        .iter()
        .filter_map(|group| {
            let island_group = group.property_str(ISLAND_GROUP_PROPERTY)?;
            let clipped = geometry.intersection(&group.geometry);
            if clipped.0.is_empty() {
                return None;
            }
            let clipped_area = area_sq_m(&clipped);
            Some(GroupArea {
                island_group: island_group.to_string(),
                area: clipped_area,
                fraction_of_group: clipped_area / group_totals[island_group],
            })
        })
        .collect();

    overlaps.sort_by(|a, b| a.island_group.cmp(&b.island_group));
    overlaps
}
