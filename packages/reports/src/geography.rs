//! Scoping a sketch to a geography boundary.

use geo::BooleanOps;
use marine_plan_geoprocessing::fetch::features_for_sketch_bboxes;
use marine_plan_geoprocessing::geometry::union_all;
use marine_plan_geoprocessing_models::{SketchCollection, SketchInput};
use marine_plan_project_models::Geography;

use crate::{ReportContext, ReportError};

/// Clips a sketch to the boundary features of a geography.
///
/// A geography without a datasource applies no clipping; the sketch comes
/// back unchanged. Otherwise every member sketch is intersected with the
/// union of the geography's features; collection children left with no
/// geometry are dropped.
///
/// The sketch must already be antimeridian-normalized.
///
/// # Errors
///
/// Returns [`ReportError`] when the geography's datasource is broken or
/// its features cannot be loaded.
pub async fn clip_to_geography(
    sketch: &SketchInput,
    geography: &Geography,
    context: &ReportContext,
) -> Result<SketchInput, ReportError> {
    let Some(datasource_id) = geography.datasource_id.as_deref() else {
        return Ok(sketch.clone());
    };

    let source = context.resolve_vector(datasource_id)?;
    let features = features_for_sketch_bboxes(sketch, source.as_ref(), None).await?;
    if features.is_empty() {
        log::warn!(
            "Geography '{}' has no boundary features near the sketch",
            geography.geography_id
        );
    }
    let boundary = union_all(features.iter().map(|feature| &feature.geometry));

    Ok(match sketch {
        SketchInput::Single(member) => {
            let mut clipped = member.clone();
            clipped.geometry = member.geometry.intersection(&boundary);
            SketchInput::Single(clipped)
        }
        SketchInput::Collection(collection) => {
            let sketches = collection
                .sketches
                .iter()
                .filter_map(|member| {
                    let mut clipped = member.clone();
                    clipped.geometry = member.geometry.intersection(&boundary);
                    if clipped.geometry.0.is_empty() {
                        None
                    } else {
                        Some(clipped)
                    }
                })
                .collect();
            SketchInput::Collection(SketchCollection {
                id: collection.id.clone(),
                name: collection.name.clone(),
                sketches,
            })
        }
    })
}
