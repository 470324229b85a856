//! Sketch preprocessors: validate a drawn polygon, then clip it against
//! land and boundary datasets before it enters analysis.

use marine_plan_geoprocessing::geometry::bbox_of;
use marine_plan_geoprocessing::sources::VectorSource;
use marine_plan_geoprocessing_models::Feature;

use crate::ClipError;
use crate::ops::{ClipOperation, ClipOptions, clip_to_polygon_features};
use crate::validate::{ValidationOptions, ensure_valid_polygon};

/// Land pieces are stored subdivided; this property groups pieces of the
/// same landmass so they dissolve back together before clipping.
const LAND_UNION_PROPERTY: &str = "gid";

/// Size guidelines are advisory for preprocessors; only self-crossing is
/// rejected outright.
const fn preprocess_options() -> ValidationOptions {
    ValidationOptions {
        allow_self_crossing: false,
        min_size_sq_km: 1.0,
        enforce_min_size: false,
        max_size_sq_km: 500_000.0,
        enforce_max_size: false,
    }
}

/// Clips a drawn polygon to the portion on land.
///
/// # Errors
///
/// Returns [`ClipError`] when the polygon is invalid, the land dataset
/// cannot be loaded, or nothing of the polygon is on land.
pub async fn clip_to_land(
    feature: &Feature,
    land: &dyn VectorSource,
) -> Result<Feature, ClipError> {
    ensure_valid_polygon(&feature.geometry, &preprocess_options())?;

    let land_features = land
        .fetch_union(bbox_of(&feature.geometry), LAND_UNION_PROPERTY)
        .await?;
    let clipped = clip_to_polygon_features(
        &feature.geometry,
        &[ClipOperation::Intersection(land_features)],
        &ClipOptions::default(),
    )?;

    Ok(Feature {
        id: feature.id.clone(),
        geometry: clipped,
        properties: feature.properties.clone(),
    })
}

/// Clips a drawn polygon to the portion in the ocean by erasing land.
///
/// # Errors
///
/// Returns [`ClipError`] when the polygon is invalid, the land dataset
/// cannot be loaded, or the polygon is entirely on land.
pub async fn clip_to_ocean(
    feature: &Feature,
    land: &dyn VectorSource,
) -> Result<Feature, ClipError> {
    ensure_valid_polygon(&feature.geometry, &preprocess_options())?;

    let land_features = land
        .fetch_union(bbox_of(&feature.geometry), LAND_UNION_PROPERTY)
        .await?;
    let clipped = clip_to_polygon_features(
        &feature.geometry,
        &[ClipOperation::Difference(land_features)],
        &ClipOptions::default(),
    )?;

    Ok(Feature {
        id: feature.id.clone(),
        geometry: clipped,
        properties: feature.properties.clone(),
    })
}

/// Clips a drawn polygon to ocean waters inside the exclusive economic
/// zone: erases land, then keeps the portion inside the EEZ boundary.
///
/// # Errors
///
/// Returns [`ClipError`] when the polygon is invalid, a dataset cannot be
/// loaded, or nothing of the polygon lies in EEZ waters.
pub async fn clip_to_ocean_eez(
    feature: &Feature,
    land: &dyn VectorSource,
    eez: &dyn VectorSource,
) -> Result<Feature, ClipError> {
    ensure_valid_polygon(&feature.geometry, &preprocess_options())?;

    let bbox = bbox_of(&feature.geometry);
    let land_features = land.fetch_union(bbox, LAND_UNION_PROPERTY).await?;
    let eez_features = eez.load_features_in_bbox(bbox).await?;
    let clipped = clip_to_polygon_features(
        &feature.geometry,
        &[
            ClipOperation::Difference(land_features),
            ClipOperation::Intersection(eez_features),
        ],
        &ClipOptions::default(),
    )?;

    Ok(Feature {
        id: feature.id.clone(),
        geometry: clipped,
        properties: feature.properties.clone(),
    })
}
