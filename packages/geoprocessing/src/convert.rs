//! `GeoJSON` conversion for reference features.
//!
//! Reference datasets arrive as `GeoJSON` `FeatureCollection`s; only
//! `Polygon` and `MultiPolygon` geometries are meaningful for overlap
//! analysis, so other geometry types are skipped with a warning.

use geo::MultiPolygon;
use marine_plan_geoprocessing_models::Feature;

use crate::SourceError;

/// Parses a `GeoJSON` `FeatureCollection` string into features.
///
/// Features without polygonal geometry are skipped.
///
/// # Errors
///
/// Returns [`SourceError`] if the input is not a valid `GeoJSON`
/// `FeatureCollection`.
pub fn features_from_geojson_str(input: &str) -> Result<Vec<Feature>, SourceError> {
    let geojson: geojson::GeoJson = input.parse()?;
    let geojson::GeoJson::FeatureCollection(collection) = geojson else {
        return Err(SourceError::Malformed {
            message: "Expected a GeoJSON FeatureCollection".to_string(),
        });
    };

    Ok(collection
        .features
        .into_iter()
        .filter_map(feature_from_geojson)
        .collect())
}

/// Converts a `GeoJSON` feature into a [`Feature`], normalizing `Polygon`
/// geometry to a single-member [`MultiPolygon`]. Returns `None` for
/// non-polygonal or missing geometry.
#[must_use]
pub fn feature_from_geojson(feature: geojson::Feature) -> Option<Feature> {
    let id = match &feature.id {
        Some(geojson::feature::Id::String(s)) => Some(s.clone()),
        Some(geojson::feature::Id::Number(n)) => Some(n.to_string()),
        None => None,
    };

    let Some(geometry) = feature.geometry else {
        return None;
    };
    let Some(geometry) = multipolygon_from_geojson(geometry) else {
        log::warn!("Skipping feature with non-polygonal geometry (id {id:?})");
        return None;
    };

    Some(Feature {
        id,
        geometry,
        properties: feature.properties.unwrap_or_default(),
    })
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
#[must_use]
pub fn multipolygon_from_geojson(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geometry: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geometry {
        geo::Geometry::MultiPolygon(multi) => Some(multi),
        geo::Geometry::Polygon(polygon) => Some(MultiPolygon(vec![polygon])),
        _ => None,
    }
}
