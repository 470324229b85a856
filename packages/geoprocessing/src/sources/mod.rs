//! Reference dataset access.
//!
//! A [`VectorSource`] is a spatially indexed feature store queryable by
//! bounding box, in the manner of a `FlatGeobuf` index: a range query
//! returns every feature whose envelope intersects the box. Sources are the
//! only suspension points of the pipeline; geometry math never yields.

pub mod geojson_url;
pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use marine_plan_geoprocessing_models::{BBox, Feature};

use crate::SourceError;
use crate::geometry::union_all;

/// A spatially indexed vector dataset queryable by bounding box.
#[async_trait]
pub trait VectorSource: Send + Sync {
    /// Loads every feature whose envelope intersects the bounding box.
    ///
    /// An empty result is a valid zero-match outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the dataset is unreachable or malformed.
    async fn load_features_in_bbox(&self, bbox: BBox) -> Result<Vec<Feature>, SourceError>;

    /// Loads features in the bounding box and dissolves them by a grouping
    /// property.
    ///
    /// Land masks are stored subdivided for indexing; dissolving on a
    /// shared property (one value per country) re-unions the pieces and
    /// prevents clip slivers. Features missing the property pass through
    /// undissolved.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the underlying range query fails.
    async fn fetch_union(
        &self,
        bbox: BBox,
        union_property: &str,
    ) -> Result<Vec<Feature>, SourceError> {
        let features = self.load_features_in_bbox(bbox).await?;
        Ok(union_by_property(features, union_property))
    }
}

/// Dissolves features sharing a property value into one feature per value,
/// preserving first-seen order. The merged feature keeps the properties of
/// the first piece.
#[must_use]
pub fn union_by_property(features: Vec<Feature>, property: &str) -> Vec<Feature> {
    let mut grouped: Vec<Feature> = Vec::new();
    let mut index_by_value: HashMap<String, usize> = HashMap::new();

    for feature in features {
        let Some(value) = feature.properties.get(property).filter(|v| !v.is_null()) else {
            grouped.push(feature);
            continue;
        };
        let value = value
            .as_str()
            .map_or_else(|| value.to_string(), str::to_string);

        if let Some(&index) = index_by_value.get(&value) {
            grouped[index].geometry = union_all([&grouped[index].geometry, &feature.geometry]);
        } else {
            index_by_value.insert(value, grouped.len());
            grouped.push(feature);
        }
    }

    grouped
}
