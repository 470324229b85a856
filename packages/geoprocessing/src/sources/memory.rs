//! In-memory spatially indexed vector source.
//!
//! Builds an R-tree over feature envelopes and answers bounding-box range
//! queries with envelope-intersection semantics, matching the behavior of
//! a `FlatGeobuf` spatial index. Used for embedded reference datasets and
//! tests.

use async_trait::async_trait;
use geo::BoundingRect;
use marine_plan_geoprocessing_models::{BBox, Feature};
use rstar::{AABB, RTree, RTreeObject};

use crate::SourceError;
use crate::convert::features_from_geojson_str;
use crate::sources::VectorSource;

/// A feature stored in the R-tree with its envelope and dataset position.
struct IndexedFeature {
    feature: Feature,
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedFeature {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// An in-memory dataset with an R-tree spatial index.
pub struct MemorySource {
    tree: RTree<IndexedFeature>,
}

impl MemorySource {
    /// Builds the index from a list of features.
    #[must_use]
    pub fn from_features(features: Vec<Feature>) -> Self {
        let entries = features
            .into_iter()
            .enumerate()
            .map(|(position, feature)| IndexedFeature {
                envelope: compute_envelope(&feature),
                feature,
                position,
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Builds the index from a `GeoJSON` `FeatureCollection` string.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the input is not a valid
    /// `FeatureCollection`.
    pub fn from_geojson_str(input: &str) -> Result<Self, SourceError> {
        Ok(Self::from_features(features_from_geojson_str(input)?))
    }

    /// Number of indexed features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the dataset is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[async_trait]
impl VectorSource for MemorySource {
    async fn load_features_in_bbox(&self, bbox: BBox) -> Result<Vec<Feature>, SourceError> {
        let query = AABB::from_corners([bbox[0], bbox[1]], [bbox[2], bbox[3]]);

        let mut matches: Vec<&IndexedFeature> = self
            .tree
            .locate_in_envelope_intersecting(&query)
            .collect();
        // R-tree iteration order is unspecified; restore dataset order so
        // repeated runs produce identical output.
        matches.sort_by_key(|entry| entry.position);

        Ok(matches.into_iter().map(|entry| entry.feature.clone()).collect())
    }
}

fn compute_envelope(feature: &Feature) -> AABB<[f64; 2]> {
    feature.geometry.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn square(id: &str, min_x: f64, min_y: f64, size: f64) -> Feature {
        let mut feature = Feature::new(geo::MultiPolygon(vec![polygon![
            (x: min_x, y: min_y),
            (x: min_x + size, y: min_y),
            (x: min_x + size, y: min_y + size),
            (x: min_x, y: min_y + size),
            (x: min_x, y: min_y),
        ]]));
        feature.id = Some(id.to_string());
        feature
    }

    #[tokio::test]
    async fn range_query_returns_intersecting_envelopes() {
        let source = MemorySource::from_features(vec![
            square("a", 0.0, 0.0, 1.0),
            square("b", 5.0, 5.0, 1.0),
            square("c", 0.5, 0.5, 1.0),
        ]);

        let hits = source
            .load_features_in_bbox([0.0, 0.0, 1.0, 1.0])
            .await
            .unwrap();
        let ids: Vec<_> = hits.iter().map(|f| f.id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn range_query_misses_return_empty() {
        let source = MemorySource::from_features(vec![square("a", 0.0, 0.0, 1.0)]);
        let hits = source
            .load_features_in_bbox([10.0, 10.0, 11.0, 11.0])
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn results_follow_dataset_order() {
        let source = MemorySource::from_features(vec![
            square("z", 0.0, 0.0, 1.0),
            square("a", 0.2, 0.2, 1.0),
            square("m", 0.4, 0.4, 1.0),
        ]);

        let hits = source
            .load_features_in_bbox([0.0, 0.0, 2.0, 2.0])
            .await
            .unwrap();
        let ids: Vec<_> = hits.iter().map(|f| f.id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }
}
