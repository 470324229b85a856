//! HTTP `GeoJSON` vector source.
//!
//! Queries an endpoint that filters a dataset by a `bbox` query parameter
//! and returns a `GeoJSON` `FeatureCollection`.

use async_trait::async_trait;
use marine_plan_geoprocessing_models::{BBox, Feature};

use crate::SourceError;
use crate::convert::features_from_geojson_str;
use crate::sources::VectorSource;

/// A remote dataset behind a bbox-filtered `GeoJSON` endpoint.
#[derive(Debug, Clone)]
pub struct GeojsonUrlSource {
    client: reqwest::Client,
    url: String,
}

impl GeojsonUrlSource {
    /// Creates a source for the given endpoint URL.
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl VectorSource for GeojsonUrlSource {
    async fn load_features_in_bbox(&self, bbox: BBox) -> Result<Vec<Feature>, SourceError> {
        let url = format!(
            "{}?bbox={},{},{},{}",
            self.url, bbox[0], bbox[1], bbox[2], bbox[3]
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Malformed {
                message: format!("Feature request failed with status {}", response.status()),
            });
        }
        let body = response.text().await?;

        let features = features_from_geojson_str(&body)?;
        log::debug!("Loaded {} features from {}", features.len(), self.url);
        Ok(features)
    }
}
