#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Sketch/feature overlap-analysis pipeline.
//!
//! Normalizes sketch geometry at the antimeridian, fetches reference
//! features through spatially indexed range queries, de-duplicates results
//! across overlapping query boxes, and accumulates area/count/histogram
//! overlap statistics into [`Metric`](marine_plan_geoprocessing_models::Metric)
//! records with deterministic ordering.

pub mod antimeridian;
pub mod convert;
pub mod fetch;
pub mod geometry;
pub mod histogram;
pub mod metrics;
pub mod overlap;
pub mod sources;

use thiserror::Error;

/// Errors that can occur while loading reference features.
///
/// All variants are I/O or format failures; they propagate to the caller
/// without internal retries. An empty result set is not an error.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON parse error: {0}")]
    Geojson(#[from] geojson::Error),

    /// The dataset response was structurally unusable.
    #[error("Malformed dataset response: {message}")]
    Malformed {
        /// Description of what went wrong.
        message: String,
    },
}
