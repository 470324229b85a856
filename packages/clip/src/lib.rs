#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Sketch preprocessors.
//!
//! Validates user-drawn polygons before analysis and clips them against
//! land masks and EEZ boundaries. The validation messages are user-facing
//! UI contract strings; changing them breaks the report clients.

pub mod ops;
pub mod preprocess;
pub mod validate;

use thiserror::Error;

/// A polygon failed validation or clipping. Fatal for the invocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Input has no polygonal geometry.
    #[error("Input must be a polygon")]
    NotAPolygon,

    /// A ring of the polygon intersects itself.
    #[error("Your sketch polygon crosses itself")]
    SelfCrossing,

    /// The polygon is below the minimum allowed size.
    #[error("Shapes should be at least {min_sq_m} square meters in size")]
    TooSmall {
        /// Minimum size in square meters.
        min_sq_m: u64,
    },

    /// The polygon is above the maximum allowed size.
    #[error("Shapes should be no more than {max_sq_km} square km in size")]
    TooLarge {
        /// Maximum size in square kilometers, thousands-separated.
        max_sq_km: String,
    },

    /// Clipping left nothing inside the boundary.
    #[error("Feature is outside of boundary")]
    OutsideBoundary,
}

/// Errors that can occur while preprocessing a sketch.
#[derive(Debug, Error)]
pub enum ClipError {
    /// The polygon is invalid or fell entirely outside the boundary.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Loading the land/boundary mask failed.
    #[error(transparent)]
    Source(#[from] marine_plan_geoprocessing::SourceError),
}
