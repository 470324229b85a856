#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Report functions.
//!
//! Each report orchestrates the overlap-analysis pipeline for one kind of
//! question: how much area a sketch covers per island group, its depth
//! profile, the seamounts it touches, and its overlap with habitat classes.
//! Every invocation builds its state fresh, fails wholesale on error or
//! timeout, and returns a typed serializable payload.

pub mod area;
pub mod context;
pub mod depth;
pub mod geography;
pub mod habitat;
pub mod seamounts;

use std::time::Duration;

use marine_plan_geoprocessing::SourceError;
use marine_plan_project::ProjectError;
use thiserror::Error;

pub use crate::context::{HttpSourceResolver, ReportContext, SourceResolver, StaticSourceResolver};

/// A report invocation failed. Always terminal; there is no partial or
/// degraded success mode.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The project registry is broken (missing datasource, wrong kind).
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// A reference dataset could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The invocation exceeded its overall deadline.
    #[error("Analysis timed out after {seconds}s")]
    Timeout {
        /// The deadline that was exceeded, in seconds.
        seconds: u64,
    },
}

/// Runs a report under an overall deadline. On timeout the invocation
/// fails wholesale; no partial result is salvaged.
///
/// # Errors
///
/// Returns [`ReportError::Timeout`] when the deadline elapses, or the
/// report's own error when it fails first.
pub async fn run_with_timeout<T>(
    seconds: u64,
    report: impl Future<Output = Result<T, ReportError>>,
) -> Result<T, ReportError> {
    tokio::time::timeout(Duration::from_secs(seconds), report)
        .await
        .map_err(|_| ReportError::Timeout { seconds })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn timeout_cuts_off_a_stalled_report() {
        let err = run_with_timeout(0, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Analysis timed out after 0s");
    }

    #[tokio::test]
    async fn fast_report_passes_its_result_through() {
        let value = run_with_timeout(30, async { Ok(7_u32) }).await.unwrap();
        assert_eq!(value, 7);
    }
}
