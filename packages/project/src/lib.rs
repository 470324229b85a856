#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Project registry.
//!
//! Resolves datasources, metric groups, and geographies from the project
//! configuration. A broken registry (missing datasource, wrong datasource
//! kind) is a configuration error: fatal, surfaced immediately, never
//! retried.

use marine_plan_project_models::{Datasource, Geography, MetricClass, MetricGroup, PrecalcTotals, ProjectConfig};
use thiserror::Error;

/// The default project configuration, embedded at compile time.
const DEFAULT_PROJECT_TOML: &str = include_str!("../config/project.toml");

/// Errors raised by registry lookups and config parsing.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// A class or geography referenced a datasource that is not registered.
    #[error("Unknown datasource: {datasource_id}")]
    UnknownDatasource {
        /// The missing datasource id.
        datasource_id: String,
    },

    /// A metric class has no datasource assigned.
    #[error("Expected datasourceId for {class_id}")]
    MissingDatasourceId {
        /// The class missing its datasource.
        class_id: String,
    },

    /// A class-overlap report was pointed at a non-vector datasource.
    #[error("Expected vector datasource for {datasource_id}")]
    ExpectedVectorDatasource {
        /// The offending datasource id.
        datasource_id: String,
    },

    /// No metric group with the requested id.
    #[error("Unknown metric group: {metric_id}")]
    UnknownMetricGroup {
        /// The missing metric group id.
        metric_id: String,
    },

    /// No geography with the requested id.
    #[error("Unknown geography: {geography_id}")]
    UnknownGeography {
        /// The missing geography id.
        geography_id: String,
    },

    /// No geography is assigned to the fallback group.
    #[error("No geography assigned to group {group}")]
    NoGeographyForGroup {
        /// The group that has no geography.
        group: String,
    },

    /// The project TOML could not be parsed.
    #[error("Invalid project config: {0}")]
    Toml(#[from] Box<toml::de::Error>),
}

/// Read access to a project's configuration.
#[derive(Debug, Clone)]
pub struct ProjectClient {
    config: ProjectConfig,
}

impl ProjectClient {
    /// Wraps an already-built configuration.
    #[must_use]
    pub const fn new(config: ProjectConfig) -> Self {
        Self { config }
    }

    /// Parses a project configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Toml`] if the input is not a valid project
    /// config.
    pub fn from_toml_str(input: &str) -> Result<Self, ProjectError> {
        let config: ProjectConfig = toml::from_str(input).map_err(Box::new)?;
        log::debug!(
            "Loaded project config: {} datasources, {} metric groups, {} geographies",
            config.datasources.len(),
            config.metric_groups.len(),
            config.geographies.len()
        );
        Ok(Self { config })
    }

    /// Loads the embedded default project configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Toml`] if the embedded config is invalid.
    pub fn default_project() -> Result<Self, ProjectError> {
        Self::from_toml_str(DEFAULT_PROJECT_TOML)
    }

    /// The underlying configuration.
    #[must_use]
    pub const fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Injected whole-domain totals.
    #[must_use]
    pub const fn precalc(&self) -> &PrecalcTotals {
        &self.config.precalc
    }

    /// Looks up a datasource by id.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::UnknownDatasource`] if not registered.
    pub fn get_datasource_by_id(&self, datasource_id: &str) -> Result<&Datasource, ProjectError> {
        self.config
            .datasources
            .iter()
            .find(|ds| ds.datasource_id == datasource_id)
            .ok_or_else(|| ProjectError::UnknownDatasource {
                datasource_id: datasource_id.to_string(),
            })
    }

    /// Looks up a datasource and requires it to be vector.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::UnknownDatasource`] if not registered, or
    /// [`ProjectError::ExpectedVectorDatasource`] if it is not vector.
    pub fn get_vector_datasource(&self, datasource_id: &str) -> Result<&Datasource, ProjectError> {
        let datasource = self.get_datasource_by_id(datasource_id)?;
        if !datasource.is_vector() {
            return Err(ProjectError::ExpectedVectorDatasource {
                datasource_id: datasource_id.to_string(),
            });
        }
        Ok(datasource)
    }

    /// Resolves the vector datasource backing a metric class.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::MissingDatasourceId`] when the class has no
    /// datasource assigned, plus the lookup errors of
    /// [`Self::get_vector_datasource`].
    pub fn get_class_datasource(&self, class: &MetricClass) -> Result<&Datasource, ProjectError> {
        let datasource_id =
            class
                .datasource_id
                .as_deref()
                .ok_or_else(|| ProjectError::MissingDatasourceId {
                    class_id: class.class_id.clone(),
                })?;
        self.get_vector_datasource(datasource_id)
    }

    /// Looks up a metric group by id.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::UnknownMetricGroup`] if not registered.
    pub fn get_metric_group(&self, metric_id: &str) -> Result<&MetricGroup, ProjectError> {
        self.config
            .metric_groups
            .iter()
            .find(|group| group.metric_id == metric_id)
            .ok_or_else(|| ProjectError::UnknownMetricGroup {
                metric_id: metric_id.to_string(),
            })
    }

    /// Resolves a geography, falling back to the first geography assigned
    /// to `fallback_group` when no id is given.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::UnknownGeography`] for an unknown explicit
    /// id, or [`ProjectError::NoGeographyForGroup`] when falling back and
    /// nothing is assigned to the group.
    pub fn get_geography_by_id(
        &self,
        geography_id: Option<&str>,
        fallback_group: &str,
    ) -> Result<&Geography, ProjectError> {
        match geography_id {
            Some(id) => self
                .config
                .geographies
                .iter()
                .find(|geography| geography.geography_id == id)
                .ok_or_else(|| ProjectError::UnknownGeography {
                    geography_id: id.to_string(),
                }),
            None => self
                .config
                .geographies
                .iter()
                .find(|geography| geography.groups.iter().any(|group| group == fallback_group))
                .ok_or_else(|| ProjectError::NoGeographyForGroup {
                    group: fallback_group.to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use marine_plan_project_models::GeoType;

    use super::*;

    #[test]
    fn default_project_parses() {
        let project = ProjectClient::default_project().unwrap();
        assert!(project.config().datasources.len() >= 5);
        assert!(project.precalc().eez_area_sq_km > 0.0);
    }

    #[test]
    fn unknown_datasource_is_a_config_error() {
        let project = ProjectClient::default_project().unwrap();
        let err = project.get_datasource_by_id("nope").unwrap_err();
        assert_eq!(err.to_string(), "Unknown datasource: nope");
    }

    #[test]
    fn class_without_datasource_reports_class_id() {
        let project = ProjectClient::default_project().unwrap();
        let class = MetricClass {
            class_id: "orphan".to_string(),
            datasource_id: None,
            class_key: None,
            display: "Orphan".to_string(),
        };
        let err = project.get_class_datasource(&class).unwrap_err();
        assert_eq!(err.to_string(), "Expected datasourceId for orphan");
    }

    #[test]
    fn raster_datasource_is_rejected_for_vector_use() {
        let mut project = ProjectClient::default_project().unwrap();
        let config = &mut project.config;
        config.datasources.push(Datasource {
            datasource_id: "gebco_grid".to_string(),
            geo_type: GeoType::Raster,
            url: "https://data.marine-plan.example/gebco".to_string(),
            class_keys: Vec::new(),
        });

        let err = project.get_vector_datasource("gebco_grid").unwrap_err();
        assert_eq!(err.to_string(), "Expected vector datasource for gebco_grid");
    }

    #[test]
    fn geography_falls_back_to_default_boundary_group() {
        let project = ProjectClient::default_project().unwrap();
        let geography = project
            .get_geography_by_id(None, "default-boundary")
            .unwrap();
        assert_eq!(geography.geography_id, "eez");
    }

    #[test]
    fn explicit_geography_wins_over_fallback() {
        let project = ProjectClient::default_project().unwrap();
        let geography = project
            .get_geography_by_id(Some("nearshore"), "default-boundary")
            .unwrap();
        assert_eq!(geography.geography_id, "nearshore");
    }

    #[test]
    fn unknown_geography_is_an_error() {
        let project = ProjectClient::default_project().unwrap();
        assert!(
            project
                .get_geography_by_id(Some("atlantis"), "default-boundary")
                .is_err()
        );
    }

    #[test]
    fn metric_group_lookup() {
        let project = ProjectClient::default_project().unwrap();
        let group = project.get_metric_group("benthic_features").unwrap();
        assert!(!group.classes.is_empty());
        assert!(project.get_metric_group("pelagic").is_err());
    }
}
