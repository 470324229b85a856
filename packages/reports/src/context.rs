//! Per-invocation report context: project registry, dataset resolution,
//! and caller-supplied parameters.

use std::collections::HashMap;
use std::sync::Arc;

use marine_plan_geoprocessing::SourceError;
use marine_plan_geoprocessing::sources::VectorSource;
use marine_plan_geoprocessing::sources::geojson_url::GeojsonUrlSource;
use marine_plan_project::ProjectClient;
use marine_plan_project_models::{Datasource, Geography};
use marine_plan_reports_models::ExtraParams;

use crate::ReportError;

/// Geography group used when the caller does not name a geography.
pub const DEFAULT_BOUNDARY_GROUP: &str = "default-boundary";

/// Turns a registered datasource into a queryable vector source.
pub trait SourceResolver: Send + Sync {
    /// Resolves the source backing a datasource.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when no source can be produced.
    fn resolve(&self, datasource: &Datasource) -> Result<Arc<dyn VectorSource>, ReportError>;
}

/// Resolves datasources to their remote bbox-filtered endpoints.
#[derive(Debug, Clone)]
pub struct HttpSourceResolver {
    client: reqwest::Client,
}

impl HttpSourceResolver {
    /// Creates a resolver sharing one HTTP client across all datasets.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl SourceResolver for HttpSourceResolver {
    fn resolve(&self, datasource: &Datasource) -> Result<Arc<dyn VectorSource>, ReportError> {
        Ok(Arc::new(GeojsonUrlSource::new(
            self.client.clone(),
            datasource.url.clone(),
        )))
    }
}

/// Resolves datasources from a fixed in-memory registry. Used for embedded
/// datasets and tests.
#[derive(Default)]
pub struct StaticSourceResolver {
    sources: HashMap<String, Arc<dyn VectorSource>>,
}

impl StaticSourceResolver {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source for a datasource id.
    #[must_use]
    pub fn with_source(
        mut self,
        datasource_id: impl Into<String>,
        source: Arc<dyn VectorSource>,
    ) -> Self {
        self.sources.insert(datasource_id.into(), source);
        self
    }
}

impl SourceResolver for StaticSourceResolver {
    fn resolve(&self, datasource: &Datasource) -> Result<Arc<dyn VectorSource>, ReportError> {
        self.sources
            .get(&datasource.datasource_id)
            .cloned()
            .ok_or_else(|| {
                ReportError::Source(SourceError::Malformed {
                    message: format!(
                        "No source registered for datasource {}",
                        datasource.datasource_id
                    ),
                })
            })
    }
}

/// Everything a report invocation needs: the project registry, a way to
/// open its datasources, and the caller's parameters. Built fresh per
/// invocation; holds no cross-invocation state.
pub struct ReportContext {
    /// Project registry.
    pub project: ProjectClient,
    resolver: Arc<dyn SourceResolver>,
    /// Caller-supplied parameters.
    pub params: ExtraParams,
}

impl ReportContext {
    /// Creates a context with default (empty) parameters.
    pub fn new(project: ProjectClient, resolver: Arc<dyn SourceResolver>) -> Self {
        Self {
            project,
            resolver,
            params: ExtraParams::default(),
        }
    }

    /// Replaces the caller parameters.
    #[must_use]
    pub fn with_params(mut self, params: ExtraParams) -> Self {
        self.params = params;
        self
    }

    /// Resolves a datasource to its queryable source.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the resolver cannot produce a source.
    pub fn source_for(&self, datasource: &Datasource) -> Result<Arc<dyn VectorSource>, ReportError> {
        self.resolver.resolve(datasource)
    }

    /// Looks up a vector datasource by id and resolves its source.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Project`] when the datasource is unknown or
    /// not vector, or a resolver error.
    pub fn resolve_vector(&self, datasource_id: &str) -> Result<Arc<dyn VectorSource>, ReportError> {
        let datasource = self.project.get_vector_datasource(datasource_id)?;
        self.resolver.resolve(datasource)
    }

    /// The geography this invocation is scoped to: the caller's first
    /// requested geography, or the default boundary.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Project`] for an unknown geography or when
    /// no default boundary is configured.
    pub fn geography(&self) -> Result<&Geography, ReportError> {
        Ok(self
            .project
            .get_geography_by_id(self.params.first_geography_id(), DEFAULT_BOUNDARY_GROUP)?)
    }
}
