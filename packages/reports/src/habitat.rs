//! Habitat-class overlap reports.
//!
//! One generic runner computes overlap metrics for every class of a metric
//! group; the public report functions differ only in which group they run,
//! whether the sketch is clipped to the geography first, and which
//! property de-duplicates fetched features.

use std::collections::HashMap;

use futures::future::try_join_all;
use marine_plan_geoprocessing::antimeridian::split_sketch_antimeridian;
use marine_plan_geoprocessing::fetch::features_for_sketch_bboxes;
use marine_plan_geoprocessing::metrics::{rekey_metrics, sort_metrics};
use marine_plan_geoprocessing::overlap::overlap_features;
use marine_plan_geoprocessing_models::{Feature, Metric, SketchInput};
use marine_plan_reports_models::ReportResult;

use crate::geography::clip_to_geography;
use crate::{ReportContext, ReportError};

/// Normalizes the sketch at the antimeridian, optionally clips it to the
/// resolved geography, and returns it with the geography id to stamp on
/// the metrics.
async fn prepare_sketch(
    sketch: &SketchInput,
    context: &ReportContext,
    clip: bool,
) -> Result<(SketchInput, String), ReportError> {
    let geography = context.geography()?.clone();
    let normalized = split_sketch_antimeridian(sketch);
    let prepared = if clip {
        clip_to_geography(&normalized, &geography, context).await?
    } else {
        normalized
    };
    Ok((prepared, geography.geography_id))
}

/// Computes benthic habitat class overlap, clipped to the geography.
///
/// Benthic features are stored subdivided; the `UNION` property
/// de-duplicates pieces fetched across overlapping query boxes.
///
/// # Errors
///
/// Returns [`ReportError`] on a broken class registry or an unreachable
/// datasource.
pub async fn benthic_features(
    sketch: &SketchInput,
    context: &ReportContext,
) -> Result<ReportResult, ReportError> {
    let (prepared, geography_id) = prepare_sketch(sketch, context, true).await?;
    let mut cache = HashMap::new();
    let metrics = class_overlap_metrics(
        context,
        &prepared,
        "benthic_features",
        &geography_id,
        Some("UNION"),
        &mut cache,
    )
    .await?;
    Ok(ReportResult {
        metrics: sort_metrics(rekey_metrics(metrics)),
    })
}

/// Computes geomorphic seafloor class overlap, clipped to the geography.
///
/// # Errors
///
/// Returns [`ReportError`] on a broken class registry or an unreachable
/// datasource.
pub async fn geomorphic_features(
    sketch: &SketchInput,
    context: &ReportContext,
) -> Result<ReportResult, ReportError> {
    let (prepared, geography_id) = prepare_sketch(sketch, context, true).await?;
    let mut cache = HashMap::new();
    let metrics = class_overlap_metrics(
        context,
        &prepared,
        "geomorphic_features",
        &geography_id,
        None,
        &mut cache,
    )
    .await?;
    Ok(ReportResult {
        metrics: sort_metrics(rekey_metrics(metrics)),
    })
}

/// Computes coral reef extent overlap.
///
/// # Errors
///
/// Returns [`ReportError`] on a broken class registry or an unreachable
/// datasource.
pub async fn reef_extent(
    sketch: &SketchInput,
    context: &ReportContext,
) -> Result<ReportResult, ReportError> {
    let (prepared, geography_id) = prepare_sketch(sketch, context, false).await?;
    let mut cache = HashMap::new();
    let metrics = class_overlap_metrics(
        context,
        &prepared,
        "reef_extent",
        &geography_id,
        None,
        &mut cache,
    )
    .await?;
    Ok(ReportResult {
        metrics: sort_metrics(rekey_metrics(metrics)),
    })
}

/// Computes deepwater bioregion overlap.
///
/// # Errors
///
/// Returns [`ReportError`] on a broken class registry or an unreachable
/// datasource.
pub async fn deepwater_bioregions(
    sketch: &SketchInput,
    context: &ReportContext,
) -> Result<ReportResult, ReportError> {
    let (prepared, geography_id) = prepare_sketch(sketch, context, false).await?;
    let mut cache = HashMap::new();
    let metrics = class_overlap_metrics(
        context,
        &prepared,
        "deepwater_bioregions",
        &geography_id,
        None,
        &mut cache,
    )
    .await?;
    Ok(ReportResult {
        metrics: sort_metrics(rekey_metrics(metrics)),
    })
}

/// Computes the combined coral atlas overlay: the geomorphic and benthic
/// metric groups in one invocation, sharing one dataset cache.
///
/// # Errors
///
/// Returns [`ReportError`] on a broken class registry or an unreachable
/// datasource.
pub async fn coral_atlas(
    sketch: &SketchInput,
    context: &ReportContext,
) -> Result<ReportResult, ReportError> {
    let (prepared, geography_id) = prepare_sketch(sketch, context, false).await?;

    let mut cache = HashMap::new();
    let mut metrics = class_overlap_metrics(
        context,
        &prepared,
        "geomorphic_features",
        &geography_id,
        None,
        &mut cache,
    )
    .await?;
    metrics.extend(
        class_overlap_metrics(
            context,
            &prepared,
            "benthic_features",
            &geography_id,
            None,
            &mut cache,
        )
        .await?,
    );

    Ok(ReportResult {
        metrics: sort_metrics(rekey_metrics(metrics)),
    })
}

/// Overlap metrics for every class of a metric group.
///
/// Classes sharing a datasource share one fetch through `cache`, which
/// lives for exactly one invocation. Fetches for datasources not yet in
/// the cache run concurrently. Sub-classes filter the fetched features by
/// the datasource's class key; an "all" class takes them unfiltered.
async fn class_overlap_metrics(
    context: &ReportContext,
    sketch: &SketchInput,
    metric_group_id: &str,
    geography_id: &str,
    unique_id_property: Option<&str>,
    cache: &mut HashMap<String, Vec<Feature>>,
) -> Result<Vec<Metric>, ReportError> {
    let metric_group = context.project.get_metric_group(metric_group_id)?.clone();

    let mut missing: Vec<String> = Vec::new();
    for class in &metric_group.classes {
        let datasource = context.project.get_class_datasource(class)?;
        if !cache.contains_key(&datasource.datasource_id)
            && !missing.contains(&datasource.datasource_id)
        {
            missing.push(datasource.datasource_id.clone());
        }
    }

    let fetched = try_join_all(missing.iter().map(|datasource_id| async move {
        let datasource = context.project.get_vector_datasource(datasource_id)?;
        let source = context.source_for(datasource)?;
        let features =
            features_for_sketch_bboxes(sketch, source.as_ref(), unique_id_property).await?;
        log::debug!(
            "Fetched {} features from datasource '{datasource_id}' for metric group '{metric_group_id}'",
            features.len()
        );
        Ok::<(String, Vec<Feature>), ReportError>((datasource_id.clone(), features))
    }))
    .await?;
    cache.extend(fetched);

    let mut metrics = Vec::new();
    for class in &metric_group.classes {
        let datasource = context.project.get_class_datasource(class)?;
        let features = &cache[&datasource.datasource_id];

        let filtered: Vec<Feature>;
        let class_features: &[Feature] = if class.is_unfiltered(&datasource.datasource_id) {
            features
        } else {
            let class_key = datasource.class_keys.first().map(String::as_str);
            filtered = features
                .iter()
                .filter(|feature| {
                    class_key.is_some_and(|key| {
                        feature.property_str(key) == Some(class.class_id.as_str())
                    })
                })
                .cloned()
                .collect();
            &filtered
        };

        let class_metrics = overlap_features(&metric_group.metric_id, class_features, sketch)
            .into_iter()
            .map(|mut metric| {
                metric.class_id = Some(class.class_id.clone());
                metric.geography_id = Some(geography_id.to_string());
                metric
            });
        metrics.extend(class_metrics);
    }

    Ok(metrics)
}
