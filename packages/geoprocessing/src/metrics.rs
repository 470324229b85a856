//! Metric aggregation: rekeying and canonical ordering.
//!
//! The report smoke suites diff output against golden files, so repeated
//! runs over identical input must produce byte-identical metric sequences.

use std::collections::BTreeMap;

use marine_plan_geoprocessing_models::Metric;

/// Collapses metrics sharing a composite key so identical logical
/// measurements overwrite rather than duplicate. Later entries win.
#[must_use]
pub fn rekey_metrics(metrics: Vec<Metric>) -> Vec<Metric> {
    let mut by_key: BTreeMap<String, Metric> = BTreeMap::new();
    for metric in metrics {
        by_key.insert(metric.key(), metric);
    }
    by_key.into_values().collect()
}

/// Stable canonical ordering by metric id, then sketch id, then class id.
#[must_use]
pub fn sort_metrics(mut metrics: Vec<Metric>) -> Vec<Metric> {
    metrics.sort_by(|a, b| {
        a.metric_id
            .cmp(&b.metric_id)
            .then_with(|| a.sketch_id.cmp(&b.sketch_id))
            .then_with(|| a.class_id.cmp(&b.class_id))
    });
    metrics
}
