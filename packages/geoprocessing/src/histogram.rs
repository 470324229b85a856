//! Area-weighted histogram binning.
//!
//! Depth reports accumulate intersected area into contiguous bins over the
//! absolute depth range of bathymetry contour features.

use marine_plan_geoprocessing_models::Bin;

/// Builds contiguous zero-valued bins from `min` to `max` (exclusive)
/// stepped by `step`.
///
/// `make_bins(0.0, 10.0, 1.0)` yields ten bins with lower edges `0..=9`.
#[must_use]
pub fn make_bins(min: f64, max: f64, step: f64) -> Vec<Bin> {
    let mut bins = Vec::new();
    let mut edge = min;
    while edge < max {
        bins.push(Bin {
            min: edge,
            value: 0.0,
        });
        edge += step;
    }
    bins
}

/// Adds `value` to the bin whose half-open interval `[bin.min, next.min)`
/// contains `range_min`, the lower edge of the feature's value range.
///
/// The last bin is unbounded above. A range start below the first bin's
/// edge accumulates nothing.
pub fn fill_bins(bins: &mut [Bin], range_min: f64, range_max: f64, value: f64) {
    for index in 0..bins.len() {
        let next_min = bins.get(index + 1).map(|bin| bin.min);
        let bin = &mut bins[index];
        if range_min >= bin.min
            && next_min.is_none_or(|next| range_min < next || range_max < next)
        {
            bin.value += value;
            return;
        }
    }
}

/// Value-weighted mean over the bins, treating each bin's lower edge as
/// representative of everything accumulated in it.
///
/// Returns `None` when no value has been accumulated (empty sketch), a
/// valid degenerate outcome.
#[must_use]
pub fn weighted_mean(bins: &[Bin]) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut total = 0.0;
    for bin in bins {
        weighted_sum += bin.min * bin.value;
        total += bin.value;
    }

    if total > 0.0 {
        Some(weighted_sum / total)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_bins_produces_contiguous_lower_edges() {
        let bins = make_bins(0.0, 10.0, 1.0);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].min, 0.0);
        assert_eq!(bins[9].min, 9.0);
        assert!(bins.iter().all(|bin| bin.value == 0.0));
    }

    #[test]
    fn fill_places_value_in_bin_containing_range_start() {
        let mut bins = make_bins(0.0, 10.0, 1.0);
        fill_bins(&mut bins, 2.0, 4.0, 100.0);

        assert_eq!(bins[2].value, 100.0);
        for (index, bin) in bins.iter().enumerate() {
            if index != 2 {
                assert_eq!(bin.value, 0.0, "bin {index} should be empty");
            }
        }
    }

    #[test]
    fn fill_is_conserving_across_many_ranges() {
        let mut bins = make_bins(0.0, 7000.0, 100.0);
        let contributions = [
            (0.0, 100.0, 10.0),
            (250.0, 350.0, 20.0),
            (250.0, 251.0, 5.0),
            (6950.0, 7100.0, 40.0),
        ];
        for (range_min, range_max, area) in contributions {
            fill_bins(&mut bins, range_min, range_max, area);
        }

        let total: f64 = bins.iter().map(|bin| bin.value).sum();
        let expected: f64 = contributions.iter().map(|(_, _, area)| area).sum();
        assert!((total - expected).abs() < 1e-9);
    }

    #[test]
    fn last_bin_is_unbounded_above() {
        let mut bins = make_bins(0.0, 10.0, 1.0);
        fill_bins(&mut bins, 9.5, 42.0, 7.0);
        assert_eq!(bins[9].value, 7.0);
    }

    #[test]
    fn range_start_below_first_edge_accumulates_nothing() {
        let mut bins = make_bins(100.0, 200.0, 10.0);
        fill_bins(&mut bins, 50.0, 60.0, 7.0);
        assert!(bins.iter().all(|bin| bin.value == 0.0));
    }

    #[test]
    fn weighted_mean_uses_bin_lower_edges() {
        let mut bins = make_bins(0.0, 10.0, 1.0);
        fill_bins(&mut bins, 2.0, 3.0, 100.0);
        fill_bins(&mut bins, 4.0, 5.0, 300.0);

        // (2*100 + 4*300) / 400 = 3.5
        assert_eq!(weighted_mean(&bins), Some(3.5));
    }

    #[test]
    fn weighted_mean_of_empty_histogram_is_none() {
        let bins = make_bins(0.0, 10.0, 1.0);
        assert_eq!(weighted_mean(&bins), None);
    }
}
