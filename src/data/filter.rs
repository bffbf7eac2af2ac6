use thiserror::Error;

use super::model::{Param, PendulumDataset};

// ---------------------------------------------------------------------------
// FilterSpec – per-parameter outlier bounds
// ---------------------------------------------------------------------------

/// Outlier-bound state for one parameter. `suggested_*` are the IQR-derived
/// bounds computed once per dataset load; `lower`/`upper` are the active,
/// user-adjustable bounds and start out equal to the suggestions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub enabled: bool,
    pub lower: f64,
    pub upper: f64,
    pub suggested_lower: f64,
    pub suggested_upper: f64,
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec {
            enabled: false,
            lower: 0.0,
            upper: 0.0,
            suggested_lower: 0.0,
            suggested_upper: 0.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("lower bound {lower} exceeds upper bound {upper}")]
    InvalidBounds { lower: f64, upper: f64 },
}

// ---------------------------------------------------------------------------
// IQR rule
// ---------------------------------------------------------------------------

/// Percentile of a sorted slice using linear interpolation between order
/// statistics: index = p * (n - 1).
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = p * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (idx - lo as f64)
}

/// Suggested outlier bounds via the 1.5*IQR rule.
///
/// Degenerate inputs (fewer than 4 values, or IQR of zero) yield the plain
/// (min, max) of the data so the suggestion never filters anything out.
pub fn iqr_bounds(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    if sorted.len() < 4 {
        return (min, max);
    }

    let q1 = percentile(&sorted, 0.25);
    let q3 = percentile(&sorted, 0.75);
    let iqr = q3 - q1;
    if iqr == 0.0 {
        return (min, max);
    }
    (q1 - 1.5 * iqr, q3 + 1.5 * iqr)
}

// ---------------------------------------------------------------------------
// FilterState – all four parameters
// ---------------------------------------------------------------------------

/// Filter state for every parameter, indexed by [`Param::index`].
///
/// Filters start out disabled; enabling one constrains rows to the active
/// bounds of that parameter. Bounds only change through [`set_bounds`]
/// (validated) and [`reset_to_suggested`].
///
/// [`set_bounds`]: FilterState::set_bounds
/// [`reset_to_suggested`]: FilterState::reset_to_suggested
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    specs: [FilterSpec; Param::COUNT],
}

impl FilterState {
    /// Compute per-parameter IQR suggestions for a freshly loaded dataset.
    /// Active bounds are seeded from the suggestions; all filters disabled.
    pub fn from_dataset(dataset: &PendulumDataset) -> Self {
        let mut specs = [FilterSpec::default(); Param::COUNT];
        for param in Param::ALL {
            let (lower, upper) = iqr_bounds(&dataset.column_values(param));
            specs[param.index()] = FilterSpec {
                enabled: false,
                lower,
                upper,
                suggested_lower: lower,
                suggested_upper: upper,
            };
        }
        FilterState { specs }
    }

    pub fn spec(&self, param: Param) -> &FilterSpec {
        &self.specs[param.index()]
    }

    pub fn set_enabled(&mut self, param: Param, enabled: bool) {
        self.specs[param.index()].enabled = enabled;
    }

    /// Update the active bounds. Rejected without mutating state when the
    /// range is inverted (or not comparable); never silently clamped.
    pub fn set_bounds(&mut self, param: Param, lower: f64, upper: f64) -> Result<(), FilterError> {
        if !(lower <= upper) {
            return Err(FilterError::InvalidBounds { lower, upper });
        }
        let spec = &mut self.specs[param.index()];
        spec.lower = lower;
        spec.upper = upper;
        Ok(())
    }

    /// Restore the active bounds from the stored suggestions. Does not
    /// recompute them.
    pub fn reset_to_suggested(&mut self, param: Param) {
        let spec = &mut self.specs[param.index()];
        spec.lower = spec.suggested_lower;
        spec.upper = spec.suggested_upper;
    }
}

/// Return indices of samples that pass every enabled filter.
///
/// Pure: the dataset is never mutated, and identical inputs always yield the
/// identical index list. Disabled parameters impose no constraint.
pub fn filtered_indices(dataset: &PendulumDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .samples
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            Param::ALL.iter().all(|&param| {
                let spec = filters.spec(param);
                if !spec.enabled {
                    return true;
                }
                let v = m.value(param);
                spec.lower <= v && v <= spec.upper
            })
        })
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Measurement;
    use chrono::NaiveDate;

    /// Dataset whose semi-major axis takes the given values; the other
    /// parameters stay constant.
    fn dataset_of(values: &[f64]) -> PendulumDataset {
        let t0 = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Measurement {
                timestamp: t0 + chrono::Duration::seconds(i as i64),
                elapsed_seconds: i as f64,
                values: [v, 0.5, 15.0, 0.7],
            })
            .collect();
        PendulumDataset { samples }
    }

    #[test]
    fn iqr_bounds_follow_the_one_point_five_rule() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 100.0];
        // Q1 = 3.5 and Q3 = 8.5 (linear interpolation at indices 2.5 and
        // 7.5), so IQR = 5.
        let (lower, upper) = iqr_bounds(&values);
        assert_eq!(lower, 3.5 - 7.5);
        assert_eq!(upper, 8.5 + 7.5);
        // The outlier sits far outside the suggestion either way.
        assert!(100.0 > upper);
        assert!(1.0 > lower);
    }

    #[test]
    fn iqr_bounds_are_order_independent() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let shuffled = [5.0, 1.0, 8.0, 3.0, 7.0, 2.0, 6.0, 4.0];
        assert_eq!(iqr_bounds(&sorted), iqr_bounds(&shuffled));
    }

    #[test]
    fn degenerate_inputs_fall_back_to_min_max() {
        assert_eq!(iqr_bounds(&[5.0, 1.0, 3.0]), (1.0, 5.0));
        assert_eq!(iqr_bounds(&[2.0; 10]), (2.0, 2.0));
        assert_eq!(iqr_bounds(&[]), (0.0, 0.0));
    }

    #[test]
    fn enabled_filter_drops_the_outlier_disabled_retains_it() {
        let ds = dataset_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 100.0]);
        let mut filters = FilterState::from_dataset(&ds);

        // Disabled: everything passes.
        assert_eq!(filtered_indices(&ds, &filters).len(), 11);

        filters.set_enabled(Param::SemiMajorAxis, true);
        let kept = filtered_indices(&ds, &filters);
        assert_eq!(kept.len(), 10);
        assert!(!kept.contains(&10));
    }

    #[test]
    fn filtering_is_pure_and_idempotent() {
        let ds = dataset_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
        let mut filters = FilterState::from_dataset(&ds);
        filters.set_enabled(Param::SemiMajorAxis, true);

        let before = ds.clone();
        let first = filtered_indices(&ds, &filters);
        let second = filtered_indices(&ds, &filters);
        assert_eq!(first, second);
        assert_eq!(ds.samples, before.samples);
    }

    #[test]
    fn inverted_bounds_are_rejected_without_mutation() {
        let ds = dataset_of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut filters = FilterState::from_dataset(&ds);
        let before = *filters.spec(Param::SemiMinorAxis);

        let err = filters.set_bounds(Param::SemiMinorAxis, 10.0, 5.0);
        assert_eq!(
            err,
            Err(FilterError::InvalidBounds {
                lower: 10.0,
                upper: 5.0
            })
        );
        assert_eq!(*filters.spec(Param::SemiMinorAxis), before);

        // NaN is not comparable and is rejected the same way.
        assert!(filters
            .set_bounds(Param::SemiMinorAxis, f64::NAN, 5.0)
            .is_err());
    }

    #[test]
    fn reset_restores_suggested_bounds_without_recomputing() {
        let ds = dataset_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let mut filters = FilterState::from_dataset(&ds);
        let suggested = (
            filters.spec(Param::SemiMajorAxis).suggested_lower,
            filters.spec(Param::SemiMajorAxis).suggested_upper,
        );

        filters.set_bounds(Param::SemiMajorAxis, 2.0, 3.0).unwrap();
        filters.reset_to_suggested(Param::SemiMajorAxis);

        let spec = filters.spec(Param::SemiMajorAxis);
        assert_eq!((spec.lower, spec.upper), suggested);
    }

    #[test]
    fn only_enabled_parameters_constrain_rows() {
        let ds = dataset_of(&[1.0, 100.0]);
        let mut filters = FilterState::from_dataset(&ds);
        // Tight bounds on a *disabled* parameter change nothing.
        filters.set_bounds(Param::SemiMajorAxis, 0.0, 2.0).unwrap();
        assert_eq!(filtered_indices(&ds, &filters).len(), 2);

        filters.set_enabled(Param::SemiMajorAxis, true);
        assert_eq!(filtered_indices(&ds, &filters), vec![0]);
    }
}
