use crate::data::filter::{filtered_indices, FilterState};
use crate::data::model::{Param, PendulumDataset};
use crate::render::PlotRegistry;
use crate::view::{TimeAxis, ViewRange};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Scratch buffer behind the lower/upper filter inputs. Edits live here and
/// only reach [`FilterState`] through [`AppState::apply_bounds`], so invalid
/// input is visibly rejected instead of silently clamped.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundInput {
    pub lower: f64,
    pub upper: f64,
}

/// The full UI session state, independent of rendering. Every mutation of
/// dataset, filters, plot toggles, or the shared time axis goes through the
/// methods below; there is no other entry point and no global.
pub struct AppState {
    /// Loaded dataset (None until the user loads a file).
    pub dataset: Option<PendulumDataset>,

    /// File name of the loaded dataset, for the status line.
    pub source_name: Option<String>,

    /// Per-parameter outlier filter state.
    pub filters: FilterState,

    /// Which plots are shown.
    pub registry: PlotRegistry,

    /// Shared x-axis state for all stacked plots.
    pub time_axis: TimeAxis,

    /// Indices of samples passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Editable lower/upper fields, one per parameter.
    pub bound_inputs: [BoundInput; Param::COUNT],

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// About window visibility.
    pub show_about: bool,

    /// One-shot: every plot should drop its remembered bounds this frame.
    pub reset_all_plots: bool,

    /// One-shot: plots toggled on since last frame (their remembered bounds
    /// may be stale).
    pub fresh_plots: Vec<Param>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source_name: None,
            filters: FilterState::default(),
            registry: PlotRegistry::default(),
            time_axis: TimeAxis::default(),
            visible_indices: Vec::new(),
            bound_inputs: [BoundInput::default(); Param::COUNT],
            status_message: None,
            show_about: false,
            reset_all_plots: false,
            fresh_plots: Vec::new(),
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: recompute filter suggestions, show all
    /// samples, and drop any locked view range (it was computed against the
    /// previous file's time domain). Plot toggles persist.
    pub fn set_dataset(&mut self, dataset: PendulumDataset, source_name: String) {
        log::info!(
            "loaded {} samples from {source_name} spanning {:.1} s",
            dataset.len(),
            dataset.timespan_seconds()
        );
        self.filters = FilterState::from_dataset(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = Some(dataset);
        self.source_name = Some(source_name);
        self.time_axis.reset();
        self.reset_all_plots = true;
        self.sync_bound_inputs();
        self.status_message = None;
    }

    /// Recompute `visible_indices` after any filter change and report the
    /// retention count.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
            log::info!(
                "filtering retained {} of {} samples",
                self.visible_indices.len(),
                ds.len()
            );
        }
    }

    pub fn set_filter_enabled(&mut self, param: Param, enabled: bool) {
        self.filters.set_enabled(param, enabled);
        self.refilter();
    }

    /// Push the edited bounds for one parameter into the filter model.
    /// Invalid bounds are rejected there; the edit buffer snaps back to the
    /// active bounds and the rejection lands in the status line.
    pub fn apply_bounds(&mut self, param: Param) {
        let input = self.bound_inputs[param.index()];
        match self.filters.set_bounds(param, input.lower, input.upper) {
            Ok(()) => {
                self.status_message = None;
                self.refilter();
            }
            Err(err) => {
                log::warn!("rejected bounds for {param}: {err}");
                self.status_message = Some(format!("{}: {err}", param.label()));
                self.sync_bound_input(param);
            }
        }
    }

    /// Restore one parameter's bounds to the stored IQR suggestion.
    pub fn reset_bounds(&mut self, param: Param) {
        self.filters.reset_to_suggested(param);
        self.sync_bound_input(param);
        self.refilter();
    }

    pub fn set_plot_enabled(&mut self, param: Param, enabled: bool) {
        self.registry.set_enabled(param, enabled);
        if enabled {
            // Its remembered bounds may predate the current dataset.
            self.fresh_plots.push(param);
        }
    }

    /// A plot reported a user zoom/pan: lock all plots to that range.
    pub fn lock_view(&mut self, range: ViewRange) {
        self.time_axis.lock(range);
    }

    /// Explicit "Reset View": back to independent auto-fit.
    pub fn reset_view(&mut self) {
        self.time_axis.reset();
        self.reset_all_plots = true;
    }

    fn sync_bound_inputs(&mut self) {
        for param in Param::ALL {
            self.sync_bound_input(param);
        }
    }

    fn sync_bound_input(&mut self, param: Param) {
        let spec = self.filters.spec(param);
        self.bound_inputs[param.index()] = BoundInput {
            lower: spec.lower,
            upper: spec.upper,
        };
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Measurement;
    use chrono::NaiveDate;

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
    fn dataset_replacement_always_releases_the_view_lock() {
        let mut state = AppState::default();
        state.set_dataset(dataset_of(&[1.0, 2.0, 3.0]), "a.csv".into());
        state.lock_view(ViewRange::new(0.5, 1.5).unwrap());
        assert!(state.time_axis.is_locked());

        state.set_dataset(dataset_of(&[4.0, 5.0]), "b.csv".into());
        assert_eq!(state.time_axis, TimeAxis::Auto);
        assert!(state.reset_all_plots);
    }

    #[test]
    fn rejected_bounds_leave_filters_intact_and_set_status() {
        let mut state = AppState::default();
        state.set_dataset(dataset_of(&[1.0, 2.0, 3.0, 4.0, 5.0]), "a.csv".into());
        let before = *state.filters.spec(Param::SemiMajorAxis);

        state.bound_inputs[Param::SemiMajorAxis.index()] = BoundInput {
            lower: 10.0,
            upper: 5.0,
        };
        state.apply_bounds(Param::SemiMajorAxis);

        assert_eq!(*state.filters.spec(Param::SemiMajorAxis), before);
        assert!(state.status_message.is_some());
        // The edit buffer snapped back to the active bounds.
        let input = state.bound_inputs[Param::SemiMajorAxis.index()];
        assert_eq!((input.lower, input.upper), (before.lower, before.upper));
    }

    #[test]
    fn enabling_a_filter_refilters_the_visible_set() {
        let mut state = AppState::default();
        state.set_dataset(
            dataset_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 100.0]),
            "a.csv".into(),
        );
        assert_eq!(state.visible_indices.len(), 11);

        state.set_filter_enabled(Param::SemiMajorAxis, true);
        assert_eq!(state.visible_indices.len(), 10);

        state.set_filter_enabled(Param::SemiMajorAxis, false);
        assert_eq!(state.visible_indices.len(), 11);
    }

    #[test]
    fn toggling_a_plot_on_marks_it_fresh() {
        let mut state = AppState::default();
        state.set_plot_enabled(Param::Eccentricity, false);
        assert!(state.fresh_plots.is_empty());
        state.set_plot_enabled(Param::Eccentricity, true);
        assert_eq!(state.fresh_plots, vec![Param::Eccentricity]);
    }
}
