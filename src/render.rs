use eframe::egui::Color32;

use crate::color::param_color;
use crate::data::filter::{filtered_indices, FilterState};
use crate::data::model::{Param, PendulumDataset};
use crate::view::{TimeAxis, ViewRange};

// ---------------------------------------------------------------------------
// PlotRegistry – which plots are shown, in which order
// ---------------------------------------------------------------------------

/// Fixed, ordered set of plot toggles, one per parameter. Only the enabled
/// flags ever change; order and membership are constant for the session and
/// survive dataset reloads.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRegistry {
    enabled: [bool; Param::COUNT],
}

impl Default for PlotRegistry {
    fn default() -> Self {
        PlotRegistry {
            enabled: [true; Param::COUNT],
        }
    }
}

impl PlotRegistry {
    pub fn is_enabled(&self, param: Param) -> bool {
        self.enabled[param.index()]
    }

    pub fn set_enabled(&mut self, param: Param, enabled: bool) {
        self.enabled[param.index()] = enabled;
    }

    /// Enabled parameters in stacking order.
    pub fn enabled_params(&self) -> Vec<Param> {
        Param::ALL
            .into_iter()
            .filter(|p| self.is_enabled(*p))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// RenderPlan – fully resolved drawing instructions
// ---------------------------------------------------------------------------

/// What one stacked plot should display this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotEntry {
    pub param: Param,
    pub label: &'static str,
    pub y_label: &'static str,
    pub color: Color32,
    /// Filtered samples as `[elapsed_seconds, value]` pairs.
    pub points: Vec<[f64; 2]>,
    /// `Some` when the shared axis is locked; `None` means auto-fit.
    pub x_range: Option<ViewRange>,
    /// True only for the bottom-most enabled plot.
    pub show_x_axis_label: bool,
}

pub type RenderPlan = Vec<PlotEntry>;

/// Combine dataset, filters, registry, and the shared time axis into the
/// ordered drawing plan.
///
/// Pure and idempotent: identical inputs yield an identical plan. Disabling
/// every plot yields an empty plan, which is a valid state, not an error.
pub fn build_plan(
    dataset: &PendulumDataset,
    filters: &FilterState,
    registry: &PlotRegistry,
    time_axis: &TimeAxis,
) -> RenderPlan {
    let visible = filtered_indices(dataset, filters);
    let enabled = registry.enabled_params();
    let x_range = time_axis.locked_range();
    let count = enabled.len();

    enabled
        .into_iter()
        .enumerate()
        .map(|(i, param)| PlotEntry {
            param,
            label: param.label(),
            y_label: param.y_axis_label(),
            color: param_color(param),
            points: visible
                .iter()
                .map(|&idx| {
                    let m = &dataset.samples[idx];
                    [m.elapsed_seconds, m.value(param)]
                })
                .collect(),
            x_range,
            show_x_axis_label: i + 1 == count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
