use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints, Points};

use crate::render::{build_plan, PlotEntry, RenderPlan};
use crate::state::AppState;
use crate::view::ViewRange;

/// Feedback from one frame of plot interaction. At most one event survives
/// per frame; the last plot to report wins, matching the synchronizer's
/// single-current-range contract.
enum AxisEvent {
    Lock(ViewRange),
    Reset,
}

// ---------------------------------------------------------------------------
// Stacked plots (central panel)
// ---------------------------------------------------------------------------

/// Render the vertically stacked plots and feed zoom/pan interactions back
/// into the shared time axis.
pub fn stacked_plots(ui: &mut Ui, state: &mut AppState) {
    let plan: RenderPlan = {
        let Some(dataset) = &state.dataset else {
            centered_hint(ui, "Open a file to view measurements  (File → Open…)");
            return;
        };
        if state.visible_indices.is_empty() && !dataset.is_empty() {
            centered_hint(ui, "All samples filtered out — relax the filter bounds.");
            return;
        }
        build_plan(dataset, &state.filters, &state.registry, &state.time_axis)
    };

    if plan.is_empty() {
        centered_hint(ui, "No plots enabled — pick one in the panel on the left.");
        return;
    }

    // One-shot reset flags: consumed here, at most one frame after being set.
    let reset_all = std::mem::take(&mut state.reset_all_plots);
    let fresh = std::mem::take(&mut state.fresh_plots);

    let count = plan.len() as f32;
    let spacing = ui.spacing().item_spacing.y;
    let height = ((ui.available_height() - spacing * (count - 1.0)) / count).max(80.0);

    let mut event = None;
    for entry in &plan {
        let forget_bounds = reset_all || fresh.contains(&entry.param);
        if let Some(e) = show_plot(ui, entry, height, forget_bounds) {
            event = Some(e);
        }
    }

    match event {
        Some(AxisEvent::Lock(range)) => {
            state.lock_view(range);
            // Make sure every other plot redraws with the new range right
            // away, not on the next input.
            ui.ctx().request_repaint();
        }
        Some(AxisEvent::Reset) => {
            state.reset_view();
            ui.ctx().request_repaint();
        }
        None => {}
    }
}

/// Show one plot of the plan; returns the axis event it produced, if any.
fn show_plot(
    ui: &mut Ui,
    entry: &PlotEntry,
    height: f32,
    forget_bounds: bool,
) -> Option<AxisEvent> {
    let mut plot = Plot::new(("stacked_plot", entry.param.column_name()))
        .height(height)
        .legend(Legend::default())
        .y_axis_label(entry.y_label)
        .allow_drag(true)
        .allow_zoom(true)
        .allow_boxed_zoom(true)
        .allow_scroll(false)
        // Double click resets *all* plots through the synchronizer, not just
        // this one.
        .allow_double_click_reset(false)
        .show_axes([entry.show_x_axis_label, true]);

    if entry.show_x_axis_label {
        plot = plot.x_axis_label("Time (seconds)");
    }
    if forget_bounds {
        plot = plot.reset();
    }

    let locked = entry.x_range;
    let response = plot.show(ui, |plot_ui| {
        if let Some(r) = locked {
            // Enforce the shared window every frame; y keeps whatever this
            // plot had, so vertical zoom stays per-plot. A plot without
            // usable remembered bounds (just reset, or shown for the first
            // time) gets a data fit instead.
            let b = plot_ui.plot_bounds();
            let (y0, y1) = if b.min()[1].is_finite() && b.max()[1].is_finite() && b.min()[1] < b.max()[1]
            {
                (b.min()[1], b.max()[1])
            } else {
                y_extent(&entry.points)
            };
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([r.start, y0], [r.end, y1]));
        }

        let line: PlotPoints = entry.points.iter().copied().collect();
        plot_ui.line(
            Line::new(line)
                .name(entry.label)
                .color(entry.color)
                .width(1.5),
        );

        let markers: PlotPoints = entry.points.iter().copied().collect();
        plot_ui.points(
            Points::new(markers)
                .radius(1.6)
                .color(entry.color.gamma_multiply(0.55)),
        );
    });

    let resp = &response.response;
    if resp.double_clicked() {
        return Some(AxisEvent::Reset);
    }

    // Pan is a primary drag, boxed zoom lands on drag_stopped, wheel/pinch
    // zoom shows up as a zoom_delta while hovered.
    let zoomed = resp.hovered() && ui.ctx().input(|i| i.zoom_delta()) != 1.0;
    if resp.dragged() || resp.drag_stopped() || zoomed {
        let b = response.transform.bounds();
        if let Some(range) = ViewRange::new(b.min()[0], b.max()[0]) {
            // Ignore no-op gestures that land exactly on the current lock.
            if locked.map_or(true, |r| !range.approx_eq(&r)) {
                return Some(AxisEvent::Lock(range));
            }
        }
    }
    None
}

/// Vertical data fit with a small margin, for plots that have no usable
/// remembered y bounds yet.
fn y_extent(points: &[[f64; 2]]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in points {
        min = min.min(p[1]);
        max = max.max(p[1]);
    }
    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let margin = (max - min) * 0.05;
    (min - margin, max + margin)
}

fn centered_hint(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}
