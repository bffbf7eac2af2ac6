use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Param;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – plot toggles and filter controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Plots");
    ui.separator();

    for param in Param::ALL {
        let mut enabled = state.registry.is_enabled(param);
        if ui.checkbox(&mut enabled, param.label()).changed() {
            state.set_plot_enabled(param, enabled);
        }
    }

    ui.add_space(8.0);
    ui.heading("Outlier Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for param in Param::ALL {
                filter_group(ui, state, param);
            }

            ui.add_space(8.0);
            filter_stats(ui, state);
        });
}

/// One collapsible filter group: enable checkbox, bound fields, apply/reset.
fn filter_group(ui: &mut Ui, state: &mut AppState, param: Param) {
    let spec = *state.filters.spec(param);
    let header = if spec.enabled {
        format!("{}  (filtering)", param.label())
    } else {
        param.label().to_string()
    };

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(param.column_name())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let mut enabled = spec.enabled;
            if ui.checkbox(&mut enabled, "Enable filter").changed() {
                state.set_filter_enabled(param, enabled);
            }

            // Drag speed scaled to the suggested span so narrow and wide
            // parameters are equally adjustable.
            let span = (spec.suggested_upper - spec.suggested_lower).abs();
            let speed = (span / 200.0).max(1e-3);
            let input = &mut state.bound_inputs[param.index()];

            ui.horizontal(|ui: &mut Ui| {
                ui.label("Lower");
                ui.add(egui::DragValue::new(&mut input.lower).speed(speed));
                ui.label("Upper");
                ui.add(egui::DragValue::new(&mut input.upper).speed(speed));
            });

            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Apply").clicked() {
                    state.apply_bounds(param);
                }
                if ui.small_button("Suggested").clicked() {
                    state.reset_bounds(param);
                }
            });

            ui.label(
                RichText::new(format!(
                    "IQR suggests [{:.3}, {:.3}]",
                    spec.suggested_lower, spec.suggested_upper
                ))
                .weak(),
            );
        });
}

/// Retention statistics, mirrored in the log on every refilter.
fn filter_stats(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.dataset else { return };
    let total = ds.len();
    let visible = state.visible_indices.len();
    if visible == total {
        ui.label(format!("Showing all {total} samples"));
    } else {
        let removed = total - visible;
        ui.label(format!(
            "Showing {visible} of {total} samples ({removed} removed, {:.1}%)",
            removed as f64 / total as f64 * 100.0
        ));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Exit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.menu_button("View", |ui: &mut Ui| {
            if ui.button("Reset View").clicked() {
                state.reset_view();
                ui.close_menu();
            }
        });

        ui.menu_button("Help", |ui: &mut Ui| {
            if ui.button("About").clicked() {
                state.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(name)) = (&state.dataset, &state.source_name) {
            ui.label(format!(
                "{name}: {} samples, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open pendulum data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        // A failed load leaves the previous dataset and all derived state
        // untouched; state is only replaced on success.
        match crate::data::loader::load_csv(&path) {
            Ok(dataset) => {
                state.set_dataset(dataset, name);
            }
            Err(e) => {
                log::error!("failed to load {name}: {e}");
                state.status_message = Some(format!("Error loading {name}: {e}"));
            }
        }
    }
}
