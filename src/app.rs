use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PendulumScopeApp {
    pub state: AppState,
}

impl Default for PendulumScopeApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for PendulumScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: plot toggles and filters ----
        egui::SidePanel::left("controls_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: stacked plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::stacked_plots(ui, &mut self.state);
        });

        // ---- About window ----
        if self.state.show_about {
            egui::Window::new("About Pendulum Scope")
                .open(&mut self.state.show_about)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Pendulum Scope");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.label("A viewer for elliptical pendulum motion data.");
                });
        }
    }
}
