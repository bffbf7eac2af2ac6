mod app;
mod color;
mod data;
mod render;
mod state;
mod ui;
mod view;

use app::PendulumScopeApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pendulum Scope – Elliptical Motion Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(PendulumScopeApp::default()))),
    )
}
