mod app;
mod color;
mod state;
mod ui;

use app::SpectroPandaApp;
use eframe::egui;
use spectro_panda::config;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = config::load_settings();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spectro Panda – Absorbance Spectrometer",
        options,
        Box::new(|_cc| Ok(Box::new(SpectroPandaApp::new(settings)))),
    )
}
