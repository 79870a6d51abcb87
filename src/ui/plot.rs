use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use spectro_panda::spectral::Analysis;

use crate::color::generate_palette;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Spectral plots (central panel)
// ---------------------------------------------------------------------------

/// Render the absorbance plot, optionally followed by the intensity plot.
pub fn spectral_plot(ui: &mut Ui, state: &AppState) {
    let analysis = match &state.analysis {
        Some(a) => a,
        None => {
            let hint = if state.store.is_calibrated() {
                "Load a sample to compute absorbance  (File → Load sample…)"
            } else {
                "Load a reference strip to calibrate  (File → Load reference…)"
            };
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(hint);
            });
            return;
        }
    };

    if state.settings.show_intensities {
        let height = ui.available_height() * 0.6;
        absorbance_plot(ui, analysis, height);
        intensity_plot(ui, analysis);
    } else {
        let height = ui.available_height();
        absorbance_plot(ui, analysis, height);
    }
}

fn absorbance_plot(ui: &mut Ui, analysis: &Analysis, height: f32) {
    let points: PlotPoints = analysis.absorbance.points().collect();

    Plot::new("absorbance_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Wavelength (nm)")
        .y_axis_label("Absorbance")
        .show_grid(true)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Absorbance vs Wavelength")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.0),
            );
        });
}

/// Reference and sample intensities against their resolved wavelengths.
/// Sample wavelengths need not be monotonic, so both are drawn as points.
fn intensity_plot(ui: &mut Ui, analysis: &Analysis) {
    let colors = generate_palette(2);
    let series = [
        ("Reference", &analysis.reference, colors[0]),
        ("Sample", &analysis.sample, colors[1]),
    ];

    Plot::new("intensity_plot")
        .legend(Legend::default())
        .x_axis_label("Wavelength (nm)")
        .y_axis_label("Intensity")
        .show_grid(true)
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (name, s, color) in series {
                let points: PlotPoints = s.points().collect();
                plot_ui.points(Points::new(points).name(name).color(color).radius(1.5));
            }
        });
}
