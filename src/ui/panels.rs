use std::path::Path;

use eframe::egui::{self, Color32, ColorImage, RichText, Sense, TextureHandle, TextureOptions, Ui};
use spectro_panda::data::{export, loader};
use spectro_panda::spectral::{PixelGrid, WavelengthRange};

use crate::color::{rgb_to_color32, wavelength_color};
use crate::state::AppState;

/// Longest side of the preview thumbnails.
const MAX_PREVIEW_SIDE: u32 = 512;

// ---------------------------------------------------------------------------
// Left side panel – calibration, previews, probe
// ---------------------------------------------------------------------------

/// Render the left calibration panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Calibration");
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            range_editor(ui, state);
            ui.separator();
            calibration_summary(ui, state);
            ui.separator();
            previews(ui, state);
            ui.separator();
            color_probe(ui, state);
        });
}

fn range_editor(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Wavelength range");
    ui.horizontal(|ui: &mut Ui| {
        ui.add(
            egui::DragValue::new(&mut state.range_input.start_nm)
                .speed(1.0)
                .range(100.0..=2000.0)
                .suffix(" nm"),
        );
        ui.label("to");
        ui.add(
            egui::DragValue::new(&mut state.range_input.end_nm)
                .speed(1.0)
                .range(100.0..=2000.0)
                .suffix(" nm"),
        );
    });

    let valid = match state.range_input.validate() {
        Ok(()) => true,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            false
        }
    };

    ui.horizontal(|ui: &mut Ui| {
        let can_apply = valid && state.store.is_calibrated();
        if ui
            .add_enabled(can_apply, egui::Button::new("Recalibrate"))
            .clicked()
        {
            match state.recalibrate() {
                Ok(()) => state.persist_settings(),
                Err(e) => state.report_error("Recalibration failed", &e),
            }
        }
        if ui.small_button("Reset").clicked() {
            state.range_input = WavelengthRange::default();
        }
    });
}

fn calibration_summary(ui: &mut Ui, state: &AppState) {
    let Some(reference) = state.store.snapshot() else {
        ui.label("No reference loaded.");
        return;
    };
    let table = &reference.table;
    let range = table.range();

    ui.label(format!(
        "{} entries, {:.0}–{:.0} nm",
        table.len(),
        range.start_nm,
        range.end_nm
    ));
    if let Some(source) = &reference.source {
        ui.label(RichText::new(source).weak());
    }

    // One thin slice per calibration entry, left to right.
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), 24.0),
        Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    let slice = rect.width() / table.len() as f32;
    for (i, entry) in table.entries().iter().enumerate() {
        let x0 = rect.left() + i as f32 * slice;
        let slice_rect = egui::Rect::from_min_max(
            egui::pos2(x0, rect.top()),
            egui::pos2(x0 + slice.max(1.0), rect.bottom()),
        );
        painter.rect_filled(slice_rect, 0.0, rgb_to_color32(entry.color.to_u8()));
    }
}

fn previews(ui: &mut Ui, state: &mut AppState) {
    let ctx = ui.ctx().clone();
    let width = ui.available_width();

    if let Some(reference) = state.store.snapshot() {
        ui.strong("Reference");
        let tex = state
            .reference_preview
            .get_or_insert_with(|| preview_texture(&ctx, "reference_preview", &reference.grid));
        show_preview(ui, tex, width);
    }
    if let Some(sample) = &state.sample {
        ui.strong("Sample");
        let tex = state
            .sample_preview
            .get_or_insert_with(|| preview_texture(&ctx, "sample_preview", &sample.grid));
        show_preview(ui, tex, width);
    }
}

fn show_preview(ui: &mut Ui, tex: &TextureHandle, max_width: f32) {
    ui.add(
        egui::Image::from_texture(egui::load::SizedTexture::from_handle(tex))
            .max_width(max_width)
            .max_height(120.0)
            .rounding(4.0),
    );
}

/// Upload a downscaled copy of `grid` as an egui texture.
fn preview_texture(ctx: &egui::Context, name: &str, grid: &PixelGrid) -> TextureHandle {
    let (w, h) = (grid.width() as u32, grid.height() as u32);
    let image = match image::RgbImage::from_raw(w, h, grid.to_rgb_bytes()) {
        Some(full) if w.max(h) > MAX_PREVIEW_SIDE => {
            let scale = MAX_PREVIEW_SIDE as f32 / w.max(h) as f32;
            let nw = ((w as f32 * scale).round() as u32).max(1);
            let nh = ((h as f32 * scale).round() as u32).max(1);
            image::imageops::thumbnail(&full, nw, nh)
        }
        Some(full) => full,
        None => image::RgbImage::new(1, 1),
    };
    let size = [image.width() as usize, image.height() as usize];
    ctx.load_texture(
        name,
        ColorImage::from_rgb(size, image.as_raw()),
        TextureOptions::LINEAR,
    )
}

fn color_probe(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Colour probe");
    ui.horizontal(|ui: &mut Ui| {
        ui.color_edit_button_srgb(&mut state.probe_color);
        match state.probe_wavelength() {
            Ok(nm) => {
                ui.label(format!("≈ {nm:.1} nm"));
                let (rect, _) = ui.allocate_exact_size(egui::vec2(16.0, 16.0), Sense::hover());
                ui.painter().rect_filled(rect, 2.0, wavelength_color(nm));
            }
            Err(e) => {
                ui.label(RichText::new(e.to_string()).weak());
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Load reference…").clicked() {
                open_reference_dialog(state);
                ui.close_menu();
            }
            let calibrated = state.store.is_calibrated();
            if ui
                .add_enabled(calibrated, egui::Button::new("Load sample…"))
                .clicked()
            {
                open_sample_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(state.analysis.is_some(), egui::Button::new("Export absorbance…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        match state.store.snapshot() {
            Some(reference) => {
                ui.label(format!(
                    "Reference: {} ({} px)",
                    reference.source.as_deref().unwrap_or("unnamed"),
                    reference.grid.width()
                ));
            }
            None => {
                ui.label("No reference");
            }
        }
        if let Some(sample) = &state.sample {
            ui.label(format!("Sample: {} ({} px)", sample.source, sample.grid.width()));
        }

        ui.separator();

        if ui
            .selectable_label(state.settings.show_intensities, "Intensities")
            .clicked()
        {
            state.settings.show_intensities = !state.settings.show_intensities;
            state.persist_settings();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn image_dialog(state: &AppState, title: &str) -> rfd::FileDialog {
    let dialog = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Images", loader::IMAGE_EXTENSIONS);
    match &state.settings.last_dir {
        Some(dir) => dialog.set_directory(dir),
        None => dialog,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn open_reference_dialog(state: &mut AppState) {
    let Some(path) = image_dialog(state, "Open reference strip").pick_file() else {
        return;
    };
    state.remember_dir(&path);

    match loader::load_grid(&path).and_then(|grid| state.set_reference(grid, display_name(&path))) {
        Ok(()) => {
            log::info!("Loaded reference {}", path.display());
            state.persist_settings();
        }
        Err(e) => state.report_error("Failed to load reference", &e),
    }
}

pub fn open_sample_dialog(state: &mut AppState) {
    let Some(path) = image_dialog(state, "Open sample strip").pick_file() else {
        return;
    };
    state.remember_dir(&path);

    match loader::load_grid(&path).and_then(|grid| state.set_sample(grid, display_name(&path))) {
        Ok(()) => log::info!("Loaded sample {}", path.display()),
        Err(e) => state.report_error("Failed to load sample", &e),
    }
}

pub fn export_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Export absorbance")
        .set_file_name("absorbance.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"]);
    if let Some(dir) = &state.settings.last_dir {
        dialog = dialog.set_directory(dir);
    }
    let Some(path) = dialog.save_file() else {
        return;
    };
    let Some(analysis) = state.analysis.as_ref() else {
        return;
    };

    let result = export::export_file(&path, analysis);
    match result {
        Ok(()) => {
            state.status_message = None;
            state.remember_dir(&path);
        }
        Err(e) => state.report_error("Export failed", &e),
    }
}
