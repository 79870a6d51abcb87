use std::fmt::Display;
use std::path::Path;

use eframe::egui::TextureHandle;
use spectro_panda::config::{self, Settings};
use spectro_panda::spectral::{
    Analysis, PixelGrid, ReferenceStore, Rgb, SpectralError, WavelengthRange,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A decoded sample image and where it came from.
pub struct LoadedSample {
    pub grid: PixelGrid,
    pub source: String,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Current reference calibration (shared, swapped as a whole).
    pub store: ReferenceStore,

    /// Persisted preferences.
    pub settings: Settings,

    /// Range being edited in the side panel; used by the next calibration.
    pub range_input: WavelengthRange,

    /// Last sample loaded (None until the user loads one).
    pub sample: Option<LoadedSample>,

    /// Result for the current reference + sample pair.
    pub analysis: Option<Analysis>,

    /// Colour picked in the probe widget.
    pub probe_color: [u8; 3],

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Preview textures, dropped whenever the image changes.
    pub reference_preview: Option<TextureHandle>,
    pub sample_preview: Option<TextureHandle>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            store: ReferenceStore::new(),
            range_input: settings.wavelength_range,
            settings,
            sample: None,
            analysis: None,
            probe_color: [255, 0, 0],
            status_message: None,
            reference_preview: None,
            sample_preview: None,
        }
    }

    /// Calibrate a new reference and re-run the current sample against it.
    pub fn set_reference(&mut self, grid: PixelGrid, source: String) -> Result<(), SpectralError> {
        self.store
            .set_reference(grid, self.range_input, Some(source))?;
        self.settings.wavelength_range = self.range_input;
        self.reference_preview = None;
        self.status_message = None;
        self.reanalyze();
        Ok(())
    }

    /// Analyse a new sample. The previous sample is kept if this fails.
    pub fn set_sample(&mut self, grid: PixelGrid, source: String) -> Result<(), SpectralError> {
        let analysis = self.store.analyze_sample(&grid)?;
        log::info!("Analysed {source}: {} absorbance points", analysis.absorbance.len());
        self.sample = Some(LoadedSample { grid, source });
        self.analysis = Some(analysis);
        self.sample_preview = None;
        self.status_message = None;
        Ok(())
    }

    /// Rebuild the calibration from the current reference with `range_input`.
    pub fn recalibrate(&mut self) -> Result<(), SpectralError> {
        self.store.recalibrate(self.range_input)?;
        self.settings.wavelength_range = self.range_input;
        self.status_message = None;
        self.reanalyze();
        Ok(())
    }

    fn reanalyze(&mut self) {
        let Some(sample) = &self.sample else {
            return;
        };
        match self.store.analyze_sample(&sample.grid) {
            Ok(analysis) => self.analysis = Some(analysis),
            Err(e) => {
                self.analysis = None;
                self.report_error("Re-analysis failed", &e);
            }
        }
    }

    /// Wavelength the probe colour resolves to under the current calibration.
    pub fn probe_wavelength(&self) -> Result<f64, SpectralError> {
        self.store.resolve_wavelength(Rgb::from(self.probe_color))
    }

    /// Log an error and show it in the status line.
    pub fn report_error(&mut self, context: &str, err: &dyn Display) {
        log::error!("{context}: {err:#}");
        self.status_message = Some(format!("Error: {err:#}"));
    }

    /// Remember the directory of `path` for the next file dialog.
    pub fn remember_dir(&mut self, path: &Path) {
        self.settings.last_dir = path.parent().map(Path::to_path_buf);
        self.persist_settings();
    }

    pub fn persist_settings(&self) {
        if let Err(e) = config::save_settings(&self.settings) {
            log::warn!("Could not save settings: {e:#}");
        }
    }
}
