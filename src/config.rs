use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::spectral::WavelengthRange;

/// Environment variable that points at an alternative settings file.
pub const CONFIG_ENV_VAR: &str = "SPECTRO_PANDA_CONFIG";

const APP_DIR: &str = "spectro-panda";
const SETTINGS_FILE: &str = "settings.json";

// ---------------------------------------------------------------------------
// Settings – persisted user preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Wavelengths of the first and last reference column.
    pub wavelength_range: WavelengthRange,
    pub window_width: f32,
    pub window_height: f32,
    /// Directory the last file dialog ended in.
    pub last_dir: Option<PathBuf>,
    /// Plot reference and sample intensities under the absorbance plot.
    pub show_intensities: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wavelength_range: WavelengthRange::default(),
            window_width: 1200.0,
            window_height: 800.0,
            last_dir: None,
            show_intensities: true,
        }
    }
}

/// `$SPECTRO_PANDA_CONFIG`, else `<config dir>/spectro-panda/settings.json`.
pub fn settings_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

/// Load settings, falling back to defaults when the file is missing or bad.
pub fn load_settings() -> Settings {
    let Some(path) = settings_path() else {
        log::warn!("No config directory available, using default settings");
        return Settings::default();
    };
    if !path.exists() {
        return Settings::default();
    }
    match load_from(&path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring settings at {}: {e:#}", path.display());
            Settings::default()
        }
    }
}

/// Persist settings to [`settings_path`].
pub fn save_settings(settings: &Settings) -> Result<()> {
    let path = settings_path().context("no config directory available")?;
    save_to(&path, settings)
}

pub fn load_from(path: &Path) -> Result<Settings> {
    let text = std::fs::read_to_string(path).context("reading settings file")?;
    let settings: Settings = serde_json::from_str(&text).context("parsing settings")?;
    if let Err(e) = settings.wavelength_range.validate() {
        log::warn!("Stored wavelength range rejected ({e}), using default");
        return Ok(Settings {
            wavelength_range: WavelengthRange::default(),
            ..settings
        });
    }
    Ok(settings)
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("creating config directory")?;
    }
    let text = serde_json::to_string_pretty(settings).context("serializing settings")?;
    std::fs::write(path, text).context("writing settings file")?;
    Ok(())
}
