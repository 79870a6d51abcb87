use super::calibration::CalibrationTable;
use super::columns::Rgb;
use super::error::{Result, SpectralError};

/// Wavelength of the calibrated colour nearest to `color`.
///
/// Fails with [`SpectralError::NotInitialized`] when there is no table yet.
/// For a fixed table the answer for a given colour never changes; among
/// equidistant entries the lowest column wins.
pub fn resolve_wavelength(color: Rgb, table: Option<&CalibrationTable>) -> Result<f64> {
    let table = table.ok_or(SpectralError::NotInitialized)?;
    if !color.is_finite() {
        return Err(SpectralError::invalid(format!(
            "cannot resolve non-finite colour {color:?}"
        )));
    }
    table
        .nearest_entry(color)
        .map(|entry| entry.wavelength_nm)
        .ok_or(SpectralError::NotInitialized)
}
