use super::calibration::CalibrationTable;
use super::columns::average_columns;
use super::error::{Result, SpectralError};
use super::grid::PixelGrid;
use super::resolver::resolve_wavelength;

// ---------------------------------------------------------------------------
// Wavelength-indexed series
// ---------------------------------------------------------------------------

/// A signal sampled per image column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectralSeries {
    /// Wavelength axis (nm).
    pub wavelengths: Vec<f64>,
    /// Signal values – same length as `wavelengths`.
    pub values: Vec<f64>,
}

/// Rec.709 luminance per column, keyed by resolved wavelength.
pub type IntensitySeries = SpectralSeries;

/// log₁₀(reference / sample) per position, on the reference wavelength axis.
pub type AbsorbanceSeries = SpectralSeries;

impl SpectralSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `[wavelength, value]` pairs, ready for plotting.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.wavelengths
            .iter()
            .zip(&self.values)
            .map(|(&x, &y)| [x, y])
    }
}

/// Everything computed for one sample against one reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub reference: IntensitySeries,
    pub sample: IntensitySeries,
    pub absorbance: AbsorbanceSeries,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Resolve each column's mean colour against `table` and take its luminance.
pub fn intensity_series(grid: &PixelGrid, table: &CalibrationTable) -> Result<IntensitySeries> {
    let colors = average_columns(grid)?;
    let mut series = IntensitySeries {
        wavelengths: Vec::with_capacity(colors.len()),
        values: Vec::with_capacity(colors.len()),
    };
    for color in colors {
        series.wavelengths.push(resolve_wavelength(color, Some(table))?);
        series.values.push(color.luminance());
    }
    Ok(series)
}

/// Absorbance for one position.
///
/// A zero intensity on either side yields exactly `0.0` instead of ±∞ or NaN.
/// This floor is a deliberate departure from Beer–Lambert, not a measurement.
pub fn absorbance_at(reference: f64, sample: f64) -> f64 {
    if reference == 0.0 || sample == 0.0 {
        0.0
    } else {
        (reference / sample).log10()
    }
}

/// Compute both intensity series and the absorbance between them.
///
/// Series are aligned by column position, not by wavelength value; the result
/// has `min(reference width, sample width)` points and uses the reference
/// wavelengths.
pub fn analyze(
    reference: &PixelGrid,
    sample: &PixelGrid,
    table: Option<&CalibrationTable>,
) -> Result<Analysis> {
    let table = table.ok_or(SpectralError::NotInitialized)?;
    if reference.is_empty() {
        return Err(SpectralError::invalid(format!(
            "reference image is empty ({}x{})",
            reference.width(),
            reference.height()
        )));
    }
    if sample.is_empty() {
        return Err(SpectralError::invalid(format!(
            "sample image is empty ({}x{})",
            sample.width(),
            sample.height()
        )));
    }
    if reference.width() != sample.width() {
        log::warn!(
            "Reference is {} px wide but sample is {} px; absorbance is aligned by column, \
             wavelengths may not line up",
            reference.width(),
            sample.width()
        );
    }

    let reference_series = intensity_series(reference, table)?;
    let sample_series = intensity_series(sample, table)?;

    let n = reference_series.len().min(sample_series.len());
    let absorbance = AbsorbanceSeries {
        wavelengths: reference_series.wavelengths[..n].to_vec(),
        values: reference_series.values[..n]
            .iter()
            .zip(&sample_series.values[..n])
            .map(|(&r, &s)| absorbance_at(r, s))
            .collect(),
    };

    log::debug!("Absorbance computed over {n} positions");
    Ok(Analysis {
        reference: reference_series,
        sample: sample_series,
        absorbance,
    })
}

/// Absorbance of `sample` against `reference` (see [`analyze`]).
pub fn compute_absorbance(
    reference: &PixelGrid,
    sample: &PixelGrid,
    table: Option<&CalibrationTable>,
) -> Result<AbsorbanceSeries> {
    analyze(reference, sample, table).map(|analysis| analysis.absorbance)
}
