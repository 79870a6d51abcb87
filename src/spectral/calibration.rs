use serde::{Deserialize, Serialize};

use super::columns::{average_columns, Rgb};
use super::error::{Result, SpectralError};
use super::grid::PixelGrid;
use super::index::ColorIndex;

// ---------------------------------------------------------------------------
// WavelengthRange
// ---------------------------------------------------------------------------

/// Wavelengths assigned to the first and last column of a reference image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavelengthRange {
    pub start_nm: f64,
    pub end_nm: f64,
}

impl Default for WavelengthRange {
    /// Approximate visible band.
    fn default() -> Self {
        WavelengthRange {
            start_nm: 400.0,
            end_nm: 700.0,
        }
    }
}

impl WavelengthRange {
    pub fn new(start_nm: f64, end_nm: f64) -> Result<Self> {
        let range = WavelengthRange { start_nm, end_nm };
        range.validate()?;
        Ok(range)
    }

    /// Both ends finite and `start_nm < end_nm`.
    pub fn validate(&self) -> Result<()> {
        if !self.start_nm.is_finite() || !self.end_nm.is_finite() {
            return Err(SpectralError::invalid(format!(
                "wavelength range {}–{} nm is not finite",
                self.start_nm, self.end_nm
            )));
        }
        if self.start_nm >= self.end_nm {
            return Err(SpectralError::invalid(format!(
                "wavelength range must increase, got {}–{} nm",
                self.start_nm, self.end_nm
            )));
        }
        Ok(())
    }

    /// `n` evenly spaced wavelengths from `start_nm` to `end_nm` inclusive.
    /// A single sample sits at `start_nm`.
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.start_nm],
            _ => {
                let span = self.end_nm - self.start_nm;
                let last = (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.end_nm
                        } else {
                            self.start_nm + span * (i as f64 / last)
                        }
                    })
                    .collect()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CalibrationTable
// ---------------------------------------------------------------------------

/// One reference column: its assigned wavelength and its average colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationEntry {
    pub wavelength_nm: f64,
    pub color: Rgb,
}

/// Wavelength ↔ colour correspondence of a reference capture.
///
/// The entries and the colour index are built together and never mutated:
/// index slot `i` always names `entries[i]`.
#[derive(Debug, Clone)]
pub struct CalibrationTable {
    entries: Vec<CalibrationEntry>,
    index: ColorIndex,
    range: WavelengthRange,
}

impl CalibrationTable {
    fn from_entries(entries: Vec<CalibrationEntry>, range: WavelengthRange) -> Self {
        let colors: Vec<Rgb> = entries.iter().map(|e| e.color).collect();
        let index = ColorIndex::build(&colors);
        CalibrationTable {
            entries,
            index,
            range,
        }
    }

    /// Entries in column order (strictly increasing wavelength).
    pub fn entries(&self) -> &[CalibrationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn range(&self) -> WavelengthRange {
        self.range
    }

    /// Entry whose colour is closest to `color`.
    pub fn nearest_entry(&self, color: Rgb) -> Option<&CalibrationEntry> {
        self.index.nearest(color).and_then(|slot| self.entries.get(slot))
    }
}

/// Calibrate a reference image: column `x` gets the `x`-th of `width` evenly
/// spaced wavelengths across `range`, paired with that column's mean colour.
pub fn build_calibration(grid: &PixelGrid, range: WavelengthRange) -> Result<CalibrationTable> {
    range.validate()?;
    let colors = average_columns(grid)?;
    let wavelengths = range.linspace(colors.len());

    let entries: Vec<CalibrationEntry> = wavelengths
        .into_iter()
        .zip(colors)
        .map(|(wavelength_nm, color)| CalibrationEntry {
            wavelength_nm,
            color,
        })
        .collect();

    log::debug!(
        "Calibrated {} columns over {}–{} nm",
        entries.len(),
        range.start_nm,
        range.end_nm
    );
    Ok(CalibrationTable::from_entries(entries, range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::resolver::resolve_wavelength;
    use approx::assert_relative_eq;

    /// Single-row strip going from pure red to pure blue.
    fn red_to_blue_strip(width: usize) -> PixelGrid {
        PixelGrid::from_fn(1, width, |_, x| {
            let t = x as f64 / (width - 1) as f64;
            [
                (255.0 * (1.0 - t)).round() as u8,
                0,
                (255.0 * t).round() as u8,
            ]
        })
    }

    #[test]
    fn test_red_to_blue_five_columns() {
        let table = build_calibration(&red_to_blue_strip(5), WavelengthRange::default()).unwrap();
        let wavelengths: Vec<f64> = table.entries().iter().map(|e| e.wavelength_nm).collect();

        assert_eq!(table.len(), 5);
        for (got, want) in wavelengths.iter().zip([400.0, 475.0, 550.0, 625.0, 700.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
        assert_eq!(table.entries()[0].color, Rgb::new(255.0, 0.0, 0.0));
        assert_eq!(table.entries()[4].color, Rgb::new(0.0, 0.0, 255.0));
    }

    #[test]
    fn test_red_to_blue_strip_resolves_its_ends() {
        let table = build_calibration(&red_to_blue_strip(5), WavelengthRange::default()).unwrap();

        let red = resolve_wavelength(Rgb::new(255.0, 0.0, 0.0), Some(&table)).unwrap();
        let blue = resolve_wavelength(Rgb::new(0.0, 0.0, 255.0), Some(&table)).unwrap();
        assert_relative_eq!(red, 400.0);
        assert_relative_eq!(blue, 700.0);
        // the middle column is an even red/blue mix
        let purple = resolve_wavelength(Rgb::new(128.0, 0.0, 128.0), Some(&table)).unwrap();
        assert_relative_eq!(purple, 550.0);
    }

    #[test]
    fn test_wavelengths_strictly_increase() {
        let grid = PixelGrid::from_fn(3, 640, |y, x| [(x % 256) as u8, y as u8, 7]);
        let table = build_calibration(&grid, WavelengthRange::new(380.0, 780.0).unwrap()).unwrap();

        assert_eq!(table.len(), 640);
        assert!(table
            .entries()
            .windows(2)
            .all(|w| w[0].wavelength_nm < w[1].wavelength_nm));
        assert_eq!(table.entries()[0].wavelength_nm, 380.0);
        assert_eq!(table.entries()[639].wavelength_nm, 780.0);
    }

    #[test]
    fn test_single_column_sits_at_range_start() {
        let grid = PixelGrid::from_fn(4, 1, |_, _| [9, 9, 9]);
        let table = build_calibration(&grid, WavelengthRange::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].wavelength_nm, 400.0);
    }

    #[test]
    fn test_index_slots_match_entries() {
        let grid = PixelGrid::from_fn(2, 50, |_, x| [(x * 5) as u8, 255 - (x * 5) as u8, 0]);
        let table = build_calibration(&grid, WavelengthRange::default()).unwrap();
        for entry in table.entries() {
            let found = table.nearest_entry(entry.color).unwrap();
            assert_eq!(found, entry);
        }
    }

    #[test]
    fn test_empty_grid_is_invalid() {
        let grid = PixelGrid::from_raw(0, 0, Vec::new()).unwrap();
        assert!(matches!(
            build_calibration(&grid, WavelengthRange::default()),
            Err(SpectralError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(WavelengthRange::new(700.0, 400.0).is_err());
        assert!(WavelengthRange::new(500.0, 500.0).is_err());
        assert!(WavelengthRange::new(f64::NAN, 500.0).is_err());

        let grid = red_to_blue_strip(5);
        let bad = WavelengthRange {
            start_nm: 700.0,
            end_nm: 400.0,
        };
        assert!(matches!(
            build_calibration(&grid, bad),
            Err(SpectralError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_linspace_edges() {
        let range = WavelengthRange::default();
        assert!(range.linspace(0).is_empty());
        assert_eq!(range.linspace(1), vec![400.0]);
        assert_eq!(range.linspace(2), vec![400.0, 700.0]);
    }
}
