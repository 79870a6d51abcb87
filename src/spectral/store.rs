use std::sync::{Arc, PoisonError, RwLock};

use super::absorbance::{analyze, Analysis};
use super::calibration::{build_calibration, CalibrationTable, WavelengthRange};
use super::columns::Rgb;
use super::error::{Result, SpectralError};
use super::grid::PixelGrid;
use super::resolver::resolve_wavelength;

// ---------------------------------------------------------------------------
// CalibratedReference – a reference image and the table built from it
// ---------------------------------------------------------------------------

/// A reference capture together with its calibration. Immutable once built.
#[derive(Debug)]
pub struct CalibratedReference {
    pub grid: PixelGrid,
    pub table: CalibrationTable,
    /// Where the image came from (file name), for display only.
    pub source: Option<String>,
}

impl CalibratedReference {
    pub fn new(grid: PixelGrid, range: WavelengthRange, source: Option<String>) -> Result<Self> {
        let table = build_calibration(&grid, range)?;
        Ok(CalibratedReference {
            grid,
            table,
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// ReferenceStore – the most recent calibration, shared by all analyses
// ---------------------------------------------------------------------------

/// Holds the current [`CalibratedReference`].
///
/// A new reference is calibrated completely before it is published with a
/// single pointer swap, so readers see either the old or the new reference,
/// never a half-built one. Cloning the store shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    current: Arc<RwLock<Option<Arc<CalibratedReference>>>>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calibrate `grid` and make it the current reference. On error the
    /// previous reference stays in place.
    pub fn set_reference(
        &self,
        grid: PixelGrid,
        range: WavelengthRange,
        source: Option<String>,
    ) -> Result<Arc<CalibratedReference>> {
        let reference = Arc::new(CalibratedReference::new(grid, range, source)?);
        self.publish(Arc::clone(&reference));
        log::info!(
            "Reference calibrated: {} entries over {}–{} nm",
            reference.table.len(),
            range.start_nm,
            range.end_nm
        );
        Ok(reference)
    }

    /// Rebuild the current reference with a different wavelength range.
    ///
    /// If another reference is published while the rebuild runs, the rebuild
    /// is redone on top of that one instead of overwriting it.
    pub fn recalibrate(&self, range: WavelengthRange) -> Result<Arc<CalibratedReference>> {
        loop {
            let current = self.snapshot().ok_or(SpectralError::NotInitialized)?;
            let rebuilt = Arc::new(CalibratedReference::new(
                current.grid.clone(),
                range,
                current.source.clone(),
            )?);
            if self.replace_if_current(&current, Arc::clone(&rebuilt)) {
                log::info!(
                    "Reference recalibrated: {} entries over {}–{} nm",
                    rebuilt.table.len(),
                    range.start_nm,
                    range.end_nm
                );
                return Ok(rebuilt);
            }
            log::debug!("Reference replaced during recalibration, rebuilding");
        }
    }

    /// The reference in effect right now, if any.
    pub fn snapshot(&self) -> Option<Arc<CalibratedReference>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_calibrated(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Resolve a colour against the current calibration.
    pub fn resolve_wavelength(&self, color: Rgb) -> Result<f64> {
        let reference = self.snapshot();
        resolve_wavelength(color, reference.as_deref().map(|r| &r.table))
    }

    /// Analyse `sample` against the current reference image and table.
    pub fn analyze_sample(&self, sample: &PixelGrid) -> Result<Analysis> {
        let reference = self.snapshot().ok_or(SpectralError::NotInitialized)?;
        analyze(&reference.grid, sample, Some(&reference.table))
    }

    fn publish(&self, reference: Arc<CalibratedReference>) {
        // The slot only ever holds a complete value, so a poisoned lock is safe to reuse.
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(reference);
    }

    /// Swap in `reference` only while `expected` is still the current one.
    fn replace_if_current(
        &self,
        expected: &Arc<CalibratedReference>,
        reference: Arc<CalibratedReference>,
    ) -> bool {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(current) if Arc::ptr_eq(current, expected) => {
                *slot = Some(reference);
                true
            }
            _ => false,
        }
    }
}
