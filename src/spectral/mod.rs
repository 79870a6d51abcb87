/// Spectral core: calibration, wavelength lookup and absorbance.
///
/// Architecture:
/// ```text
///   reference grid                 sample grid
///        │                              │
///        ▼                              ▼
///   ┌──────────┐                  ┌──────────┐
///   │ columns  │  mean RGB/column │ columns  │
///   └──────────┘                  └──────────┘
///        │                              │
///        ▼                              │
///   ┌─────────────┐                     │
///   │ calibration │  (λ, colour) + index│
///   └─────────────┘                     │
///        │            ┌──────────┐      │
///        └──────────▶ │ resolver │ ◀────┘   nearest colour → λ
///                     └──────────┘
///                          │
///                          ▼
///                   ┌────────────┐
///                   │ absorbance │  log10(I_ref / I_sample)
///                   └────────────┘
/// ```
///
/// The most recent calibration lives in a [`store::ReferenceStore`], which is
/// rebuilt off to the side and swapped in whole.

pub mod absorbance;
pub mod calibration;
pub mod columns;
pub mod error;
pub mod grid;
pub mod index;
pub mod resolver;
pub mod store;

pub use absorbance::{
    analyze, compute_absorbance, AbsorbanceSeries, Analysis, IntensitySeries, SpectralSeries,
};
pub use calibration::{build_calibration, CalibrationTable, WavelengthRange};
pub use columns::{average_columns, Rgb};
pub use error::SpectralError;
pub use grid::PixelGrid;
pub use resolver::resolve_wavelength;
pub use store::{CalibratedReference, ReferenceStore};
