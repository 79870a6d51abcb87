//! Spectro Panda core library.
//!
//! Estimates a sample's absorbance spectrum from two photographed light
//! strips: a reference strip calibrates colour → wavelength, the sample strip
//! is read back through that calibration.

pub mod config;
pub mod data;
pub mod spectral;
