/// Data layer: getting images in and results out.
///
/// Architecture:
/// ```text
///  .png / .jpg                         .csv / .json / .parquet
///        │                                      ▲
///        ▼                                      │
///   ┌──────────┐                          ┌──────────┐
///   │  loader   │  decode → PixelGrid     │  export   │  Analysis → records
///   └──────────┘                          └──────────┘
///        │                                      ▲
///        ▼                                      │
///   ┌────────────────────────────────────────────────┐
///   │ spectral core  (calibrate / resolve / absorb)  │
///   └────────────────────────────────────────────────┘
/// ```

pub mod export;
pub mod loader;
