use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Display colours for spectral data
// ---------------------------------------------------------------------------

/// Rough visible colour of a wavelength, for swatches only.
///
/// Hue runs from red (≥ 700 nm) to violet (≤ 400 nm); outside the visible band
/// the colour is greyed out.
pub fn wavelength_color(nm: f64) -> Color32 {
    let t = ((700.0 - nm) / 300.0).clamp(0.0, 1.0) as f32;
    let saturation = if (380.0..=780.0).contains(&nm) { 0.9 } else { 0.15 };
    hsl_to_color32(t * 270.0, saturation, 0.5)
}

/// Opaque egui colour from 8-bit RGB.
pub fn rgb_to_color32([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
