use std::path::PathBuf;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use palette::{Hsl, IntoColor, Srgb};

const WIDTH: u32 = 600;
const HEIGHT: u32 = 40;
const START_NM: f64 = 400.0;
const END_NM: f64 = 700.0;

/// Absorbance contributed by one band `(centre_nm, width_nm, peak)` at `nm`.
fn band_absorbance(nm: f64, (centre, width, peak): (f64, f64, f64)) -> f64 {
    let z = (nm - centre) / width;
    peak * (-0.5 * z * z).exp()
}

/// Seeded sensor noise, so repeated runs write identical files.
struct SensorNoise {
    state: u64,
}

impl SensorNoise {
    fn new(seed: u64) -> Self {
        SensorNoise { state: seed }
    }

    /// Uniform in [0, 1), splitmix64 underneath.
    fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normally distributed sample with standard deviation `sigma`.
    fn gauss(&mut self, sigma: f64) -> f64 {
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        sigma * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// Wavelength of column `x` under a linear calibration.
fn column_wavelength(x: u32) -> f64 {
    START_NM + (END_NM - START_NM) * x as f64 / (WIDTH - 1) as f64
}

/// Violet on the left, red on the right, like a grating's first order.
fn strip_color(x: u32) -> [f64; 3] {
    let t = x as f32 / (WIDTH - 1) as f32;
    let hsl = Hsl::new((1.0 - t) * 270.0, 1.0, 0.5);
    let rgb: Srgb = hsl.into_color();
    [
        rgb.red as f64 * 255.0,
        rgb.green as f64 * 255.0,
        rgb.blue as f64 * 255.0,
    ]
}

fn to_pixel(c: [f64; 3]) -> Rgb<u8> {
    Rgb(c.map(|v| v.round().clamp(0.0, 255.0) as u8))
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir).context("creating output directory")?;

    let mut noise = SensorNoise::new(42);

    // Absorption bands of the synthetic sample (centre nm, width nm, peak absorbance).
    let bands = [(530.0, 25.0, 0.6), (640.0, 15.0, 0.25)];

    let reference = RgbImage::from_fn(WIDTH, HEIGHT, |x, _| to_pixel(strip_color(x)));

    let sample = RgbImage::from_fn(WIDTH, HEIGHT, |x, _| {
        let nm = column_wavelength(x);
        let absorbance: f64 = bands.iter().map(|&band| band_absorbance(nm, band)).sum();
        let transmission = 10f64.powf(-absorbance);
        let color = strip_color(x).map(|v| v * transmission + noise.gauss(1.5));
        to_pixel(color)
    });

    let reference_path = out_dir.join("reference.png");
    let sample_path = out_dir.join("sample.png");
    reference
        .save(&reference_path)
        .with_context(|| format!("writing {}", reference_path.display()))?;
    sample
        .save(&sample_path)
        .with_context(|| format!("writing {}", sample_path.display()))?;

    println!(
        "Wrote {WIDTH}x{HEIGHT} strips ({START_NM}–{END_NM} nm) to {} and {}",
        reference_path.display(),
        sample_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_seeded() {
        let mut a = SensorNoise::new(7);
        let mut b = SensorNoise::new(7);
        for _ in 0..100 {
            let u = a.next_f64();
            assert!((0.0..1.0).contains(&u));
            assert_eq!(u, b.next_f64());
        }
    }

    #[test]
    fn test_noise_is_roughly_standard() {
        let mut noise = SensorNoise::new(42);
        let samples: Vec<f64> = (0..20_000).map(|_| noise.gauss(1.5)).collect();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.1);
        assert!((var.sqrt() - 1.5).abs() < 0.05);
    }

    #[test]
    fn test_band_peaks_at_its_centre() {
        let band = (530.0, 25.0, 0.6);
        assert_eq!(band_absorbance(530.0, band), 0.6);
        assert!(band_absorbance(505.0, band) < 0.6);
        assert!((band_absorbance(505.0, band) - band_absorbance(555.0, band)).abs() < 1e-12);
    }
}
