use ndarray::Axis;

use super::error::{Result, SpectralError};
use super::grid::PixelGrid;

/// Rec.709 relative-luminance weights for R, G, B.
pub const REC709_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

// ---------------------------------------------------------------------------
// Rgb – floating point colour on the 0–255 scale
// ---------------------------------------------------------------------------

/// An averaged RGB colour. Channels stay on the 0–255 scale of the source
/// pixels; no colour-space conversion is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    /// Channel by axis number (0 = R, 1 = G, 2 = B).
    pub fn channel(&self, axis: usize) -> f64 {
        match axis {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    pub fn distance_squared(&self, other: Rgb) -> f64 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        dr * dr + dg * dg + db * db
    }

    /// Scalar brightness proxy used as the intensity of a column.
    pub fn luminance(&self) -> f64 {
        REC709_WEIGHTS[0] * self.r + REC709_WEIGHTS[1] * self.g + REC709_WEIGHTS[2] * self.b
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Nearest displayable 8-bit colour.
    pub fn to_u8(&self) -> [u8; 3] {
        let q = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb::new(r as f64, g as f64, b as f64)
    }
}

// ---------------------------------------------------------------------------
// Column averaging
// ---------------------------------------------------------------------------

/// Mean colour of every column, left to right.
///
/// Fails with [`SpectralError::InvalidInput`] when the grid has no rows or no
/// columns.
pub fn average_columns(grid: &PixelGrid) -> Result<Vec<Rgb>> {
    if grid.is_empty() {
        return Err(SpectralError::invalid(format!(
            "cannot average columns of a {}x{} image",
            grid.width(),
            grid.height()
        )));
    }

    let rows = grid.height() as f64;
    let averages = grid
        .view()
        .axis_iter(Axis(1))
        .map(|column| {
            let mut sum = [0.0f64; 3];
            for pixel in column.outer_iter() {
                for (acc, &v) in sum.iter_mut().zip(pixel.iter()) {
                    *acc += v as f64;
                }
            }
            Rgb::new(sum[0] / rows, sum[1] / rows, sum[2] / rows)
        })
        .collect();

    Ok(averages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_average_columns_per_channel_mean() {
        // 2 rows x 2 columns
        let grid = PixelGrid::from_raw(
            2,
            2,
            vec![
                10, 20, 30, 0, 0, 0, // row 0
                30, 40, 50, 255, 1, 2, // row 1
            ],
        )
        .unwrap();

        let avg = average_columns(&grid).unwrap();
        assert_eq!(avg.len(), 2);
        assert_eq!(avg[0], Rgb::new(20.0, 30.0, 40.0));
        assert_relative_eq!(avg[1].r, 127.5);
        assert_relative_eq!(avg[1].g, 0.5);
        assert_relative_eq!(avg[1].b, 1.0);
    }

    #[test]
    fn test_average_columns_length_matches_width() {
        let grid = PixelGrid::from_fn(7, 13, |y, x| [x as u8, y as u8, 0]);
        let avg = average_columns(&grid).unwrap();
        assert_eq!(avg.len(), 13);
        assert_relative_eq!(avg[12].r, 12.0);
        assert_relative_eq!(avg[5].g, 3.0);
    }

    #[test]
    fn test_zero_width_grid_is_invalid() {
        let grid = PixelGrid::from_raw(3, 0, Vec::new()).unwrap();
        assert!(matches!(
            average_columns(&grid),
            Err(SpectralError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_height_grid_is_invalid() {
        let grid = PixelGrid::from_raw(0, 5, Vec::new()).unwrap();
        assert!(matches!(
            average_columns(&grid),
            Err(SpectralError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_luminance_weights() {
        assert_relative_eq!(Rgb::new(255.0, 255.0, 255.0).luminance(), 255.0, epsilon = 1e-9);
        assert_relative_eq!(Rgb::new(100.0, 0.0, 0.0).luminance(), 21.26, epsilon = 1e-9);
        assert_relative_eq!(Rgb::new(0.0, 0.0, 100.0).luminance(), 7.22, epsilon = 1e-9);
        assert_eq!(Rgb::default().luminance(), 0.0);
    }

    #[test]
    fn test_to_u8_rounds_and_clamps() {
        assert_eq!(Rgb::new(127.5, -3.0, 300.0).to_u8(), [128, 0, 255]);
    }
}
