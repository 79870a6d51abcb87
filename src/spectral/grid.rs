use image::RgbImage;
use ndarray::{aview1, s, Array3, ArrayView3};

use super::error::{Result, SpectralError};

// ---------------------------------------------------------------------------
// PixelGrid – decoded RGB image, (height, width, 3)
// ---------------------------------------------------------------------------

/// A dense 8-bit RGB image laid out as `(row, column, channel)`.
///
/// Zero-sized grids are representable on purpose; the pipeline stages are the
/// ones that reject them.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    pixels: Array3<u8>,
}

impl PixelGrid {
    /// Wrap a row-major `RGBRGB…` buffer.
    pub fn from_raw(height: usize, width: usize, data: Vec<u8>) -> Result<Self> {
        let len = data.len();
        Array3::from_shape_vec((height, width, 3), data)
            .map(|pixels| PixelGrid { pixels })
            .map_err(|_| {
                SpectralError::invalid(format!(
                    "pixel buffer of {len} bytes does not match a {width}x{height} RGB image"
                ))
            })
    }

    /// Build a grid by evaluating `f(row, column)` for every pixel.
    pub fn from_fn(height: usize, width: usize, mut f: impl FnMut(usize, usize) -> [u8; 3]) -> Self {
        let mut pixels = Array3::zeros((height, width, 3));
        for y in 0..height {
            for x in 0..width {
                let rgb = f(y, x);
                pixels.slice_mut(s![y, x, ..]).assign(&aview1(&rgb));
            }
        }
        PixelGrid { pixels }
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    /// True when the grid has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    /// Row-major `RGBRGB…` bytes, e.g. for uploading a preview texture.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().copied().collect()
    }
}

/// Takes over the image's buffer, which is already row-major `RGBRGB…`.
impl TryFrom<RgbImage> for PixelGrid {
    type Error = SpectralError;

    fn try_from(img: RgbImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        PixelGrid::from_raw(height as usize, width as usize, img.into_raw())
    }
}
