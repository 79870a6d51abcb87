use std::path::Path;

use crate::spectral::{PixelGrid, SpectralError};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// File extensions the decoder is built with.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Decode an image file into an RGB pixel grid.
///
/// Alpha is dropped and grey images are expanded to RGB. Decoder failures
/// come back as [`SpectralError::Decode`] unchanged.
pub fn load_grid(path: &Path) -> Result<PixelGrid, SpectralError> {
    let img = image::open(path)?;
    let rgb = img.to_rgb8();
    log::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        rgb.width(),
        rgb.height()
    );
    PixelGrid::try_from(rgb)
}

/// Decode in-memory image bytes (format guessed from the content).
pub fn decode_grid(bytes: &[u8]) -> Result<PixelGrid, SpectralError> {
    let img = image::load_from_memory(bytes)?;
    PixelGrid::try_from(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png_bytes() {
        let img = RgbImage::from_fn(4, 2, |x, y| Rgb([x as u8 * 10, y as u8, 200]));
        let grid = decode_grid(&png_bytes(&img)).unwrap();

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.view()[[1, 3, 0]], 30);
        assert_eq!(grid.view()[[1, 3, 1]], 1);
    }

    #[test]
    fn test_garbage_bytes_are_decode_errors() {
        let result = decode_grid(b"definitely not an image");
        assert!(matches!(result, Err(SpectralError::Decode(_))));
    }

    #[test]
    fn test_load_rgba_file_drops_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("strip.png");
        RgbaImage::from_pixel(3, 1, Rgba([1, 2, 3, 0]))
            .save(&path)
            .unwrap();

        let grid = load_grid(&path).unwrap();
        assert_eq!(grid.to_rgb_bytes(), vec![1, 2, 3, 1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let dir = tempdir().unwrap();
        let result = load_grid(&dir.path().join("nope.png"));
        assert!(matches!(result, Err(SpectralError::Decode(_))));
    }
}
