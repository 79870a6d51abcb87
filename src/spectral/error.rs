use thiserror::Error;

/// Failures raised by the spectral core.
#[derive(Debug, Error)]
pub enum SpectralError {
    /// Empty or degenerate input (zero-sized grid, bad buffer, bad range).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A lookup was attempted before any reference was calibrated.
    #[error("no reference spectrum has been calibrated yet")]
    NotInitialized,

    /// Passed through untouched from the image decoder.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

impl SpectralError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SpectralError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SpectralError>;
