//! Error types for the pixel adapter.

use thiserror::Error;

/// Errors raised when parsing pixel colors or coordinates.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PixelError {
    /// Color text was not `r,g,b` or `#rrggbb` with channels in `0..=255`
    #[error("Invalid color: {input}")]
    InvalidColor { input: String },

    /// Key was not of the form `x,y` with unsigned coordinates
    #[error("Invalid pixel coordinate key: {key}")]
    InvalidCoordinate { key: String },
}

impl PixelError {
    /// Check if this error is a color parse failure
    pub fn is_color_error(&self) -> bool {
        matches!(self, PixelError::InvalidColor { .. })
    }

    /// Check if this error is a coordinate parse failure
    pub fn is_coordinate_error(&self) -> bool {
        matches!(self, PixelError::InvalidCoordinate { .. })
    }
}

impl From<PixelError> for crate::Error {
    fn from(err: PixelError) -> Self {
        crate::Error::Pixel(err)
    }
}
