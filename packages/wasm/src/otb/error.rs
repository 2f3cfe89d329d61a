//! OTB validation errors.

use thiserror::Error;

/// Rejection reasons for an OTB buffer, in the order they are checked.
///
/// All of them are permanent: presenting the same bytes again yields the
/// same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtbError {
    #[error("Invalid OTB file: File too small")]
    TooSmall,
    #[error("Invalid dimensions: Width and height must be greater than 0")]
    InvalidDimensions,
    #[error("Invalid OTB file: Expected {expected} bytes for bitmap data, got {actual}")]
    InsufficientBitmapData { expected: usize, actual: usize },
    #[error("Unsupported color depth: Only 1-bit OTB files are supported")]
    UnsupportedColorDepth(u8),
}
