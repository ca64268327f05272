//! Error type shared by the scrambling primitives.

use thiserror::Error;

/// Failures raised by grid construction, key decoding and row reordering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The permutation length does not match the image height.
    #[error("permutation length {permutation} does not match image height {height}")]
    DimensionMismatch {
        /// Length of the permutation supplied.
        permutation: usize,
        /// Height of the image it was applied to.
        height: usize,
    },
    /// Two images compared pixel by pixel have different dimensions.
    #[error("image sizes differ: {left_width}x{left_height} vs {right_width}x{right_height}")]
    SizeMismatch {
        /// Width of the first image.
        left_width: usize,
        /// Height of the first image.
        left_height: usize,
        /// Width of the second image.
        right_width: usize,
        /// Height of the second image.
        right_height: usize,
    },
    /// The pixel buffer does not hold exactly `width * height` values.
    #[error("expected {expected} pixels, got {actual}")]
    PixelCount {
        /// `width * height`.
        expected: usize,
        /// Length of the buffer supplied.
        actual: usize,
    },
    /// A permutation was requested for zero rows.
    #[error("permutation size must be greater than zero")]
    EmptyPermutation,
    /// A permutation entry points outside `[0, len)`.
    #[error("permutation entry {position} is {value}, outside 0..{len}")]
    IndexOutOfRange {
        /// Position of the offending entry.
        position: usize,
        /// Value stored at that position.
        value: usize,
        /// Permutation length.
        len: usize,
    },
    /// Keys are non-negative; negative values are rejected before masking.
    #[error("key must not be negative (got {0})")]
    NegativeKey(i64),
    /// The key text is not a decimal integer.
    #[error("key {0:?} is not a decimal integer")]
    InvalidKey(String),
}
