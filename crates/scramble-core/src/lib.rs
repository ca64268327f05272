//! Row-permutation scrambling for raster images.
//!
//! This crate provides the building blocks of the line-scrambling toy cipher:
//! - Pixel and grayscale grids shared across the workspace.
//! - The affine key-to-permutation generator.
//! - Forward and inverse row reordering.
//! - A whole-image pixel distance used as a diagnostic.
//!
//! The scheme is an obfuscation exercise, not a cipher; a 15-bit key space is
//! small enough to search exhaustively (see the `scramble-break` crate).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod distance;
mod error;
mod gray;
mod key;
mod lines;
mod permutation;
mod pixel;

pub use crate::distance::pixel_distance;
pub use crate::error::Error;
pub use crate::gray::{to_grayscale, GrayscaleGrid};
pub use crate::key::Key;
pub use crate::lines::{scramble_lines, unscramble_lines};
pub use crate::permutation::Permutation;
pub use crate::pixel::{Argb, PixelGrid};
