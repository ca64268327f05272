//! Single-channel intensity grid used by the key-recovery scorers.

use crate::pixel::{Argb, PixelGrid};

/// Rectangular grid of 8-bit intensities stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayscaleGrid {
    width: usize,
    height: usize,
    levels: Vec<u8>,
}

impl GrayscaleGrid {
    /// Builds a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut levels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                levels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            levels,
        }
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns row `y` as a slice of intensities.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.levels[start..start + self.width]
    }
}

/// Integer luma with weights 299/587/114 per mille, truncated.
#[inline]
pub fn luma(px: Argb) -> u8 {
    let weighted = px.r as u32 * 299 + px.g as u32 * 587 + px.b as u32 * 114;
    // max is 255 * 1000 / 1000, so the quotient always fits.
    (weighted / 1000) as u8
}

/// Reduces a colour grid to intensities; alpha is ignored.
pub fn to_grayscale(image: &PixelGrid) -> GrayscaleGrid {
    GrayscaleGrid {
        width: image.width(),
        height: image.height(),
        levels: image.pixels().iter().copied().map(luma).collect(),
    }
}
