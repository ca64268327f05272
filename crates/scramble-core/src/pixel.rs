//! Pixel grid representation.

use crate::error::Error;

/// One pixel with four 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Argb {
    /// Alpha channel.
    pub a: u8,
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Argb {
    /// Constructs a pixel from its channels.
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Opaque pixel with all three colour channels set to `level`.
    pub const fn gray(level: u8) -> Self {
        Self::new(0xff, level, level, level)
    }

    /// Unpacks a `0xAARRGGBB` word.
    pub const fn from_u32(word: u32) -> Self {
        Self::new(
            (word >> 24) as u8,
            (word >> 16) as u8,
            (word >> 8) as u8,
            word as u8,
        )
    }

    /// Packs the pixel into a `0xAARRGGBB` word.
    pub const fn to_u32(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Rectangular grid of [`Argb`] pixels stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<Argb>,
}

impl PixelGrid {
    /// Wraps a row-major pixel buffer, checking it holds `width * height` pixels.
    pub fn new(width: usize, height: usize, pixels: Vec<Argb>) -> Result<Self, Error> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(Error::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Allocates a grid with every pixel set to `fill`.
    pub fn filled(width: usize, height: usize, fill: Argb) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    /// Builds a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Argb) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
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

    /// Returns the pixel at column `x`, row `y`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Argb {
        self.pixels[y * self.width + x]
    }

    /// Returns row `y` as a slice.
    #[inline]
    pub fn row(&self, y: usize) -> &[Argb] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [Argb] {
        let start = y * self.width;
        &mut self.pixels[start..start + self.width]
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Argb] {
        &self.pixels
    }
}
