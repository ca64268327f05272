//! Conversion between image files and [`PixelGrid`].

use std::path::{Path, PathBuf};

use image::{ImageError, ImageFormat, ImageReader, Rgba, RgbaImage};
use scramble_core::{Argb, PixelGrid};
use thiserror::Error;

/// Failures while reading or writing image files.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input path does not resolve to a decodable image.
    #[error("image not found or not decodable: {}", .path.display())]
    ImageNotFound {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The output image could not be persisted.
    #[error("failed to write image {}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Grid(#[from] scramble_core::Error),
}

/// Decodes any supported format into ARGB pixels; missing alpha reads as opaque.
///
/// The format is sniffed from the file contents, so outputs written by
/// [`save`] load back whatever their extension.
pub fn load(path: &Path) -> Result<PixelGrid, CodecError> {
    let decoded = decode(path).map_err(|source| CodecError::ImageNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels = rgba
        .pixels()
        .map(|&Rgba([r, g, b, a])| Argb::new(a, r, g, b))
        .collect();
    Ok(PixelGrid::new(width as usize, height as usize, pixels)?)
}

fn decode(path: &Path) -> Result<image::DynamicImage, ImageError> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}

/// Encodes `grid` as PNG, whatever the extension of `path`.
pub fn save(grid: &PixelGrid, path: &Path) -> Result<(), CodecError> {
    let buffer = RgbaImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        let px = grid.get(x as usize, y as usize);
        Rgba([px.r, px.g, px.b, px.a])
    });
    buffer
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| CodecError::WriteFailure {
            path: path.to_path_buf(),
            source,
        })
}
