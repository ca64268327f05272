//! Whole-image dissimilarity diagnostic.

use crate::error::Error;
use crate::pixel::PixelGrid;

/// Normalization constant; maximally different 8-bit images score close to 100.
const NORMALIZER: f64 = 4.41;

/// Mean four-channel Euclidean pixel distance, scaled to roughly `0..=100`
/// and truncated.
pub fn pixel_distance(a: &PixelGrid, b: &PixelGrid) -> Result<u32, Error> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(Error::SizeMismatch {
            left_width: a.width(),
            left_height: a.height(),
            right_width: b.width(),
            right_height: b.height(),
        });
    }
    let total: f64 = a
        .pixels()
        .iter()
        .zip(b.pixels())
        .map(|(p, q)| {
            let da = p.a as i32 - q.a as i32;
            let dr = p.r as i32 - q.r as i32;
            let dg = p.g as i32 - q.g as i32;
            let db = p.b as i32 - q.b as i32;
            f64::from(da * da + dr * dr + dg * dg + db * db).sqrt()
        })
        .sum();
    let cells = (a.width() * a.height()) as f64;
    if cells == 0.0 {
        return Ok(0);
    }
    Ok((total / (cells * NORMALIZER)) as u32)
}
