//! Row reordering (the scramble transform and its inverse).

use log::warn;

use crate::error::Error;
use crate::permutation::Permutation;
use crate::pixel::{Argb, PixelGrid};

fn check_height(image: &PixelGrid, perm: &Permutation) -> Result<(), Error> {
    if perm.len() != image.height() {
        return Err(Error::DimensionMismatch {
            permutation: perm.len(),
            height: image.height(),
        });
    }
    Ok(())
}

/// Writes row `y` of `image` to row `perm[y]` of a fresh grid.
///
/// With a non-bijective permutation, later rows overwrite earlier ones that
/// share a destination and unreached rows stay zeroed; the result can then no
/// longer be unscrambled.
pub fn scramble_lines(image: &PixelGrid, perm: &Permutation) -> Result<PixelGrid, Error> {
    check_height(image, perm)?;
    if !perm.is_bijective() {
        warn!(
            "scramble permutation over {} rows is not a bijection; rows will be lost",
            perm.len()
        );
    }
    let mut out = PixelGrid::filled(image.width(), image.height(), Argb::default());
    for y in 0..image.height() {
        out.row_mut(perm[y]).copy_from_slice(image.row(y));
    }
    Ok(out)
}

/// Reads row `y` of the output from row `perm[y]` of `image`.
pub fn unscramble_lines(image: &PixelGrid, perm: &Permutation) -> Result<PixelGrid, Error> {
    check_height(image, perm)?;
    let mut out = PixelGrid::filled(image.width(), image.height(), Argb::default());
    for y in 0..image.height() {
        out.row_mut(y).copy_from_slice(image.row(perm[y]));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn random_grid(rng: &mut impl RngCore, width: usize, height: usize) -> PixelGrid {
        PixelGrid::from_fn(width, height, |_, _| Argb::from_u32(rng.next_u32()))
    }

    #[test]
    fn scramble_moves_rows_to_their_destination() {
        let image = PixelGrid::from_fn(2, 3, |_, y| Argb::gray(y as u8));
        let perm = Permutation::from_indices(vec![2, 0, 1]).unwrap();
        let scrambled = scramble_lines(&image, &perm).unwrap();
        assert_eq!(scrambled.row(2), image.row(0));
        assert_eq!(scrambled.row(0), image.row(1));
        assert_eq!(scrambled.row(1), image.row(2));
    }

    #[test]
    fn roundtrip_restores_every_channel() {
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        for height in [1usize, 2, 8, 31, 64, 100] {
            let image = random_grid(&mut rng, 5, height);
            for raw in (0u16..32768).step_by(331) {
                let key = Key::new(raw);
                let perm = Permutation::generate(height, key).unwrap();
                if !perm.is_bijective() {
                    continue;
                }
                let scrambled = scramble_lines(&image, &perm).unwrap();
                let restored = unscramble_lines(&scrambled, &perm).unwrap();
                assert_eq!(restored, image, "height {height} key {raw}");
            }
        }
    }

    #[test]
    fn height_mismatch_is_fatal() {
        let image = PixelGrid::filled(4, 4, Argb::gray(9));
        let perm = Permutation::generate(5, Key::new(0)).unwrap();
        let expected = Error::DimensionMismatch {
            permutation: 5,
            height: 4,
        };
        assert_eq!(scramble_lines(&image, &perm), Err(expected.clone()));
        assert_eq!(unscramble_lines(&image, &perm), Err(expected));
    }

    #[test]
    fn non_bijective_scramble_loses_rows() {
        let image = PixelGrid::from_fn(1, 6, |_, y| Argb::gray(10 + y as u8));
        let perm = Permutation::generate(6, Key::new(1)).unwrap();
        let scrambled = scramble_lines(&image, &perm).unwrap();
        // rows 0, 2, 4 land on 0; rows 1, 3, 5 land on 3; last writer wins
        assert_eq!(scrambled.get(0, 0), Argb::gray(14));
        assert_eq!(scrambled.get(0, 3), Argb::gray(15));
        assert_eq!(scrambled.get(0, 1), Argb::default());
        let restored = unscramble_lines(&scrambled, &perm).unwrap();
        assert_ne!(restored, image);
    }

    #[test]
    fn inputs_are_not_modified() {
        let image = PixelGrid::from_fn(3, 4, |x, y| Argb::gray((x * 4 + y) as u8));
        let copy = image.clone();
        let perm = Permutation::generate(4, Key::new(130)).unwrap();
        let _ = scramble_lines(&image, &perm).unwrap();
        let _ = unscramble_lines(&image, &perm).unwrap();
        assert_eq!(image, copy);
    }
}
