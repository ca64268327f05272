//! Affine key-to-permutation generator.

use crate::error::Error;
use crate::key::Key;

/// Row permutation: entry `i` is the row that source row `i` is sent to.
///
/// Every entry lies in `[0, len)`. Distinctness is *not* guaranteed; see
/// [`Permutation::is_bijective`] and [`Key::is_bijective_for`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    indices: Vec<usize>,
}

impl Permutation {
    /// Generates `perm[i] = (r + (2s + 1) * i) mod size` for `i` in `0..size`.
    pub fn generate(size: usize, key: Key) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::EmptyPermutation);
        }
        let mut perm = Self {
            indices: vec![0; size],
        };
        perm.regenerate(key);
        Ok(perm)
    }

    /// Overwrites the entries in place for another key, keeping the length.
    ///
    /// Lets a search loop reuse one allocation across candidate keys.
    pub fn regenerate(&mut self, key: Key) {
        let size = self.indices.len();
        let offset = key.offset();
        let step = key.multiplier();
        for (i, slot) in self.indices.iter_mut().enumerate() {
            *slot = (offset + step * i) % size;
        }
    }

    /// Wraps explicit indices, checking that each lies in `[0, len)`.
    pub fn from_indices(indices: Vec<usize>) -> Result<Self, Error> {
        let len = indices.len();
        if len == 0 {
            return Err(Error::EmptyPermutation);
        }
        if let Some((position, &value)) = indices.iter().enumerate().find(|(_, &v)| v >= len) {
            return Err(Error::IndexOutOfRange {
                position,
                value,
                len,
            });
        }
        Ok(Self { indices })
    }

    /// Number of rows covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always false; empty permutations cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Entries as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Returns true when no two rows share a destination.
    pub fn is_bijective(&self) -> bool {
        let mut seen = vec![false; self.indices.len()];
        for &dst in &self.indices {
            if std::mem::replace(&mut seen[dst], true) {
                return false;
            }
        }
        true
    }
}

impl core::ops::Index<usize> for Permutation {
    type Output = usize;

    #[inline]
    fn index(&self, row: usize) -> &usize {
        &self.indices[row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_affine_formula() {
        // s = 2, r = 3 -> perm[i] = (3 + 5i) mod 8
        let key = Key::new((3 << 7) | 2);
        let perm = Permutation::generate(8, key).unwrap();
        assert_eq!(perm.as_slice(), &[3, 0, 5, 2, 7, 4, 1, 6]);
        assert!(perm.is_bijective());
    }

    #[test]
    fn key_zero_is_identity() {
        let perm = Permutation::generate(5, Key::new(0)).unwrap();
        assert_eq!(perm.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn generation_is_deterministic() {
        for size in [1usize, 2, 7, 64, 301] {
            for raw in [0u16, 1, 127, 128, 5000, 32767] {
                let key = Key::new(raw);
                let a = Permutation::generate(size, key).unwrap();
                let b = Permutation::generate(size, key).unwrap();
                assert_eq!(a, b);
                assert!(a.as_slice().iter().all(|&v| v < size));
            }
        }
    }

    #[test]
    fn regenerate_matches_fresh_generation() {
        let mut perm = Permutation::generate(37, Key::new(0)).unwrap();
        for raw in [9u16, 300, 32000] {
            perm.regenerate(Key::new(raw));
            assert_eq!(perm, Permutation::generate(37, Key::new(raw)).unwrap());
        }
    }

    #[test]
    fn non_coprime_multiplier_collides() {
        // s = 1 -> multiplier 3, size 6 -> only rows 0 and 3 are hit
        let perm = Permutation::generate(6, Key::new(1)).unwrap();
        assert_eq!(perm.as_slice(), &[0, 3, 0, 3, 0, 3]);
        assert!(!perm.is_bijective());
        assert!(!Key::new(1).is_bijective_for(6));
    }

    #[test]
    fn bijectivity_check_agrees_with_gcd_rule() {
        for size in 1..40usize {
            for raw in (0u16..32768).step_by(97) {
                let key = Key::new(raw);
                let perm = Permutation::generate(size, key).unwrap();
                assert_eq!(perm.is_bijective(), key.is_bijective_for(size), "size {size} key {raw}");
            }
        }
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(
            Permutation::generate(0, Key::new(3)),
            Err(Error::EmptyPermutation)
        );
    }

    #[test]
    fn from_indices_validates_range() {
        assert!(Permutation::from_indices(vec![1, 0, 2]).is_ok());
        assert_eq!(
            Permutation::from_indices(vec![0, 3, 1]),
            Err(Error::IndexOutOfRange {
                position: 1,
                value: 3,
                len: 3
            })
        );
    }
}
