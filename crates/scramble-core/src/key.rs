//! Scramble key decoding.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A 15-bit scramble key.
///
/// The low 7 bits select the stride `s`, the next 8 bits the offset `r`. Row
/// `i` of an `n`-row image is sent to `(r + (2s + 1) * i) mod n`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Key(u16);

impl Key {
    /// Mask applied to every key value.
    pub const MASK: u16 = 0x7fff;
    /// Number of distinct keys.
    pub const COUNT: u32 = 1 << 15;

    /// Builds a key, keeping only the low 15 bits.
    pub const fn new(value: u16) -> Self {
        Self(value & Self::MASK)
    }

    /// Builds a key from a signed value, rejecting negatives before masking.
    pub fn from_signed(value: i64) -> Result<Self, Error> {
        if value < 0 {
            return Err(Error::NegativeKey(value));
        }
        Ok(Self::new((value & Self::MASK as i64) as u16))
    }

    /// Iterates over every key in ascending order.
    pub fn all() -> impl DoubleEndedIterator<Item = Key> + ExactSizeIterator {
        (0..=Self::MASK).map(Key)
    }

    /// Raw 15-bit value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Stride parameter `s` (low 7 bits).
    #[inline]
    pub const fn stride(self) -> usize {
        (self.0 & 0x7f) as usize
    }

    /// Offset parameter `r` (bits 7..15).
    #[inline]
    pub const fn offset(self) -> usize {
        ((self.0 >> 7) & 0xff) as usize
    }

    /// Row multiplier `2s + 1`.
    #[inline]
    pub const fn multiplier(self) -> usize {
        2 * self.stride() + 1
    }

    /// Whether the key permutes `size` rows bijectively, i.e. `gcd(2s + 1, size) == 1`.
    pub fn is_bijective_for(self, size: usize) -> bool {
        size > 0 && gcd(self.multiplier(), size) == 1
    }
}

impl From<u16> for Key {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}

impl From<Key> for u16 {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parses a decimal key; values above 32767 are masked, negatives rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidKey(s.to_owned()))?;
        Self::from_signed(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_split_low_and_high_bits() {
        let key = Key::new((200 << 7) | 5);
        assert_eq!(key.stride(), 5);
        assert_eq!(key.offset(), 200);
        assert_eq!(key.multiplier(), 11);
    }

    #[test]
    fn values_are_masked_to_15_bits() {
        assert_eq!(Key::new(0xffff).value(), 0x7fff);
        assert_eq!(Key::from_signed(32768).unwrap().value(), 0);
        assert_eq!("40000".parse::<Key>().unwrap().value(), 40000 & 0x7fff);
    }

    #[test]
    fn negative_and_malformed_keys_are_rejected() {
        assert_eq!(Key::from_signed(-1), Err(Error::NegativeKey(-1)));
        assert_eq!("-12".parse::<Key>(), Err(Error::NegativeKey(-12)));
        assert!(matches!("abc".parse::<Key>(), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn all_covers_the_key_space_in_order() {
        let keys: Vec<Key> = Key::all().collect();
        assert_eq!(keys.len() as u32, Key::COUNT);
        assert_eq!(keys[0], Key::new(0));
        assert_eq!(keys[32767], Key::new(32767));
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn bijectivity_follows_gcd() {
        // multiplier 1 is coprime with everything
        assert!(Key::new(0).is_bijective_for(8));
        // multiplier 3 shares a factor with 9
        assert!(!Key::new(1).is_bijective_for(9));
        assert!(Key::new(1).is_bijective_for(8));
        assert!(!Key::new(0).is_bijective_for(0));
    }
}
