//! Row-coherence scores for candidate unscramblings.

use core::fmt;

use scramble_core::{Error, GrayscaleGrid, Permutation};
use serde::{Deserialize, Serialize};

/// Scoring strategy. The two polarities are opposite and never compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Sum of Euclidean distances between adjacent rows; lower is better.
    #[default]
    Euclidean,
    /// Sum of Pearson correlations between adjacent rows; higher is better.
    Pearson,
}

impl Strategy {
    /// Scores the row order `perm[0], perm[1], ...` of `gray`.
    pub fn score(self, gray: &GrayscaleGrid, perm: &Permutation) -> Result<f64, Error> {
        if perm.len() != gray.height() {
            return Err(Error::DimensionMismatch {
                permutation: perm.len(),
                height: gray.height(),
            });
        }
        Ok(self.score_unchecked(gray, perm))
    }

    /// Caller guarantees `perm.len() == gray.height()`.
    pub(crate) fn score_unchecked(self, gray: &GrayscaleGrid, perm: &Permutation) -> f64 {
        let rows = perm.as_slice();
        match self {
            Self::Euclidean => rows
                .windows(2)
                .map(|pair| row_distance(gray.row(pair[0]), gray.row(pair[1])))
                .sum(),
            Self::Pearson => rows
                .windows(2)
                .filter_map(|pair| pearson_correlation(gray.row(pair[0]), gray.row(pair[1])))
                .sum(),
        }
    }

    /// Strictly better than `incumbent` under this strategy's polarity.
    #[inline]
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Self::Euclidean => candidate < incumbent,
            Self::Pearson => candidate > incumbent,
        }
    }

    /// A score every finite score beats.
    #[inline]
    pub fn worst(self) -> f64 {
        match self {
            Self::Euclidean => f64::INFINITY,
            Self::Pearson => f64::NEG_INFINITY,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Pearson => "pearson",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Euclidean distance between two equally long rows.
pub fn row_distance(a: &[u8], b: &[u8]) -> f64 {
    let squared: u64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x as i64 - y as i64;
            (d * d) as u64
        })
        .sum();
    (squared as f64).sqrt()
}

/// Pearson correlation of two equally long rows.
///
/// Returns `None` when either row has zero variance (or the rows are empty).
pub fn pearson_correlation(a: &[u8], b: &[u8]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n == 0 {
        return None;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let mean_a = a.iter().map(|&v| v as u64).sum::<u64>() as f64 / n as f64;
    let mean_b = b.iter().map(|&v| v as u64).sum::<u64>() as f64 / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x as f64 - mean_a;
        let dy = y as f64 - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    Some(cov / (var_a * var_b).sqrt())
}

/// Euclidean row-coherence score of `gray` read in `perm` order.
pub fn euclidean_score(gray: &GrayscaleGrid, perm: &Permutation) -> Result<f64, Error> {
    Strategy::Euclidean.score(gray, perm)
}

/// Pearson row-coherence score of `gray` read in `perm` order.
pub fn pearson_score(gray: &GrayscaleGrid, perm: &Permutation) -> Result<f64, Error> {
    Strategy::Pearson.score(gray, perm)
}
