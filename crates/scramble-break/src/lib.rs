//! Brute-force key recovery for row-scrambled images.
//!
//! A scrambled image is "unscrambled" under every one of the 32,768 candidate
//! keys and each candidate order is scored by how smoothly adjacent rows
//! follow each other. The best score wins. Scoring reads rows through the
//! candidate permutation and never materializes the unscrambled image.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod score;
mod search;
mod timing;

pub use crate::error::SearchError;
pub use crate::score::{
    euclidean_score, pearson_correlation, pearson_score, row_distance, Strategy,
};
pub use crate::search::{break_key, CancelToken, KeySearch, Recovery, SearchConfig, SearchProgress};
pub use crate::timing::{format_elapsed, timed, Timed};
