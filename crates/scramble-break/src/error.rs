//! Error type for key recovery.

use thiserror::Error;

/// Failures raised by [`crate::KeySearch`].
#[derive(Debug, Error)]
pub enum SearchError {
    /// Fewer than two rows leaves no adjacent pair to score.
    #[error("key recovery needs at least two rows, image has {0}")]
    TooFewRows(usize),
    /// The cancellation token fired before every key was evaluated.
    #[error("key search aborted")]
    Aborted,
    /// The dedicated worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// A scrambling primitive rejected its input.
    #[error(transparent)]
    Core(#[from] scramble_core::Error),
}
