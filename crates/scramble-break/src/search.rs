//! Exhaustive key search over the 15-bit key space.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};
use rayon::prelude::*;
use scramble_core::{GrayscaleGrid, Key, Permutation};
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::score::Strategy;
use crate::timing::{timed, Timed};

/// Keys scanned by one worker task before it reports progress.
const DEFAULT_CHUNK: usize = 1024;

/// Configuration for [`KeySearch`].
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Row-coherence score used to rank candidates.
    pub strategy: Strategy,
    /// Worker count; `None` uses the global rayon pool.
    pub threads: Option<usize>,
    /// Keys per work unit; clamped to `1..=32768`.
    pub chunk_size: usize,
    /// Skip keys whose permutation collapses rows for this image height.
    ///
    /// Collapsed permutations repeat a few rows and can outscore the true key,
    /// so callers that know the image was scrambled bijectively may exclude them.
    pub skip_non_bijective: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            threads: None,
            chunk_size: DEFAULT_CHUNK,
            skip_non_bijective: false,
        }
    }
}

/// Snapshot passed to the progress callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchProgress {
    /// Keys evaluated so far.
    pub evaluated: u32,
    /// Keys in the full search.
    pub total: u32,
}

/// Shared flag that stops a running search between two key evaluations.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, not-yet-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of a completed search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recovery {
    /// Best-scoring key; ties go to the smallest key.
    pub key: Key,
    /// Score of `key`.
    pub score: f64,
    /// Strategy the score was computed with.
    pub strategy: Strategy,
    /// Number of keys scored; 32768 unless non-bijective keys were skipped.
    pub evaluations: u32,
    /// Wall-clock time of the search.
    pub elapsed: Duration,
}

type ProgressFn<'a> = dyn Fn(SearchProgress) + Send + Sync + 'a;

/// Brute-force key recovery engine.
pub struct KeySearch<'a> {
    config: SearchConfig,
    cancel: Option<CancelToken>,
    progress: Option<Box<ProgressFn<'a>>>,
}

#[derive(Clone, Copy, Debug)]
struct Best {
    key: Key,
    score: f64,
}

impl Best {
    fn worst(strategy: Strategy) -> Self {
        Self {
            key: Key::new(Key::MASK),
            score: strategy.worst(),
        }
    }

    /// Keeps the better score; equal scores keep the smaller key.
    fn merge(self, other: Self, strategy: Strategy) -> Self {
        if strategy.is_better(other.score, self.score)
            || (other.score == self.score && other.key < self.key)
        {
            other
        } else {
            self
        }
    }
}

impl<'a> KeySearch<'a> {
    /// Creates a search with default configuration.
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    /// Creates a search with explicit configuration.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            cancel: None,
            progress: None,
        }
    }

    /// Attaches a cancellation token checked before every key.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Registers a callback invoked each time a chunk of keys completes.
    ///
    /// With several workers the callback runs concurrently and snapshots can
    /// arrive out of order.
    pub fn on_progress(mut self, f: impl Fn(SearchProgress) + Send + Sync + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Scores every key against `gray` and returns the best one.
    ///
    /// Requires `gray.height() >= 2`. The result does not depend on the worker
    /// count or chunk size.
    pub fn run(&self, gray: &GrayscaleGrid) -> Result<Recovery, SearchError> {
        if gray.height() < 2 {
            return Err(SearchError::TooFewRows(gray.height()));
        }
        debug!(
            "searching {} keys over {}x{} grid with {} score",
            Key::COUNT,
            gray.width(),
            gray.height(),
            self.config.strategy
        );

        let scored = AtomicU32::new(0);
        let Timed { value, elapsed, .. } = timed(|| match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| self.search(gray, &scored))
            }
            None => self.search(gray, &scored),
        });
        let best = value?;

        debug!("best key {} with score {}", best.key, best.score);
        Ok(Recovery {
            key: best.key,
            score: best.score,
            strategy: self.config.strategy,
            evaluations: scored.into_inner(),
            elapsed,
        })
    }

    fn search(&self, gray: &GrayscaleGrid, scored: &AtomicU32) -> Result<Best, SearchError> {
        let strategy = self.config.strategy;
        let chunk = self.config.chunk_size.clamp(1, Key::COUNT as usize) as u32;
        let evaluated = AtomicU32::new(0);

        (0..Key::COUNT)
            .into_par_iter()
            .step_by(chunk as usize)
            .map(|start| {
                let keys = start..(start + chunk).min(Key::COUNT);
                let count = keys.len() as u32;
                let best = self.scan(gray, keys, scored)?;
                let done = evaluated.fetch_add(count, Ordering::Relaxed) + count;
                self.report(done);
                Ok::<Best, SearchError>(best)
            })
            .try_reduce(|| Best::worst(strategy), |a, b| Ok(a.merge(b, strategy)))
    }

    fn scan(
        &self,
        gray: &GrayscaleGrid,
        keys: Range<u32>,
        scored: &AtomicU32,
    ) -> Result<Best, SearchError> {
        let strategy = self.config.strategy;
        let height = gray.height();
        let mut perm = Permutation::generate(height, Key::new(keys.start as u16))?;
        let mut best = Best::worst(strategy);
        let mut count = 0;
        for raw in keys {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(SearchError::Aborted);
            }
            let key = Key::new(raw as u16);
            if self.config.skip_non_bijective && !key.is_bijective_for(height) {
                continue;
            }
            count += 1;
            perm.regenerate(key);
            let score = strategy.score_unchecked(gray, &perm);
            trace!("key {key}: {score}");
            if strategy.is_better(score, best.score) {
                best = Best { key, score };
            }
        }
        scored.fetch_add(count, Ordering::Relaxed);
        Ok(best)
    }

    fn report(&self, evaluated: u32) {
        debug!("{evaluated}/{} keys evaluated", Key::COUNT);
        if let Some(progress) = &self.progress {
            progress(SearchProgress {
                evaluated,
                total: Key::COUNT,
            });
        }
    }
}

impl Default for KeySearch<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a full search with `strategy` and default settings, returning the key.
pub fn break_key(gray: &GrayscaleGrid, strategy: Strategy) -> Result<Key, SearchError> {
    let search = KeySearch::with_config(SearchConfig {
        strategy,
        ..SearchConfig::default()
    });
    Ok(search.run(gray)?.key)
}
