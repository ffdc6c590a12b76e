//! Deterministic random number generation.
//!
//! The engine is single-threaded and fully reproducible: every random
//! draw flows through an injected `EngineRng`, so a fixed seed replays
//! an identical session. ChaCha8 keeps draws fast while staying
//! statistically sound for Monte Carlo work.
//!
//! `partial_shuffle` exists for the equity estimator: a trial only
//! needs a handful of cards off the top of the remaining deck, so the
//! Fisher-Yates walk stops after exactly that many positions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Seedable, forkable RNG wrapper used throughout the engine.
#[derive(Clone, Debug)]
pub struct EngineRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl EngineRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence, so a
    /// simulation can burn randomness without perturbing the caller.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Create an independent stream for a named context.
    ///
    /// The same context always yields the same stream from the same
    /// seed - used to separate deal randomness from decision noise.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self {
            inner: ChaCha8Rng::seed_from_u64(context_seed),
            seed: context_seed,
            fork_counter: 0,
        }
    }

    /// Random usize in the given range.
    pub fn gen_range(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Random f64 in [0, 1).
    pub fn gen_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Random f64 in the given range.
    pub fn gen_range_f64(&mut self, range: std::ops::Range<f64>) -> f64 {
        self.inner.gen_range(range)
    }

    /// Random boolean with the given probability of `true`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Shuffle only the first `count` positions of a slice.
    ///
    /// Runs the Fisher-Yates walk for exactly `count` steps, swapping
    /// each position with a uniformly chosen later element. After the
    /// call, `slice[..count]` is a uniform sample without replacement
    /// from the whole slice. Cost is proportional to `count`, not to
    /// the slice length.
    pub fn partial_shuffle<T>(&mut self, slice: &mut [T], count: usize) {
        let n = slice.len();
        if n == 0 {
            return;
        }
        let count = count.min(n - 1);
        for i in 0..count {
            let j = self.inner.gen_range(i..n);
            slice.swap(i, j);
        }
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Choose an index with probability proportional to its weight.
    ///
    /// Non-finite or negative weights are treated as zero, so a stray
    /// NaN in a score vector can never poison the draw. Returns `None`
    /// if the weights are empty or sum to zero.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let sanitized = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };

        let total: f64 = weights.iter().copied().map(sanitized).sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.inner.gen::<f64>() * total;
        let mut last_nonzero = 0;
        for (i, &weight) in weights.iter().enumerate() {
            let w = sanitized(weight);
            if w > 0.0 {
                last_nonzero = i;
            }
            threshold -= w;
            if w > 0.0 && threshold <= 0.0 {
                return Some(i);
            }
        }

        // Floating point edge case - fall back to the last live weight.
        Some(last_nonzero)
    }
}
