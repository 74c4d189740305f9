//! # Random Sources
//!
//! The injectable randomness capability every generator draws from.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// A source of uniformly distributed random numbers.
///
/// Generators own one of these, injected at construction, so a caller controls
/// reproducibility by controlling the source. Every [`rand::RngCore`] implements it.
///
/// # Examples
///
/// ```
/// use delve::{create_rng, RandomSource};
///
/// let mut rng = create_rng(7);
/// let roll = rng.next_int(1, 6);
/// assert!((1..=6).contains(&roll));
/// ```
pub trait RandomSource {
    /// Returns an integer in `lo..=hi`. Returns `lo` when `hi <= lo`.
    fn next_int(&mut self, lo: i32, hi: i32) -> i32;

    /// Returns a float in `lo..hi`. Returns `lo` when `hi <= lo`.
    fn next_float(&mut self, lo: f32, hi: f32) -> f32;
}

impl<R: RngCore> RandomSource for R {
    fn next_int(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.gen_range(lo..=hi)
    }

    fn next_float(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.gen_range(lo..hi)
    }
}

/// Creates a seeded, reproducible random source.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Shuffles a slice in place (Fisher-Yates), drawing only from `rng`.
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.next_int(0, i as i32) as usize;
        items.swap(i, j);
    }
}
