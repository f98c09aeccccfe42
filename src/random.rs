use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::errors::GenerationError;

/// Seedable source of every random draw made during a generation session.
///
/// Wraps a `ChaCha8Rng` so that two sessions built from the same seed produce
/// field-for-field identical entities. One `RandomSource` belongs to exactly
/// one session and is never shared.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Fully reproducible sequence of draws for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// OS-entropy seeded source for non-deterministic sessions.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    pub fn next_bool(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// Uniform draw in `[min, max]`. Returns `min` when `min == max` without
    /// consuming randomness, so degenerate ranges do not perturb the stream.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        if min == max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    pub fn next_long(&mut self, min: i64, max: i64) -> i64 {
        if min == max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    pub fn next_double(&mut self, min: f64, max: f64) -> f64 {
        if min == max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    pub fn shuffle<T>(&mut self, elements: &mut [T]) {
        elements.shuffle(&mut self.rng);
    }

    /// One random element of `elements`.
    pub fn choose_one<'a, T>(&mut self, elements: &'a [T]) -> Result<&'a T, GenerationError> {
        if elements.is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        let idx = self.rng.random_range(0..elements.len());
        Ok(&elements[idx])
    }

    /// `count` distinct elements of `elements`, in random order.
    ///
    /// Fails fast with `InsufficientElements` when `count` exceeds the input
    /// length; callers that want "all of them" should pass `elements.len()`.
    pub fn choose_many<T: Clone>(
        &mut self,
        elements: &[T],
        count: usize,
    ) -> Result<Vec<T>, GenerationError> {
        if count > elements.len() {
            return Err(GenerationError::InsufficientElements {
                requested: count,
                available: elements.len(),
            });
        }
        let mut indexes: Vec<usize> = (0..elements.len()).collect();
        indexes.shuffle(&mut self.rng);
        indexes.truncate(count);
        Ok(indexes.into_iter().map(|i| elements[i].clone()).collect())
    }

    /// Replaces every `#` in `pattern` with a random digit.
    pub fn numerify(&mut self, pattern: &str) -> String {
        pattern
            .chars()
            .map(|ch| {
                if ch == '#' {
                    char::from(b'0' + self.rng.random_range(0..=9u8))
                } else {
                    ch
                }
            })
            .collect()
    }

    /// Replaces every `?` in `pattern` with a random uppercase letter.
    pub fn letterify(&mut self, pattern: &str) -> String {
        pattern
            .chars()
            .map(|ch| {
                if ch == '?' {
                    char::from(b'A' + self.rng.random_range(0..26u8))
                } else {
                    ch
                }
            })
            .collect()
    }

    /// `numerify` and `letterify` combined.
    pub fn bothify(&mut self, pattern: &str) -> String {
        let digits = self.numerify(pattern);
        self.letterify(&digits)
    }

    pub fn numeric_string(&mut self, len: usize) -> String {
        self.numerify(&"#".repeat(len))
    }

    pub fn alphabetic_upper(&mut self, len: usize) -> String {
        self.letterify(&"?".repeat(len))
    }

    pub fn alphanumeric(&mut self, len: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        (0..len)
            .map(|_| {
                let idx = self.rng.random_range(0..CHARSET.len());
                char::from(CHARSET[idx])
            })
            .collect()
    }
}
