//! # BitStringState
//!
//! A single mutable candidate solution bound to a fitness evaluator, together
//! with the 1-bit Hamming neighborhood used by local search.
//!
//! ## Example
//!
//! ```rust
//! use bitopt::state::BitStringState;
//!
//! let count_ones = |bits: &[u8]| bits.iter().map(|&b| b as f64).sum::<f64>();
//! let mut state = BitStringState::new(4, count_ones).unwrap();
//! state.set_bits(vec![0, 1, 0, 0]).unwrap();
//!
//! assert_eq!(state.fitness(), Some(1.0));
//! let (best, fitness) = state.best_neighbor();
//! assert_eq!(best, vec![1, 1, 0, 0]);
//! assert_eq!(fitness, 2.0);
//! ```

use rayon::prelude::*;

use crate::error::{ensure_bits, OptimizationError, Result};
use crate::fitness::{Bit, FitnessEvaluator};
use crate::rng::RandomNumberGenerator;

const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

/// A fixed-length bit vector and its fitness.
///
/// The fitness is `None` until the bits are first assigned through
/// [`randomize`](Self::randomize) or [`set_bits`](Self::set_bits); afterwards it
/// always reflects the current bits.
#[derive(Debug, Clone)]
pub struct BitStringState<E> {
    length: usize,
    bits: Vec<Bit>,
    fitness: Option<f64>,
    evaluator: E,
    parallel_threshold: usize,
}

impl<E: FitnessEvaluator> BitStringState<E> {
    /// Creates an all-zero state of the given length with fitness unset.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::Configuration` if `length` is 0.
    pub fn new(length: usize, evaluator: E) -> Result<Self> {
        if length == 0 {
            return Err(OptimizationError::Configuration(
                "Bitstring length must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            length,
            bits: vec![0; length],
            fitness: None,
            evaluator,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Sets the neighborhood size from which `best_neighbor` evaluates in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Assigns every bit uniformly at random and recomputes the fitness.
    pub fn randomize(&mut self, rng: &mut RandomNumberGenerator) {
        self.bits = rng.random_bits(self.length);
        self.fitness = Some(self.evaluator.evaluate(&self.bits));
    }

    /// Replaces the bits and recomputes the fitness.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::DimensionMismatch` if `new_bits` does not have
    /// exactly `length` positions and `OptimizationError::InvalidNumericValue` if
    /// any position is not 0 or 1. The state is left unchanged in either case.
    pub fn set_bits(&mut self, new_bits: Vec<Bit>) -> Result<()> {
        ensure_bits(self.length, &new_bits)?;
        self.fitness = Some(self.evaluator.evaluate(&new_bits));
        self.bits = new_bits;
        Ok(())
    }

    /// Returns the full 1-bit Hamming neighborhood of the current bits.
    ///
    /// Neighbor `i` differs from the current bits exactly at position `i`.
    pub fn neighbors(&self) -> Vec<Vec<Bit>> {
        (0..self.length).map(|i| self.flipped(i)).collect()
    }

    /// Evaluates every neighbor and returns the fittest one with its fitness.
    ///
    /// Ties go to the neighbor with the lowest flipped index. The evaluator is
    /// called exactly `length` times.
    pub fn best_neighbor(&self) -> (Vec<Bit>, f64) {
        let neighbors = self.neighbors();

        let scores: Vec<f64> = if neighbors.len() >= self.parallel_threshold {
            neighbors
                .par_iter()
                .map(|n| self.evaluator.evaluate(n))
                .collect()
        } else {
            neighbors.iter().map(|n| self.evaluator.evaluate(n)).collect()
        };

        let best = first_argmax(&scores);
        let fitness = scores[best];
        let bits = neighbors.into_iter().nth(best).unwrap_or_default();
        (bits, fitness)
    }

    /// Flips one uniformly chosen position and returns the result; the
    /// current bits are left untouched.
    pub fn random_neighbor(&self, rng: &mut RandomNumberGenerator) -> Vec<Bit> {
        self.flipped(rng.gen_index(self.length))
    }

    fn flipped(&self, index: usize) -> Vec<Bit> {
        let mut neighbor = self.bits.clone();
        neighbor[index] ^= 1;
        neighbor
    }
}

/// Index of the first maximum. NaN scores never win.
pub(crate) fn first_argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] || (scores[best].is_nan() && !score.is_nan()) {
            best = i;
        }
    }
    best
}
