//! # FitnessEvaluator
//!
//! The `FitnessEvaluator` trait is the single capability the optimizers consume:
//! it maps a fixed-length bit vector to a numeric fitness, where higher is better.
//!
//! Closures implement the trait directly:
//!
//! ```rust
//! use bitopt::fitness::FitnessEvaluator;
//!
//! let count_ones = |bits: &[u8]| bits.iter().map(|&b| b as f64).sum::<f64>();
//! assert_eq!(count_ones.evaluate(&[1, 0, 1, 1]), 3.0);
//! ```

/// A single bit, restricted to the values 0 and 1.
pub type Bit = u8;

/// Evaluates the fitness of a bit vector.
///
/// Implementations must be deterministic and total over every bit vector of
/// the declared length. The optimizers may call `evaluate` from several
/// threads at once, hence the `Send + Sync` bound.
pub trait FitnessEvaluator: Send + Sync {
    fn evaluate(&self, bits: &[Bit]) -> f64;
}

impl<F> FitnessEvaluator for F
where
    F: Fn(&[Bit]) -> f64 + Send + Sync,
{
    fn evaluate(&self, bits: &[Bit]) -> f64 {
        self(bits)
    }
}
