//! # Population
//!
//! A set of bit vectors evaluated against one fitness evaluator. Populations
//! are the input of both fitness-proportional selection and the MIMIC model
//! builder, and are replaced wholesale every generation.
//!
//! ## Example
//!
//! ```rust
//! use bitopt::population::Population;
//!
//! let count_ones = |bits: &[u8]| bits.iter().map(|&b| b as f64).sum::<f64>();
//! let mut population = Population::new(4, count_ones).unwrap();
//! population
//!     .set_population(vec![vec![1, 1, 1, 1], vec![0, 0, 0, 0], vec![1, 0, 1, 0]])
//!     .unwrap();
//!
//! let probs = population.selection_probabilities().unwrap();
//! assert!((probs[0] - 4.0 / 6.0).abs() < 1e-12);
//! assert_eq!(probs[1], 0.0);
//! ```

use rayon::prelude::*;
use tracing::warn;

use crate::error::{ensure_bits, OptimizationError, Result};
use crate::fitness::{Bit, FitnessEvaluator};
use crate::rng::RandomNumberGenerator;
use crate::state::first_argmax;

const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

/// Bit vectors of a common length with their fitness values.
#[derive(Debug, Clone)]
pub struct Population<E> {
    length: usize,
    members: Vec<Vec<Bit>>,
    fitness: Vec<f64>,
    evaluator: E,
    parallel_threshold: usize,
}

impl<E: FitnessEvaluator> Population<E> {
    /// Creates an empty population for bit vectors of the given length.
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
            members: Vec::new(),
            fitness: Vec::new(),
            evaluator,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Sets the population size from which fitness is evaluated in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn members(&self) -> &[Vec<Bit>] {
        &self.members
    }

    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Replaces the population with `size` uniformly random bit vectors.
    ///
    /// All bits are drawn from `rng` before any evaluation, so the result is
    /// the same whether or not the evaluation runs in parallel.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::Configuration` if `size` is 0.
    pub fn generate(&mut self, size: usize, rng: &mut RandomNumberGenerator) -> Result<()> {
        if size == 0 {
            return Err(OptimizationError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        let members: Vec<Vec<Bit>> = (0..size).map(|_| rng.random_bits(self.length)).collect();
        self.fitness = self.evaluate_all(&members);
        self.members = members;
        Ok(())
    }

    /// Replaces the population with externally produced bit vectors and
    /// re-evaluates every member.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::DimensionMismatch` for the first member whose
    /// length differs from the problem length and
    /// `OptimizationError::InvalidNumericValue` for the first member holding a
    /// bit other than 0 or 1. The population is left unchanged in either case.
    pub fn set_population(&mut self, new_members: Vec<Vec<Bit>>) -> Result<()> {
        for member in &new_members {
            ensure_bits(self.length, member)?;
        }

        self.fitness = self.evaluate_all(&new_members);
        self.members = new_members;
        Ok(())
    }

    /// Returns each member's fitness divided by the total fitness.
    ///
    /// Fitness values are expected to be non-negative; negative values are not
    /// checked and make the result meaningless as a distribution.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::EmptyPopulation` for an empty population and
    /// `OptimizationError::DegenerateDistribution` if the total fitness is zero
    /// or not finite.
    pub fn selection_probabilities(&self) -> Result<Vec<f64>> {
        if self.fitness.is_empty() {
            return Err(OptimizationError::EmptyPopulation);
        }

        let total: f64 = self.fitness.iter().sum();
        if total == 0.0 || !total.is_finite() {
            return Err(OptimizationError::DegenerateDistribution(format!(
                "Total fitness of {} members is {}",
                self.fitness.len(),
                total
            )));
        }

        Ok(self.fitness.iter().map(|f| f / total).collect())
    }

    /// Like [`selection_probabilities`](Self::selection_probabilities), but
    /// falls back to a uniform distribution when the fitness total is degenerate.
    pub fn selection_probabilities_or_uniform(&self) -> Result<Vec<f64>> {
        match self.selection_probabilities() {
            Err(OptimizationError::DegenerateDistribution(reason)) => {
                warn!(%reason, "falling back to uniform selection probabilities");
                let n = self.fitness.len();
                Ok(vec![1.0 / n as f64; n])
            }
            other => other,
        }
    }

    /// Returns the fittest member and its fitness; ties go to the earliest member.
    pub fn best(&self) -> Option<(&[Bit], f64)> {
        if self.members.is_empty() {
            return None;
        }
        let best = first_argmax(&self.fitness);
        Some((&self.members[best], self.fitness[best]))
    }

    fn evaluate_all(&self, members: &[Vec<Bit>]) -> Vec<f64> {
        if members.len() >= self.parallel_threshold {
            members
                .par_iter()
                .map(|m| self.evaluator.evaluate(m))
                .collect()
        } else {
            members.iter().map(|m| self.evaluator.evaluate(m)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_ones(bits: &[Bit]) -> f64 {
        bits.iter().map(|&b| b as f64).sum()
    }

    fn known_population() -> Population<fn(&[Bit]) -> f64> {
        let mut population = Population::new(4, count_ones as fn(&[Bit]) -> f64).unwrap();
        population
            .set_population(vec![vec![1, 1, 1, 1], vec![0, 0, 0, 0], vec![1, 0, 1, 0]])
            .unwrap();
        population
    }

    #[test]
    fn test_generate() {
        let mut rng = RandomNumberGenerator::from_seed(17);
        let mut population = Population::new(10, count_ones).unwrap();
        population.generate(25, &mut rng).unwrap();

        assert_eq!(population.len(), 25);
        assert_eq!(population.fitness().len(), 25);
        for (member, &fitness) in population.members().iter().zip(population.fitness()) {
            assert_eq!(member.len(), 10);
            assert_eq!(fitness, count_ones(member));
        }
    }

    #[test]
    fn test_generate_zero_size() {
        let mut rng = RandomNumberGenerator::new();
        let mut population = Population::new(10, count_ones).unwrap();
        assert!(matches!(
            population.generate(0, &mut rng),
            Err(OptimizationError::Configuration(_))
        ));
    }

    #[test]
    fn test_generate_parallel_is_seed_deterministic() {
        let mut sequential = Population::new(12, count_ones).unwrap();
        let mut parallel = Population::new(12, count_ones)
            .unwrap()
            .with_parallel_threshold(1);

        sequential
            .generate(40, &mut RandomNumberGenerator::from_seed(2))
            .unwrap();
        parallel
            .generate(40, &mut RandomNumberGenerator::from_seed(2))
            .unwrap();

        assert_eq!(sequential.members(), parallel.members());
        assert_eq!(sequential.fitness(), parallel.fitness());
    }

    #[test]
    fn test_selection_probabilities() {
        let probs = known_population().selection_probabilities().unwrap();
        let expected = [4.0 / 6.0, 0.0, 2.0 / 6.0];

        for (p, e) in probs.iter().zip(expected) {
            assert!((p - e).abs() < 1e-12);
        }
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_distribution() {
        let mut population = Population::new(3, count_ones).unwrap();
        population
            .set_population(vec![vec![0, 0, 0], vec![0, 0, 0]])
            .unwrap();

        assert!(matches!(
            population.selection_probabilities(),
            Err(OptimizationError::DegenerateDistribution(_))
        ));
        assert_eq!(
            population.selection_probabilities_or_uniform().unwrap(),
            vec![0.5, 0.5]
        );
    }

    #[test]
    fn test_empty_population_probabilities() {
        let population = Population::new(3, count_ones).unwrap();
        assert!(matches!(
            population.selection_probabilities(),
            Err(OptimizationError::EmptyPopulation)
        ));
        assert!(population.best().is_none());
    }

    #[test]
    fn test_set_population_dimension_mismatch() {
        let mut population = known_population();
        let result = population.set_population(vec![vec![1, 1, 1, 1], vec![1, 1]]);

        assert!(matches!(
            result,
            Err(OptimizationError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        ));
        assert_eq!(population.len(), 3);
    }

    #[test]
    fn test_set_population_rejects_non_binary_member() {
        let mut population = known_population();
        let result = population.set_population(vec![vec![1, 1, 1, 1], vec![0, 3, 0, 0]]);

        assert!(matches!(
            result,
            Err(OptimizationError::InvalidNumericValue(_))
        ));
        assert_eq!(population.len(), 3);
        assert_eq!(population.members()[0], vec![1, 1, 1, 1]);
        assert_eq!(population.fitness(), &[4.0, 0.0, 2.0]);
    }

    #[test]
    fn test_best_ties_to_first() {
        let mut population = Population::new(2, count_ones).unwrap();
        population
            .set_population(vec![vec![0, 1], vec![1, 1], vec![1, 1]])
            .unwrap();

        let (bits, fitness) = population.best().unwrap();
        assert_eq!(bits, &[1, 1]);
        assert_eq!(fitness, 2.0);
        assert!(std::ptr::eq(bits, population.members()[1].as_slice()));
    }
}
