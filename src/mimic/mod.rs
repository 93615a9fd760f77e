//! # MIMIC
//!
//! Probabilistic model building over bit positions. Each generation keeps the
//! elite of a population, fits a [`DependencyModel`] (a dependency tree from
//! pairwise mutual information plus conditional probability tables) and samples
//! the next population from it.
//!
//! ## Example
//!
//! ```rust
//! use bitopt::mimic::Mimic;
//! use bitopt::options::OptimizerOptions;
//! use bitopt::rng::RandomNumberGenerator;
//!
//! let count_ones = |bits: &[u8]| bits.iter().map(|&b| b as f64).sum::<f64>();
//! let options = OptimizerOptions::builder()
//!     .population_size(100)
//!     .sample_size(100)
//!     .keep_pct(0.2)
//!     .build();
//! let mut rng = RandomNumberGenerator::from_seed(5);
//!
//! let mimic = Mimic::new(options).unwrap();
//! let mut population = mimic.initial_population(16, count_ones, &mut rng).unwrap();
//! for _ in 0..10 {
//!     mimic.step(&mut population, &mut rng).unwrap();
//! }
//! assert!(population.best().unwrap().1 >= 10.0);
//! ```

pub mod model;
pub mod stats;
pub mod tree;

pub use model::{select_elite, DependencyModel};

use tracing::debug;

use crate::error::Result;
use crate::fitness::FitnessEvaluator;
use crate::options::OptimizerOptions;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

/// Runs single MIMIC generations with a fixed set of options.
///
/// `Mimic` holds no state between generations; the caller owns the population
/// and decides when to stop.
#[derive(Debug, Clone)]
pub struct Mimic {
    options: OptimizerOptions,
}

impl Mimic {
    /// # Errors
    ///
    /// Returns `OptimizationError::Configuration` if the options are invalid.
    pub fn new(options: OptimizerOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &OptimizerOptions {
        &self.options
    }

    /// Creates a random population of `options.population_size` members.
    pub fn initial_population<E: FitnessEvaluator>(
        &self,
        length: usize,
        evaluator: E,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population<E>> {
        let mut population = Population::new(length, evaluator)?
            .with_parallel_threshold(self.options.get_parallel_threshold());
        population.generate(self.options.get_population_size(), rng)?;
        Ok(population)
    }

    /// Advances `population` by one generation and returns the model it was
    /// sampled from.
    ///
    /// The elite of the current population is fitted, `options.sample_size`
    /// candidates are drawn from the model, and they replace the population
    /// (which re-evaluates every member).
    pub fn step<E: FitnessEvaluator>(
        &self,
        population: &mut Population<E>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<DependencyModel> {
        let model = DependencyModel::from_population(population, self.options.get_keep_pct())?
            .with_parallel_threshold(self.options.get_parallel_threshold());

        let sample = model.generate_new_sample(self.options.get_sample_size(), rng);
        population.set_population(sample)?;

        debug!(
            elite_size = model.elite_size(),
            population = population.len(),
            best_fitness = population.best().map(|(_, f)| f),
            "completed MIMIC generation"
        );

        Ok(model)
    }
}
