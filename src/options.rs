//! # OptimizerOptions
//!
//! The `OptimizerOptions` struct holds the per-generation parameters of the
//! population-based optimizers: population size, the fraction of the population
//! kept as the elite sample, how many candidates to sample from a fitted model,
//! and the minimum amount of work that is worth spreading over threads.
//!
//! ## Example
//!
//! ```rust
//! use bitopt::options::OptimizerOptions;
//!
//! // Explicit parameters
//! let custom = OptimizerOptions::new(500, 0.1, 500);
//! assert!(custom.validate().is_ok());
//!
//! // Fluent builder
//! let options = OptimizerOptions::builder()
//!     .population_size(100)
//!     .keep_pct(0.25)
//!     .parallel_threshold(64)
//!     .build();
//! assert_eq!(options.get_sample_size(), 200);
//! ```

use crate::error::{OptimizationError, Result};

const DEFAULT_POPULATION_SIZE: usize = 200;
const DEFAULT_KEEP_PCT: f64 = 0.2;
const DEFAULT_SAMPLE_SIZE: usize = 200;
const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerOptions {
    population_size: usize,
    /// Fraction of the population kept as the elite sample, in (0, 1].
    keep_pct: f64,
    sample_size: usize,
    /// Minimum number of items to process in parallel
    parallel_threshold: usize,
}

impl OptimizerOptions {
    pub fn new(population_size: usize, keep_pct: f64, sample_size: usize) -> Self {
        Self {
            population_size,
            keep_pct,
            sample_size,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Creates a new `OptimizerOptions` instance with all parameters specified.
    ///
    /// # Arguments
    ///
    /// * `population_size` - The number of members generated for the initial population.
    /// * `keep_pct` - The fraction of the population kept as the elite sample.
    /// * `sample_size` - The number of candidates sampled from each fitted model.
    /// * `parallel_threshold` - The minimum number of items to process in parallel.
    pub fn new_with_threshold(
        population_size: usize,
        keep_pct: f64,
        sample_size: usize,
        parallel_threshold: usize,
    ) -> Self {
        Self {
            population_size,
            keep_pct,
            sample_size,
            parallel_threshold,
        }
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_keep_pct(&self) -> f64 {
        self.keep_pct
    }

    pub fn get_sample_size(&self) -> usize {
        self.sample_size
    }

    /// Returns the minimum number of items to process in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_keep_pct(&mut self, keep_pct: f64) {
        self.keep_pct = keep_pct;
    }

    pub fn set_sample_size(&mut self, sample_size: usize) {
        self.sample_size = sample_size;
    }

    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::Configuration` if the population or sample
    /// size is zero, or if `keep_pct` lies outside (0, 1].
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(OptimizationError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        if self.sample_size == 0 {
            return Err(OptimizationError::Configuration(
                "Sample size cannot be zero".to_string(),
            ));
        }

        validate_keep_pct(self.keep_pct)
    }

    /// Returns a builder for creating an `OptimizerOptions` instance.
    pub fn builder() -> OptimizerOptionsBuilder {
        OptimizerOptionsBuilder::default()
    }
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            keep_pct: DEFAULT_KEEP_PCT,
            sample_size: DEFAULT_SAMPLE_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

pub(crate) fn validate_keep_pct(keep_pct: f64) -> Result<()> {
    if !(keep_pct > 0.0 && keep_pct <= 1.0) {
        return Err(OptimizationError::Configuration(format!(
            "Keep fraction must lie in (0, 1], got {}",
            keep_pct
        )));
    }
    Ok(())
}

/// Builder for `OptimizerOptions`.
#[derive(Debug, Clone, Default)]
pub struct OptimizerOptionsBuilder {
    population_size: Option<usize>,
    keep_pct: Option<f64>,
    sample_size: Option<usize>,
    parallel_threshold: Option<usize>,
}

impl OptimizerOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn keep_pct(mut self, value: f64) -> Self {
        self.keep_pct = Some(value);
        self
    }

    pub fn sample_size(mut self, value: usize) -> Self {
        self.sample_size = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn build(self) -> OptimizerOptions {
        OptimizerOptions {
            population_size: self.population_size.unwrap_or(DEFAULT_POPULATION_SIZE),
            keep_pct: self.keep_pct.unwrap_or(DEFAULT_KEEP_PCT),
            sample_size: self.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        }
    }
}
