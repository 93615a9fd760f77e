//! # Selection
//!
//! Fitness-proportionate selection of population members. Indices are drawn
//! with replacement from the population's selection probabilities using the
//! injected random number generator.

use crate::error::Result;
use crate::fitness::FitnessEvaluator;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

/// Fitness-proportionate (roulette wheel) selection over a population.
///
/// Members are drawn with replacement, each with probability equal to its
/// entry in [`Population::selection_probabilities`]. Fitness values must be
/// non-negative.
///
/// # Examples
///
/// ```
/// use bitopt::population::Population;
/// use bitopt::rng::RandomNumberGenerator;
/// use bitopt::selection::RouletteWheelSelection;
///
/// let count_ones = |bits: &[u8]| bits.iter().map(|&b| b as f64).sum::<f64>();
/// let mut population = Population::new(3, count_ones).unwrap();
/// population
///     .set_population(vec![vec![0, 0, 0], vec![1, 1, 1]])
///     .unwrap();
///
/// let mut rng = RandomNumberGenerator::from_seed(1);
/// let chosen = RouletteWheelSelection::new()
///     .select(&population, 5, &mut rng)
///     .unwrap();
///
/// // The all-zero member has no chance of being picked.
/// assert_eq!(chosen, vec![1; 5]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouletteWheelSelection {
    /// Use uniform probabilities instead of failing when total fitness is zero.
    uniform_fallback: bool,
}

impl RouletteWheelSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Falls back to uniform selection when the fitness distribution is degenerate.
    pub fn with_uniform_fallback(mut self) -> Self {
        self.uniform_fallback = true;
        self
    }

    /// Draws `num_to_select` member indices.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::EmptyPopulation` for an empty population and
    /// `OptimizationError::DegenerateDistribution` when the total fitness is zero
    /// and no uniform fallback was requested.
    pub fn select<E: FitnessEvaluator>(
        &self,
        population: &Population<E>,
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        let probs = if self.uniform_fallback {
            population.selection_probabilities_or_uniform()?
        } else {
            population.selection_probabilities()?
        };
        let cumulative = cumulative_probabilities(&probs);

        Ok((0..num_to_select)
            .map(|_| spin(&cumulative, rng.next_unit()))
            .collect())
    }
}

fn cumulative_probabilities(probs: &[f64]) -> Vec<f64> {
    let mut cumulative: Vec<f64> = probs
        .iter()
        .scan(0.0, |acc, p| {
            *acc += p;
            Some(*acc)
        })
        .collect();

    // Pin the last bucket to 1.0 to absorb rounding
    if let Some(last) = cumulative.last_mut() {
        *last = 1.0;
    }
    cumulative
}

/// Index of the first bucket whose cumulative probability exceeds `r`.
fn spin(cumulative: &[f64], r: f64) -> usize {
    cumulative
        .iter()
        .position(|&c| r < c)
        .unwrap_or(cumulative.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptimizationError;
    use crate::fitness::Bit;

    fn count_ones(bits: &[Bit]) -> f64 {
        bits.iter().map(|&b| b as f64).sum()
    }

    #[test]
    fn test_spin_skips_zero_width_buckets() {
        let cumulative = cumulative_probabilities(&[0.5, 0.0, 0.5]);
        assert_eq!(cumulative, vec![0.5, 0.5, 1.0]);
        assert_eq!(spin(&cumulative, 0.0), 0);
        assert_eq!(spin(&cumulative, 0.5), 2);
        assert_eq!(spin(&cumulative, 0.999), 2);
    }

    #[test]
    fn test_selection_frequencies_follow_fitness() {
        let mut population = Population::new(4, count_ones).unwrap();
        population
            .set_population(vec![vec![1, 1, 1, 1], vec![0, 0, 0, 0], vec![1, 0, 1, 0]])
            .unwrap();

        let mut rng = RandomNumberGenerator::from_seed(123);
        let chosen = RouletteWheelSelection::new()
            .select(&population, 6000, &mut rng)
            .unwrap();

        let mut counts = [0usize; 3];
        for idx in chosen {
            counts[idx] += 1;
        }

        assert_eq!(counts[1], 0);
        let share = counts[0] as f64 / 6000.0;
        assert!((share - 4.0 / 6.0).abs() < 0.05);
    }

    #[test]
    fn test_degenerate_population() {
        let mut population = Population::new(2, count_ones).unwrap();
        population
            .set_population(vec![vec![0, 0], vec![0, 0]])
            .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(1);

        assert!(matches!(
            RouletteWheelSelection::new().select(&population, 3, &mut rng),
            Err(OptimizationError::DegenerateDistribution(_))
        ));

        let chosen = RouletteWheelSelection::new()
            .with_uniform_fallback()
            .select(&population, 3, &mut rng)
            .unwrap();
        assert_eq!(chosen.len(), 3);
        assert!(chosen.iter().all(|&i| i < 2));
    }
}
