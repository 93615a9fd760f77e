use rayon::prelude::*;
use tracing::{debug, warn};

use super::stats::{mutual_information, percentile};
use super::tree::{minimum_spanning_forest, root_forest, sample_order, Edge};
use crate::error::{ensure_bits, OptimizationError, Result};
use crate::fitness::{Bit, FitnessEvaluator};
use crate::options::validate_keep_pct;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

/// Selects the elite sample of a population.
///
/// The threshold is the `100 * (1 - keep_pct)`-th percentile of the fitness
/// values (linear interpolation); every member whose fitness is at least the
/// threshold is kept, in population order. Ties at the threshold can therefore
/// keep more than the nominal fraction. Members with NaN fitness are never
/// kept and do not take part in the percentile.
///
/// # Errors
///
/// Returns `OptimizationError::Configuration` if `keep_pct` is outside (0, 1].
pub fn select_elite<E: FitnessEvaluator>(
    population: &Population<E>,
    keep_pct: f64,
) -> Result<Vec<Vec<Bit>>> {
    validate_keep_pct(keep_pct)?;

    let nan_count = population.fitness().iter().filter(|f| f.is_nan()).count();
    if nan_count > 0 {
        warn!(
            nan_count,
            population = population.len(),
            "ignoring members with NaN fitness in elite selection"
        );
    }

    let Some(threshold) = percentile(population.fitness(), 100.0 * (1.0 - keep_pct)) else {
        return Ok(Vec::new());
    };

    Ok(population
        .members()
        .iter()
        .zip(population.fitness())
        .filter(|(_, &fitness)| fitness >= threshold)
        .map(|(member, _)| member.clone())
        .collect())
}

/// A tree-structured probability model over bit positions.
///
/// Position 0 is the root; every other position depends on exactly one parent.
/// A `DependencyModel` is always fully fitted: building one selects the elite,
/// estimates the tree and the conditional probabilities and computes the sample
/// order, so any value can be sampled from immediately. Refitting produces a
/// new value.
///
/// # Examples
///
/// ```
/// use bitopt::mimic::DependencyModel;
/// use bitopt::rng::RandomNumberGenerator;
///
/// // Bits 0 and 1 always agree, bit 2 is always set.
/// let elite = vec![vec![0, 0, 1], vec![1, 1, 1], vec![1, 1, 1], vec![0, 0, 1]];
/// let model = DependencyModel::fit(3, &elite).unwrap();
///
/// assert_eq!(model.parent(1), Some(0));
/// assert_eq!(model.conditional_probability(1, 1), Some(1.0));
/// assert_eq!(model.conditional_probability(0, 1), Some(0.0));
///
/// let mut rng = RandomNumberGenerator::from_seed(3);
/// for candidate in model.generate_new_sample(20, &mut rng) {
///     assert_eq!(candidate[0], candidate[1]);
///     assert_eq!(candidate[2], 1);
/// }
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyModel {
    length: usize,
    /// `parent[0]` is `None`; every other entry names the parent position.
    parent: Vec<Option<usize>>,
    /// `cond_prob[v][i]` is P(bit i = 1 | parent bit = v). Column 0 holds the
    /// marginal of the root in both rows.
    cond_prob: [Vec<f64>; 2],
    sample_order: Vec<usize>,
    elite_size: usize,
    parallel_threshold: usize,
}

impl DependencyModel {
    /// Fits a model to an explicit elite sample.
    ///
    /// An empty elite is allowed: every probability is then 0 and sampling
    /// yields all-zero vectors.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::Configuration` if `length` is 0,
    /// `OptimizationError::DimensionMismatch` if any elite row has the wrong length
    /// and `OptimizationError::InvalidNumericValue` if a row holds a bit other
    /// than 0 or 1.
    pub fn fit(length: usize, elite: &[Vec<Bit>]) -> Result<Self> {
        if length == 0 {
            return Err(OptimizationError::Configuration(
                "Bitstring length must be greater than 0".to_string(),
            ));
        }
        for row in elite {
            ensure_bits(length, row)?;
        }

        if elite.is_empty() {
            warn!(length, "elite sample is empty; all conditional probabilities default to 0");
        }

        let columns = transpose(length, elite);
        let edges = dependency_edges(&columns);
        let forest = minimum_spanning_forest(length, &edges);
        let parent = root_forest(length, &forest, 0);
        let cond_prob = conditional_probabilities(&columns, &parent);
        let sample_order = sample_order(&parent);

        debug!(
            length,
            elite_size = elite.len(),
            edges = edges.len(),
            tree_edges = forest.len(),
            "fitted dependency model"
        );

        Ok(Self {
            length,
            parent,
            cond_prob,
            sample_order,
            elite_size: elite.len(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Selects the elite of `population` with [`select_elite`] and fits a model to it.
    pub fn from_population<E: FitnessEvaluator>(
        population: &Population<E>,
        keep_pct: f64,
    ) -> Result<Self> {
        let elite = select_elite(population, keep_pct)?;
        Self::fit(population.length(), &elite)
    }

    /// Sets the sample count from which sampling runs in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Parent of position `i`, `None` for the root.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.length()`.
    pub fn parent(&self, i: usize) -> Option<usize> {
        self.parent[i]
    }

    pub fn parents(&self) -> &[Option<usize>] {
        &self.parent
    }

    /// Probability that bit `i` is 1 given that its parent bit equals `parent_value`.
    /// For the root the marginal is returned regardless of `parent_value`.
    ///
    /// Returns `None` if `parent_value` is not 0 or 1 or `i` is out of range.
    pub fn conditional_probability(&self, parent_value: Bit, i: usize) -> Option<f64> {
        self.cond_prob.get(parent_value as usize)?.get(i).copied()
    }

    pub fn cond_prob(&self) -> &[Vec<f64>; 2] {
        &self.cond_prob
    }

    /// Breadth-first position order from the root; parents precede children.
    pub fn sample_order(&self) -> &[usize] {
        &self.sample_order
    }

    pub fn elite_size(&self) -> usize {
        self.elite_size
    }

    /// Draws `sample_size` new bit vectors from the model.
    ///
    /// A `sample_size × length` matrix of uniform draws is taken from `rng`
    /// first and then mapped through [`sample_from_draws`](Self::sample_from_draws).
    /// No fitness is computed.
    pub fn generate_new_sample(
        &self,
        sample_size: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Vec<Vec<Bit>> {
        let draws = rng.uniform_matrix(sample_size, self.length);
        self.sample_rows(&draws)
    }

    /// Turns one row of uniform draws per candidate into bit vectors.
    ///
    /// Bit `i` of a candidate is 1 exactly when its draw at column `i` is below
    /// the probability selected by the candidate's already sampled parent bit.
    ///
    /// # Errors
    ///
    /// Returns `OptimizationError::DimensionMismatch` if a row does not have
    /// `length` draws.
    pub fn sample_from_draws(&self, draws: &[Vec<f64>]) -> Result<Vec<Vec<Bit>>> {
        for row in draws {
            if row.len() != self.length {
                return Err(OptimizationError::DimensionMismatch {
                    expected: self.length,
                    actual: row.len(),
                });
            }
        }
        Ok(self.sample_rows(draws))
    }

    fn sample_rows(&self, draws: &[Vec<f64>]) -> Vec<Vec<Bit>> {
        if draws.len() >= self.parallel_threshold {
            draws.par_iter().map(|row| self.sample_row(row)).collect()
        } else {
            draws.iter().map(|row| self.sample_row(row)).collect()
        }
    }

    fn sample_row(&self, draws: &[f64]) -> Vec<Bit> {
        let mut bits = vec![0; self.length];
        for &i in &self.sample_order {
            let parent_value = match self.parent[i] {
                Some(p) => bits[p],
                None => 0,
            };
            let p_one = self.cond_prob[parent_value as usize][i];
            bits[i] = Bit::from(draws[i] < p_one);
        }
        bits
    }
}

fn transpose(length: usize, rows: &[Vec<Bit>]) -> Vec<Vec<Bit>> {
    (0..length)
        .map(|i| rows.iter().map(|row| row[i]).collect())
        .collect()
}

/// Negated mutual information for every pair of positions. Pairs with zero
/// mutual information carry no edge.
fn dependency_edges(columns: &[Vec<Bit>]) -> Vec<Edge> {
    let n = columns.len();
    let mut edges = Vec::new();
    for a in 0..n.saturating_sub(1) {
        for b in (a + 1)..n {
            let weight = -mutual_information(&columns[a], &columns[b]);
            if weight != 0.0 {
                edges.push(Edge { a, b, weight });
            }
        }
    }
    edges
}

fn conditional_probabilities(columns: &[Vec<Bit>], parent: &[Option<usize>]) -> [Vec<f64>; 2] {
    let n = columns.len();
    let mut cond_prob = [vec![0.0; n], vec![0.0; n]];

    for (i, p) in parent.iter().enumerate() {
        match *p {
            None => {
                let column = &columns[i];
                let ones = column.iter().filter(|&&b| b == 1).count();
                let marginal = ratio(ones, column.len());
                cond_prob[0][i] = marginal;
                cond_prob[1][i] = marginal;
            }
            Some(p) => {
                for value in 0..2u8 {
                    let (ones, total) = columns[p]
                        .iter()
                        .zip(&columns[i])
                        .filter(|(&parent_bit, _)| parent_bit == value)
                        .fold((0, 0), |(ones, total), (_, &bit)| {
                            (ones + usize::from(bit == 1), total + 1)
                        });
                    cond_prob[value as usize][i] = ratio(ones, total);
                }
            }
        }
    }

    cond_prob
}

// 0/0 is defined as 0.
fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
