pub mod caching;
pub mod error;
pub mod fitness;
pub mod mimic;
pub mod options;
pub mod population;
pub mod rng;
pub mod selection;
pub mod state;

// Re-export commonly used types for convenience
pub use error::{OptimizationError, Result};
pub use fitness::{Bit, FitnessEvaluator};
pub use mimic::{DependencyModel, Mimic};
pub use options::OptimizerOptions;
pub use population::Population;
pub use rng::RandomNumberGenerator;
pub use state::BitStringState;
