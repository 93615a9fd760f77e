//! # Error Types
//!
//! This module defines the error types for the bitstring optimization library.
//! It provides specific error variants for the failure scenarios that can occur
//! while building states, populations and dependency models.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use bitopt::error::{OptimizationError, Result};
//!
//! fn check_length(expected: usize, bits: &[u8]) -> Result<()> {
//!     if bits.len() != expected {
//!         return Err(OptimizationError::DimensionMismatch {
//!             expected,
//!             actual: bits.len(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_length(3, &[0, 1, 1]).is_ok());
//! assert!(check_length(3, &[0, 1]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur in the bitstring optimization library.
#[derive(Error, Debug)]
pub enum OptimizationError {
    /// A supplied bit vector's length disagrees with the declared problem length.
    #[error("Dimension mismatch: expected a bit vector of length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Total fitness is zero (or not finite), so fitness-proportional
    /// probabilities are undefined.
    #[error("Degenerate distribution: {0}")]
    DegenerateDistribution(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A value outside its admissible domain, such as a bit other than 0 or 1.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),
}

/// A specialized Result type for optimization operations.
pub type Result<T> = std::result::Result<T, OptimizationError>;

/// Checks that `bits` has exactly `expected` positions, each 0 or 1.
pub(crate) fn ensure_bits(expected: usize, bits: &[u8]) -> Result<()> {
    if bits.len() != expected {
        return Err(OptimizationError::DimensionMismatch {
            expected,
            actual: bits.len(),
        });
    }
    if let Some(pos) = bits.iter().position(|&b| b > 1) {
        return Err(OptimizationError::InvalidNumericValue(format!(
            "bit {} has value {}, expected 0 or 1",
            pos, bits[pos]
        )));
    }
    Ok(())
}
