//! Error types for material lookup and construction.

use thiserror::Error;

/// Errors that can occur while building or looking up materials.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// No material with this name is known to the library.
    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    /// Dispersion formula code outside 1..=13.
    #[error("unknown dispersion formula code: {0}")]
    UnknownFormula(i32),

    /// More coefficients than a dispersion formula can hold.
    #[error("too many dispersion coefficients: {count} (max {max})")]
    TooManyCoefficients {
        /// Number supplied.
        count: usize,
        /// Capacity of the formula.
        max: usize,
    },

    /// Model glass parameters that cannot define a dispersion curve.
    #[error("invalid model glass nd={nd}, vd={vd}")]
    InvalidModelGlass {
        /// Index at the d line.
        nd: f64,
        /// Abbe number.
        vd: f64,
    },
}

/// Result type for material operations.
pub type Result<T> = std::result::Result<T, MaterialError>;
