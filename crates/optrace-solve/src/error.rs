//! Error types for the solve resolver.

use optrace_assembly::AssemblyError;
use thiserror::Error;

/// Errors checking or applying a solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The solve's parameters do not make sense for the gap it sits on.
    #[error("{solve} solve on gap {gap}: {reason}")]
    InvalidSolve {
        /// Gap carrying the solve.
        gap: usize,
        /// Solve name.
        solve: &'static str,
        /// What is wrong.
        reason: &'static str,
    },

    /// The solve produced a non-finite thickness.
    #[error("{solve} solve on gap {gap} produced a non-finite thickness")]
    NotFinite {
        /// Gap carrying the solve.
        gap: usize,
        /// Solve name.
        solve: &'static str,
    },

    /// Assembly index problem.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

/// Result type for solve operations.
pub type Result<T> = std::result::Result<T, SolveError>;
