//! Error type of the optrace facade.

use optrace_assembly::AssemblyError;
use optrace_material::MaterialError;
use optrace_paraxial::ParaxialError;
use optrace_solve::SolveError;
use optrace_spec::SpecError;
use optrace_trace::TraceError;
use thiserror::Error;

/// Anything that can go wrong building, updating or persisting a system.
#[derive(Error, Debug)]
pub enum OptraceError {
    /// File could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Prescription JSON was malformed.
    #[error("prescription JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration TOML was malformed.
    #[error("config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// First-order data is needed but the model has not been updated.
    #[error("model has not been updated since the last edit")]
    ModelNotUpdated,

    /// Material lookup failed.
    #[error(transparent)]
    Material(#[from] MaterialError),

    /// Assembly structure problem.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Specification problem.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// Paraxial data could not be computed.
    #[error(transparent)]
    Paraxial(#[from] ParaxialError),

    /// Real-ray trace setup failed.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// A solve could not be applied.
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, OptraceError>;
