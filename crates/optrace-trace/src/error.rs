//! Error types for the real-ray tracer.

use optrace_assembly::AssemblyError;
use optrace_paraxial::ParaxialError;
use optrace_spec::SpecError;
use thiserror::Error;

/// Structural errors raised before any ray is traced.
///
/// Physical outcomes (missed surfaces, TIR, clipping) are not errors; they
/// are reported on [`crate::Ray::status`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraceError {
    /// Assembly index or structure problem.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Field or wavelength index problem.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// First-order data could not be computed.
    #[error(transparent)]
    Paraxial(#[from] ParaxialError),
}

/// Result type for trace operations.
pub type Result<T> = std::result::Result<T, TraceError>;
