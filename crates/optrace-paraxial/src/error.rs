//! Error types for the paraxial engine.

use optrace_assembly::AssemblyError;
use optrace_spec::{FieldType, PupilType, SpecError};
use thiserror::Error;

/// Errors computing paraxial data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParaxialError {
    /// Pupil type cannot be used with the current object distance.
    #[error("pupil type {0:?} is not defined for an object at infinity")]
    UnsupportedPupil(PupilType),

    /// Field type cannot be used with the current object distance.
    #[error("field type {0:?} is not defined for an object at infinity")]
    UnsupportedField(FieldType),

    /// Structural problem in the assembly.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Structural problem in the specification.
    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Result type for paraxial operations.
pub type Result<T> = std::result::Result<T, ParaxialError>;
