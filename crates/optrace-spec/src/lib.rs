#![warn(missing_docs)]

//! Optical specification: what a lens is asked to image.
//!
//! An [`OpticalSpec`] groups the pupil definition, the field points and
//! the wavelength set. It is plain data consumed by the paraxial and real
//! ray tracers; the only mutable state it carries on behalf of the tracer
//! is each field's cached aim point and vignetting factors.

mod error;
mod field;
mod pupil;
mod wavelength;

use serde::{Deserialize, Serialize};

pub use error::{Result, SpecError};
pub use field::{Field, FieldSpec, FieldType};
pub use pupil::{PupilSpec, PupilType};
pub use wavelength::{Wvl, WvlSpec};

/// Pupil, fields and wavelengths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpticalSpec {
    /// Bundle size.
    pub pupil: PupilSpec,
    /// Field points.
    pub field_spec: FieldSpec,
    /// Wavelengths.
    pub wvl_spec: WvlSpec,
}

impl OpticalSpec {
    /// Assemble a specification.
    pub fn new(pupil: PupilSpec, field_spec: FieldSpec, wvl_spec: WvlSpec) -> Self {
        Self {
            pupil,
            field_spec,
            wvl_spec,
        }
    }
}
