//! Aperture specification.

use serde::{Deserialize, Serialize};

/// Which quantity sets the size of the ray bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PupilType {
    /// Entrance pupil diameter.
    #[default]
    EntrancePupilDiameter,
    /// Image-space working f-number.
    FNumber,
    /// Object-space numerical aperture.
    ObjectNA,
    /// Image-space numerical aperture.
    ImageNA,
}

/// Pupil type and its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PupilSpec {
    /// Quantity held fixed.
    pub pupil_type: PupilType,
    /// Its value.
    pub value: f64,
}

impl PupilSpec {
    /// Pupil defined by `pupil_type` and `value`.
    pub fn new(pupil_type: PupilType, value: f64) -> Self {
        Self { pupil_type, value }
    }
}

impl Default for PupilSpec {
    fn default() -> Self {
        Self::new(PupilType::EntrancePupilDiameter, 10.0)
    }
}
