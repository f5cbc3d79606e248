//! Thickness constraints attached to gaps.

use serde::{Deserialize, Serialize};

/// A constraint that computes a gap's thickness from the rest of the
/// system. Evaluated by the solve resolver during a model update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Solve {
    /// Keep the thickness as entered.
    Fixed,
    /// Edge thickness at a semi-height between this gap's two surfaces.
    EdgeThickness {
        /// Semi-height at which the edge is measured.
        height: f64,
        /// Required edge thickness.
        value: f64,
    },
    /// Total axial length from surface `from` to surface `to`.
    OverallLength {
        /// First surface of the span.
        from: usize,
        /// Last surface of the span (exclusive of its own gap).
        to: usize,
        /// Required length.
        value: f64,
    },
    /// Place the next surface at the paraxial image.
    ParaxialImageDistance,
    /// Height of the axial marginal ray on the next surface.
    MarginalHeight {
        /// Required ray height.
        height: f64,
        /// Fraction of the full pupil the ray is traced at.
        zone: f64,
    },
    /// Copy another gap's thickness, scaled and offset.
    Pickup {
        /// Gap to copy.
        from_gap: usize,
        /// Multiplier.
        scale: f64,
        /// Added after scaling.
        offset: f64,
    },
}

impl Solve {
    /// Short name for display.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::EdgeThickness { .. } => "edge thickness",
            Self::OverallLength { .. } => "overall length",
            Self::ParaxialImageDistance => "paraxial image distance",
            Self::MarginalHeight { .. } => "marginal height",
            Self::Pickup { .. } => "pickup",
        }
    }
}
