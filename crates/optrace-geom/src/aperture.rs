//! Apertures limiting the usable area of a surface.

use serde::{Deserialize, Serialize};

/// Transverse limit of a surface, tested in its local frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Aperture {
    /// Unlimited; every point passes.
    #[default]
    None,
    /// Circle centred on the local axis.
    Circular {
        /// Radius of the clear area.
        radius: f64,
    },
}

impl Aperture {
    /// Circular aperture of the given radius.
    pub fn circular(radius: f64) -> Self {
        Self::Circular { radius }
    }

    /// Largest transverse extent from the axis, if limited.
    pub fn max_dimension(&self) -> Option<f64> {
        match self {
            Self::None => None,
            Self::Circular { radius } => Some(*radius),
        }
    }

    /// Whether `(x, y)` lies within the aperture. A point exactly on the
    /// rim counts as inside.
    pub fn point_inside(&self, x: f64, y: f64) -> bool {
        match self {
            Self::None => true,
            Self::Circular { radius } => x * x + y * y <= radius * radius,
        }
    }

    /// How far `(x, y)` lies beyond the rim; zero inside or on it.
    pub fn overshoot(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Circular { radius } => (x.hypot(y) - radius).max(0.0),
        }
    }

    /// Whether this aperture limits anything.
    pub fn is_limiting(&self) -> bool {
        !matches!(self, Self::None)
    }
}
