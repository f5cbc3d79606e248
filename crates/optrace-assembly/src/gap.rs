//! The medium between two consecutive surfaces.

use std::sync::Arc;

use optrace_material::Material;

use crate::solve::Solve;

/// Thickness and medium following a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Gap {
    /// Axial distance to the next surface; negative after a mirror.
    pub thickness: f64,
    /// Medium filling the gap, shared with other gaps.
    pub material: Arc<Material>,
    /// Constraint that recomputes the thickness on model update.
    pub solve: Option<Solve>,
}

impl Gap {
    /// Gap without a solve.
    pub fn new(thickness: f64, material: Arc<Material>) -> Self {
        Self {
            thickness,
            material,
            solve: None,
        }
    }

    /// Attach a solve.
    pub fn with_solve(mut self, solve: Solve) -> Self {
        self.solve = Some(solve);
        self
    }

    /// Index of the medium at `wvl_nm`.
    pub fn rindex(&self, wvl_nm: f64) -> f64 {
        self.material.rindex(wvl_nm)
    }
}
