//! The ordered surface/gap sequence of a lens.

use std::sync::Arc;

use optrace_material::Material;
use optrace_math::{is_infinite_distance, Transform, INFINITE_DISTANCE};

use crate::error::{check_index, AssemblyError, Result};
use crate::gap::Gap;
use crate::surface::{DecenterKind, InteractionMode, Surface};

/// A sequential lens: object, optical surfaces, image.
///
/// With N optical surfaces there are N+2 surfaces and N+1 gaps; gap `i`
/// separates surface `i` from surface `i+1`. Gap 0 holds the object
/// distance and the last gap the image distance.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalAssembly {
    surfaces: Vec<Surface>,
    gaps: Vec<Gap>,
    stop_index: usize,
}

impl OpticalAssembly {
    /// Object, stop and image, all in `medium`, with the object at infinity.
    pub fn minimal(medium: Arc<Material>) -> Self {
        let mut assembly = Self {
            surfaces: vec![Surface::new("Obj"), Surface::new("Stop"), Surface::new("Img")],
            gaps: vec![
                Gap::new(INFINITE_DISTANCE, Arc::clone(&medium)),
                Gap::new(0.0, medium),
            ],
            stop_index: 1,
        };
        assembly.update_transforms();
        assembly
    }

    /// Build from complete surface and gap lists.
    pub fn from_parts(surfaces: Vec<Surface>, gaps: Vec<Gap>, stop_index: usize) -> Result<Self> {
        if surfaces.len() < 3 {
            return Err(AssemblyError::OutOfRange {
                collection: "surfaces",
                index: 2,
                len: surfaces.len(),
            });
        }
        if gaps.len() != surfaces.len() - 1 {
            return Err(AssemblyError::OutOfRange {
                collection: "gaps",
                index: surfaces.len() - 2,
                len: gaps.len(),
            });
        }
        let mut assembly = Self {
            surfaces,
            gaps,
            stop_index: 1,
        };
        assembly.set_stop(stop_index)?;
        assembly.update_transforms();
        Ok(assembly)
    }

    /// Number of surfaces including object and image.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Number of gaps (`surface_count() - 1`).
    pub fn gap_count(&self) -> usize {
        self.gaps.len()
    }

    /// Index of the image surface.
    pub fn image_index(&self) -> usize {
        self.surfaces.len() - 1
    }

    /// Index of the aperture stop.
    pub fn stop_index(&self) -> usize {
        self.stop_index
    }

    /// Designate a new stop. Must be an optical surface.
    pub fn set_stop(&mut self, index: usize) -> Result<()> {
        if index == 0 || index >= self.image_index() {
            return Err(AssemblyError::InvalidStop {
                index,
                image_index: self.image_index(),
            });
        }
        self.stop_index = index;
        Ok(())
    }

    /// All surfaces.
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// All gaps.
    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    /// Surface `index`.
    pub fn surface(&self, index: usize) -> Result<&Surface> {
        check_index("surfaces", index, self.surfaces.len())?;
        Ok(&self.surfaces[index])
    }

    /// Mutable surface `index`.
    pub fn surface_mut(&mut self, index: usize) -> Result<&mut Surface> {
        check_index("surfaces", index, self.surfaces.len())?;
        Ok(&mut self.surfaces[index])
    }

    /// Gap `index`.
    pub fn gap(&self, index: usize) -> Result<&Gap> {
        check_index("gaps", index, self.gaps.len())?;
        Ok(&self.gaps[index])
    }

    /// Mutable gap `index`.
    pub fn gap_mut(&mut self, index: usize) -> Result<&mut Gap> {
        check_index("gaps", index, self.gaps.len())?;
        Ok(&mut self.gaps[index])
    }

    /// The stop surface.
    pub fn stop(&self) -> &Surface {
        &self.surfaces[self.stop_index]
    }

    /// Gap between the last optical surface and the image.
    pub fn image_space_gap(&self) -> &Gap {
        &self.gaps[self.gaps.len() - 1]
    }

    /// Mutable image-space gap.
    pub fn image_space_gap_mut(&mut self) -> &mut Gap {
        let last = self.gaps.len() - 1;
        &mut self.gaps[last]
    }

    /// Object distance (thickness of gap 0).
    pub fn object_distance(&self) -> f64 {
        self.gaps[0].thickness
    }

    /// Whether the object is treated as infinitely distant.
    pub fn is_object_at_infinity(&self) -> bool {
        is_infinite_distance(self.object_distance())
    }

    /// Insert `surface` at `index`, followed by `gap`.
    ///
    /// The gap that used to lead into position `index` now leads into the
    /// new surface. `index` must lie in `1..=image_index()`.
    pub fn insert(&mut self, index: usize, surface: Surface, gap: Gap) -> Result<()> {
        if index == 0 || index > self.image_index() {
            return Err(AssemblyError::OutOfRange {
                collection: "surfaces",
                index,
                len: self.surfaces.len(),
            });
        }
        self.surfaces.insert(index, surface);
        self.gaps.insert(index, gap);
        if index <= self.stop_index {
            self.stop_index += 1;
        }
        self.update_transforms();
        Ok(())
    }

    /// Remove optical surface `index` together with the gap that follows it.
    ///
    /// Removing the stop moves the stop to the surface that takes its place.
    pub fn remove(&mut self, index: usize) -> Result<(Surface, Gap)> {
        if index == 0 || index >= self.image_index() {
            return Err(AssemblyError::OutOfRange {
                collection: "surfaces",
                index,
                len: self.surfaces.len(),
            });
        }
        if self.surfaces.len() <= 3 {
            return Err(AssemblyError::CannotRemove(index));
        }
        let surface = self.surfaces.remove(index);
        let gap = self.gaps.remove(index);
        if index < self.stop_index {
            self.stop_index -= 1;
        }
        self.stop_index = self.stop_index.clamp(1, self.image_index() - 1);
        self.update_transforms();
        Ok((surface, gap))
    }

    /// Axial length from surface `from` to surface `to`: the sum of
    /// thicknesses of gaps `from..to`.
    pub fn overall_length(&self, from: usize, to: usize) -> Result<f64> {
        check_index("surfaces", from, self.surfaces.len())?;
        check_index("surfaces", to, self.surfaces.len())?;
        if from >= to {
            return Ok(0.0);
        }
        Ok(self.gaps[from..to].iter().map(|g| g.thickness).sum())
    }

    /// Sign of the propagation direction in each gap: -1 after an odd
    /// number of mirrors.
    pub fn gap_directions(&self) -> Vec<f64> {
        let mut sign = 1.0;
        let mut directions = Vec::with_capacity(self.gaps.len());
        for surface in &self.surfaces[..self.gaps.len()] {
            if surface.interact_mode == InteractionMode::Reflect {
                sign = -sign;
            }
            directions.push(sign);
        }
        directions
    }

    /// Refractive index of every gap at `wvl_nm`, signed by propagation
    /// direction.
    pub fn gap_indices(&self, wvl_nm: f64) -> Vec<f64> {
        self.gaps
            .iter()
            .zip(self.gap_directions())
            .map(|(gap, sign)| sign * gap.rindex(wvl_nm))
            .collect()
    }

    /// Refresh every surface's index step at `wvl_nm`.
    pub fn update_delta_n(&mut self, wvl_nm: f64) {
        let indices = self.gap_indices(wvl_nm);
        let last = self.surfaces.len() - 1;
        for (i, surface) in self.surfaces.iter_mut().enumerate() {
            let delta = if i == 0 || i == last {
                0.0
            } else {
                indices[i] - indices[i - 1]
            };
            surface.set_delta_n(delta);
        }
    }

    /// Recompute local and global transforms from thicknesses and decenters.
    ///
    /// Global transforms are referenced to the incoming axis at the first
    /// optical surface's vertex.
    pub fn update_transforms(&mut self) {
        let count = self.surfaces.len();
        let mut locals = Vec::with_capacity(count);
        locals.push(Transform::identity());
        let mut entrance = Transform::identity();
        for k in 1..count {
            let before = &self.surfaces[k - 1];
            let restore = match before.decenter {
                Some(dec) if dec.kind == DecenterKind::DecenterAndReturn => dec.transform().inverse(),
                _ => Transform::identity(),
            };
            let own = self.surfaces[k]
                .decenter
                .map(|dec| dec.transform())
                .unwrap_or_else(Transform::identity);
            if k == 1 {
                entrance = restore.then(&own);
            }
            let local = restore
                .then(&Transform::translation(0.0, 0.0, self.gaps[k - 1].thickness))
                .then(&own);
            locals.push(local);
        }

        let mut globals = vec![Transform::identity(); count];
        globals[1] = entrance;
        globals[0] = globals[1].then(&locals[1].inverse());
        for k in 2..count {
            globals[k] = globals[k - 1].then(&locals[k]);
        }

        for (surface, (local, global)) in self.surfaces.iter_mut().zip(locals.into_iter().zip(globals)) {
            surface.set_transforms(local, global);
        }
    }
}
