//! Per-wavelength view of an assembly used by the real-ray tracer.

use optrace_assembly::{OpticalAssembly, Surface};
use optrace_math::Transform;

/// One surface of a [`SequentialPath`].
#[derive(Debug, Clone, Copy)]
pub struct PathStep<'a> {
    /// The surface.
    pub surface: &'a Surface,
    /// Frame of this surface expressed in the frame the ray arrives from.
    pub transform: Transform,
    /// Refractive index after the surface (unsigned).
    pub n_after: f64,
}

/// Surfaces in trace order with their transforms and indices resolved for
/// one wavelength.
///
/// The first optical surface is placed relative to the launch frame (the
/// incoming axis at its vertex), so the object distance never enters a
/// transform and an object at infinity needs no special handling here.
#[derive(Debug, Clone)]
pub struct SequentialPath<'a> {
    wvl: f64,
    n_object: f64,
    steps: Vec<PathStep<'a>>,
}

impl<'a> SequentialPath<'a> {
    /// Build the path through `assembly` at `wvl_nm`.
    ///
    /// Transforms are read from the assembly; call
    /// [`OpticalAssembly::update_transforms`] after editing it.
    pub fn new(assembly: &'a OpticalAssembly, wvl_nm: f64) -> Self {
        let indices: Vec<f64> = assembly.gap_indices(wvl_nm).iter().map(|n| n.abs()).collect();
        let image = assembly.image_index();
        let steps = assembly
            .surfaces()
            .iter()
            .enumerate()
            .map(|(k, surface)| {
                let transform = match k {
                    0 => Transform::identity(),
                    1 => *surface.global_transform(),
                    _ => *surface.local_transform(),
                };
                let n_after = if k < image { indices[k] } else { indices[image - 1] };
                PathStep {
                    surface,
                    transform,
                    n_after,
                }
            })
            .collect();
        Self {
            wvl: wvl_nm,
            n_object: indices[0],
            steps,
        }
    }

    /// Wavelength in nanometers.
    pub fn wvl(&self) -> f64 {
        self.wvl
    }

    /// Index of object space.
    pub fn n_object(&self) -> f64 {
        self.n_object
    }

    /// Every step, object first.
    pub fn steps(&self) -> &[PathStep<'a>] {
        &self.steps
    }

    /// Number of surfaces including object and image.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the path is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
