//! Paraxial ray records and the y-nu recursion.

use optrace_assembly::{AssemblyError, OpticalAssembly};
use serde::{Deserialize, Serialize};

/// Paraxial ray state just after one surface.
///
/// The incoming angle and index are not stored; they are the outgoing
/// values of the `before` record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParaxialRayAtSurface {
    /// Ray height at the surface.
    pub y: f64,
    /// Slope after refraction.
    pub u_prime: f64,
    /// Paraxial angle of incidence.
    pub i: f64,
    /// Index after the surface, signed by propagation direction.
    pub n_prime: f64,
    /// Record this one continues from; `None` for the object record.
    pub before: Option<usize>,
}

/// Starting height and slope of a paraxial ray.
///
/// For a finite object the height is taken on the object surface; for an
/// object at infinity it is taken on the first optical surface's vertex
/// plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParaxialStart {
    /// Height at the launch plane.
    pub y: f64,
    /// Slope in object space.
    pub u: f64,
}

impl ParaxialStart {
    /// Start at height `y` with slope `u`.
    pub fn new(y: f64, u: f64) -> Self {
        Self { y, u }
    }

    /// This start with height and slope multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.y * factor, self.u * factor)
    }
}

/// A paraxial ray traced from object to image, one record per surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ParaxialRay {
    records: Vec<ParaxialRayAtSurface>,
    wvl: f64,
}

impl ParaxialRay {
    /// Trace through `assembly` at `wvl_nm`.
    pub fn trace(assembly: &OpticalAssembly, wvl_nm: f64, start: ParaxialStart) -> Self {
        let indices = assembly.gap_indices(wvl_nm);
        let surfaces = assembly.surfaces();
        let gaps = assembly.gaps();
        let image = assembly.image_index();
        let object_at_infinity = assembly.is_object_at_infinity();

        let mut records = Vec::with_capacity(surfaces.len());
        records.push(ParaxialRayAtSurface {
            y: start.y,
            u_prime: start.u,
            i: start.u + start.y * surfaces[0].cv(),
            n_prime: indices[0],
            before: None,
        });

        for k in 1..=image {
            let prev = records[k - 1];
            let thickness = if k == 1 && object_at_infinity {
                0.0
            } else {
                gaps[k - 1].thickness
            };
            let y = prev.y + thickness * prev.u_prime;
            let u = prev.u_prime;
            let n = prev.n_prime;
            let cv = surfaces[k].cv();
            let n_prime = if k < image { indices[k] } else { n };
            let power = (n_prime - n) * cv;
            let u_prime = (n * u - y * power) / n_prime;
            records.push(ParaxialRayAtSurface {
                y,
                u_prime,
                i: u + y * cv,
                n_prime,
                before: Some(k - 1),
            });
        }

        Self {
            records,
            wvl: wvl_nm,
        }
    }

    /// Wavelength traced, in nanometers.
    pub fn wvl(&self) -> f64 {
        self.wvl
    }

    /// Number of records (one per surface).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ray has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, object first.
    pub fn records(&self) -> &[ParaxialRayAtSurface] {
        &self.records
    }

    /// Record at surface `k`.
    pub fn at(&self, k: usize) -> Result<&ParaxialRayAtSurface, AssemblyError> {
        self.records.get(k).ok_or(AssemblyError::OutOfRange {
            collection: "paraxial records",
            index: k,
            len: self.records.len(),
        })
    }

    /// Image-surface record.
    pub fn image(&self) -> &ParaxialRayAtSurface {
        &self.records[self.records.len() - 1]
    }

    /// Record just after the last optical surface.
    pub fn last_optical(&self) -> &ParaxialRayAtSurface {
        &self.records[self.records.len() - 2]
    }

    /// Height at surface `k`.
    pub fn y(&self, k: usize) -> f64 {
        self.records[k].y
    }

    /// Slope after surface `k`.
    pub fn u_prime(&self, k: usize) -> f64 {
        self.records[k].u_prime
    }

    /// Slope arriving at surface `k`.
    pub fn u(&self, k: usize) -> f64 {
        let rec = &self.records[k];
        rec.before
            .map(|b| self.records[b].u_prime)
            .unwrap_or(rec.u_prime)
    }

    /// Index before surface `k`.
    pub fn n(&self, k: usize) -> f64 {
        let rec = &self.records[k];
        rec.before
            .map(|b| self.records[b].n_prime)
            .unwrap_or(rec.n_prime)
    }

    /// Index after surface `k`.
    pub fn n_prime(&self, k: usize) -> f64 {
        self.records[k].n_prime
    }
}

/// The Lagrange invariant `n·u·ȳ − n·y·ū` of two rays at surface `k`,
/// evaluated on the incoming side.
pub fn lagrange_invariant(marginal: &ParaxialRay, chief: &ParaxialRay, k: usize) -> f64 {
    let n = marginal.n(k);
    n * marginal.u(k) * chief.y(k) - n * marginal.y(k) * chief.u(k)
}
