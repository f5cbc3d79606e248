//! Ray-asphere intersection (Newton iteration on the implicit function).

use optrace_math::{Convergence, Point3, Vec3};

use super::{Intersection, Miss};
use crate::SurfaceProfile;

/// Intersect `p0 + s·d` with any profile by Newton iteration.
///
/// Seeded at the ray's crossing of the vertex plane (or at `p0` for a ray
/// parallel to it) and iterated as `s ← s − f(p)/(d·∇f(p))`.
pub fn intersect_newton(profile: &SurfaceProfile, p0: &Point3, d: &Vec3) -> Result<Intersection, Miss> {
    intersect_newton_with(profile, p0, d, Convergence::INTERSECTION)
}

/// [`intersect_newton`] with explicit termination rules.
pub fn intersect_newton_with(
    profile: &SurfaceProfile,
    p0: &Point3,
    d: &Vec3,
    convergence: Convergence,
) -> Result<Intersection, Miss> {
    let mut s = if d.z != 0.0 { -p0.z / d.z } else { 0.0 };

    for _ in 0..convergence.max_iterations {
        let p = p0 + s * d;
        let f = profile.f(&p);
        if !f.is_finite() {
            return Err(Miss::OutsideDomain);
        }
        let slope = d.dot(&profile.df(&p));
        if slope == 0.0 || !slope.is_finite() {
            return Err(Miss::OutsideDomain);
        }
        let next = s - f / slope;
        if (next - s).abs() < convergence.tolerance {
            return Ok(Intersection {
                point: p0 + next * d,
                distance: next,
            });
        }
        s = next;
    }

    Err(Miss::NotConverged)
}
