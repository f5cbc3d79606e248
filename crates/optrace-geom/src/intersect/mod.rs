//! Ray-surface intersection algorithms.
//!
//! Planes and spheres have closed-form intersectors; aspheres are solved
//! by Newton iteration on the implicit surface function.

mod newton;
mod plane;
mod sphere;

pub use newton::{intersect_newton, intersect_newton_with};
pub use plane::intersect_plane;
pub use sphere::intersect_sphere;

use optrace_math::Point3;

/// A ray-surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Intersection point in the surface's local frame.
    pub point: Point3,
    /// Signed distance from the ray's start point.
    pub distance: f64,
}

/// Why a ray failed to meet a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    /// The ray's line has no real intersection with the surface.
    NoIntersection,
    /// The iteration left the surface's domain (e.g. beyond a conic's rim).
    OutsideDomain,
    /// The iteration did not converge within its cap.
    NotConverged,
}
