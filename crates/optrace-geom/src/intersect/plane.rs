//! Ray-plane intersection.

use optrace_math::{Point3, Vec3};

use super::{Intersection, Miss};

/// Intersect `p0 + s·d` with the plane z = 0.
pub fn intersect_plane(p0: &Point3, d: &Vec3) -> Result<Intersection, Miss> {
    if d.z == 0.0 {
        return Err(Miss::NoIntersection);
    }
    let distance = -p0.z / d.z;
    Ok(Intersection {
        point: p0 + distance * d,
        distance,
    })
}
