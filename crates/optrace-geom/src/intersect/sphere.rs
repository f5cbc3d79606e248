//! Ray-sphere intersection (quadratic equation).

use optrace_math::{Point3, Vec3};

use super::{Intersection, Miss};

/// Intersect `p0 + s·d` with the sphere `cv·(p·p) − 2·p_z = 0`.
///
/// Of the two roots, the one on the vertex side of the sphere is chosen
/// for the ray's direction of travel. The root is computed in the form
/// that stays finite as `cv → 0`, so a flat sphere behaves as a plane.
pub fn intersect_sphere(cv: f64, p0: &Point3, d: &Vec3) -> Result<Intersection, Miss> {
    // cv·s² + 2·b·s + c = 0
    let b = cv * d.dot(&p0.coords) - d.z;
    let c = cv * p0.coords.norm_squared() - 2.0 * p0.z;
    let discriminant = b * b - cv * c;
    if discriminant < 0.0 {
        return Err(Miss::NoIntersection);
    }

    let z_dir = if d.z < 0.0 { -1.0 } else { 1.0 };
    let denom = z_dir * discriminant.sqrt() - b;
    if denom == 0.0 {
        return Err(Miss::NoIntersection);
    }
    let distance = c / denom;
    Ok(Intersection {
        point: p0 + distance * d,
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axial_ray_hits_vertex() {
        let hit = intersect_sphere(0.01, &Point3::new(0.0, 0.0, -5.0), &Vec3::z()).unwrap();
        assert_relative_eq!(hit.distance, 5.0, epsilon = 1e-12);
        assert_relative_eq!(hit.point, Point3::origin(), epsilon = 1e-12);
    }

    #[test]
    fn test_known_point() {
        // Point on the sphere of radius 100 at height 30.
        let cv = 0.01;
        let y: f64 = 30.0;
        let z = 100.0 - (100.0f64 * 100.0 - y * y).sqrt();
        let target = Point3::new(0.0, y, z);
        let d = Vec3::new(0.0, 0.2, 1.0).normalize();
        let start = target - 7.5 * d;
        let hit = intersect_sphere(cv, &start, &d).unwrap();
        assert_relative_eq!(hit.point, target, epsilon = 1e-9);
        assert_relative_eq!(hit.distance, 7.5, epsilon = 1e-9);
    }

    #[test]
    fn test_impact_parameter_beyond_radius_misses() {
        let result = intersect_sphere(0.1, &Point3::new(0.0, 10.5, -1.0), &Vec3::z());
        assert_eq!(result, Err(Miss::NoIntersection));
    }

    #[test]
    fn test_flat_limit() {
        let hit = intersect_sphere(0.0, &Point3::new(1.0, 2.0, -3.0), &Vec3::z()).unwrap();
        assert_relative_eq!(hit.distance, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_backward_ray() {
        // A reflected ray travelling toward -z still finds the vertex-side root.
        let hit = intersect_sphere(-0.02, &Point3::new(0.0, 1.0, 5.0), &(-Vec3::z())).unwrap();
        let expected_z = -0.02 / (1.0 + (1.0f64 - 0.0004).sqrt());
        assert_relative_eq!(hit.point.z, expected_z, epsilon = 1e-12);
    }
}
