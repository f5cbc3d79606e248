//! Vector Snell's law.

use optrace_math::Vec3;

/// Slack below zero tolerated in the refraction discriminant, so a ray at
/// exactly the critical angle still refracts (grazing).
pub const TIR_TOLERANCE: f64 = 1e-12;

/// Refract unit direction `d` at a surface with unit normal `normal` from
/// index `n` into index `n_prime`.
///
/// The normal may face either way. Returns `None` on total internal
/// reflection.
pub fn refract(d: &Vec3, normal: &Vec3, n: f64, n_prime: f64) -> Option<Vec3> {
    let cos_i = d.dot(normal);
    let inside = n_prime * n_prime - n * n * (1.0 - cos_i * cos_i);
    if inside < -TIR_TOLERANCE {
        return None;
    }
    let root = inside.max(0.0).sqrt();
    let sign = if cos_i < 0.0 { -1.0 } else { 1.0 };
    Some((n * d + (sign * root - n * cos_i) * normal) / n_prime)
}

/// Mirror `d` about the plane with unit normal `normal`.
pub fn reflect(d: &Vec3, normal: &Vec3) -> Vec3 {
    d - 2.0 * d.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_incidence_is_undeviated() {
        let d = Vec3::z();
        let out = refract(&d, &Vec3::z(), 1.0, 1.5).unwrap();
        assert_relative_eq!(out, d, epsilon = 1e-15);
        let back = refract(&d, &-Vec3::z(), 1.5, 1.0).unwrap();
        assert_relative_eq!(back, d, epsilon = 1e-15);
    }

    #[test]
    fn test_snell_sines() {
        let theta: f64 = 30f64.to_radians();
        let d = Vec3::new(theta.sin(), 0.0, theta.cos());
        let out = refract(&d, &Vec3::z(), 1.0, 1.5).unwrap();
        assert_relative_eq!(out.norm(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(1.5 * out.x, theta.sin(), epsilon = 1e-14);
        assert!(out.z > 0.0);
    }

    #[test]
    fn test_critical_angle_is_not_tir() {
        let sin_c = 1.0 / 1.5;
        let d = Vec3::new(sin_c, 0.0, (1.0 - sin_c * sin_c).sqrt());
        let out = refract(&d, &Vec3::z(), 1.5, 1.0).unwrap();
        // grazing exit
        assert_relative_eq!(out.x, 1.0, epsilon = 1e-7);
        assert_relative_eq!(out.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_beyond_critical_is_tir() {
        let sin_t = 1.0 / 1.5 + 1e-6;
        let d = Vec3::new(sin_t, 0.0, (1.0 - sin_t * sin_t).sqrt());
        assert!(refract(&d, &Vec3::z(), 1.5, 1.0).is_none());
    }

    #[test]
    fn test_reflect() {
        let d = Vec3::new(0.6, 0.0, 0.8);
        let out = reflect(&d, &Vec3::z());
        assert_relative_eq!(out, Vec3::new(0.6, 0.0, -0.8), epsilon = 1e-15);
        assert_relative_eq!(reflect(&d, &-Vec3::z()), out, epsilon = 1e-15);
    }
}
