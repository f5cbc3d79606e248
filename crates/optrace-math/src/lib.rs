#![warn(missing_docs)]

//! Math types for the optrace sequential ray tracer.
//!
//! Thin wrappers around nalgebra providing the types shared by every
//! optical crate: points, vectors, directions, rigid surface-to-surface
//! transforms, and iteration limits for the numerical solvers.

use nalgebra::{Matrix3, Unit, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A vector in 2D space (pupil coordinates, aim points).
pub type Vec2 = Vector2<f64>;

/// A 3x3 rotation matrix.
pub type Mat3 = Matrix3<f64>;

/// Object distances at or beyond this magnitude are treated as infinite.
pub const INFINITE_DISTANCE: f64 = 1.0e10;

/// Whether a distance along the axis should be treated as infinite.
#[inline]
pub fn is_infinite_distance(distance: f64) -> bool {
    !distance.is_finite() || distance.abs() >= INFINITE_DISTANCE
}

/// A rigid transform: rotation followed by translation.
///
/// A surface's transform maps a point expressed in its own local frame
/// into the frame of its parent: `p_parent = rotation * p + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Orthonormal rotation part.
    pub rotation: Mat3,
    /// Translation part, expressed in the parent frame.
    pub translation: Vec3,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            rotation: Mat3::identity(),
            translation: Vec3::zeros(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            rotation: Mat3::identity(),
            translation: Vec3::new(dx, dy, dz),
        }
    }

    /// Pure rotation.
    pub fn rotation(rotation: Mat3) -> Self {
        Self {
            rotation,
            translation: Vec3::zeros(),
        }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::rotation(Mat3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c))
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::rotation(Mat3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c))
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::rotation(Mat3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0))
    }

    /// Tilt from lens-design Euler angles in degrees.
    ///
    /// `alpha` and `beta` are left-handed tilts about X and Y, `gamma` is a
    /// right-handed roll about Z. Applied in X, Y, Z order.
    pub fn tilt_degrees(alpha: f64, beta: f64, gamma: f64) -> Self {
        let rx = Self::rotation_x(-alpha.to_radians());
        let ry = Self::rotation_y(-beta.to_radians());
        let rz = Self::rotation_z(gamma.to_radians());
        rx.then(&ry).then(&rz)
    }

    /// Compose: apply `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// Map a point from the local frame into the parent frame.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        Point3::from(self.rotation * p.coords + self.translation)
    }

    /// Map a direction from the local frame into the parent frame.
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.rotation * v
    }

    /// Map a point from the parent frame into the local frame.
    pub fn to_local_point(&self, p: &Point3) -> Point3 {
        Point3::from(self.rotation.transpose() * (p.coords - self.translation))
    }

    /// Map a direction from the parent frame into the local frame.
    pub fn to_local_vec(&self, v: &Vec3) -> Vec3 {
        self.rotation.transpose() * v
    }

    /// Inverse transform. Always exists for a rigid motion.
    pub fn inverse(&self) -> Self {
        let rt = self.rotation.transpose();
        Self {
            rotation: rt,
            translation: -(rt * self.translation),
        }
    }

    /// Whether this transform is a pure translation along z.
    pub fn is_axial(&self) -> bool {
        self.rotation == Mat3::identity()
            && self.translation.x == 0.0
            && self.translation.y == 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Termination rule for an iterative solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Convergence {
    /// Stop once the step (or residual) falls below this value.
    pub tolerance: f64,
    /// Give up after this many iterations.
    pub max_iterations: usize,
}

impl Convergence {
    /// Newton intersection with an aspheric surface.
    pub const INTERSECTION: Self = Self {
        tolerance: 1e-12,
        max_iterations: 50,
    };

    /// Real-ray aiming at the stop surface.
    pub const RAY_AIMING: Self = Self {
        tolerance: 1e-9,
        max_iterations: 30,
    };

    /// Bisection of vignetting factors.
    pub const VIGNETTING: Self = Self {
        tolerance: 1e-5,
        max_iterations: 30,
    };
}

impl Default for Convergence {
    fn default() -> Self {
        Self::INTERSECTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_translation_roundtrip() {
        let t = Transform::translation(1.0, -2.0, 30.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        let parent = t.apply_point(&p);
        assert_relative_eq!(parent, Point3::new(2.0, 0.0, 33.0), epsilon = 1e-12);
        assert_relative_eq!(t.to_local_point(&parent), p, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_z_90() {
        let t = Transform::rotation_z(PI / 2.0);
        let v = t.apply_vec(&Vec3::x());
        assert_relative_eq!(v, Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_compose_order() {
        // translate then rotate: origin -> (1,0,0) -> (0,1,0)
        let composed = Transform::rotation_z(PI / 2.0).then(&Transform::translation(1.0, 0.0, 0.0));
        let result = composed.apply_point(&Point3::origin());
        assert_relative_eq!(result, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_inverse() {
        let t = Transform::tilt_degrees(10.0, -5.0, 3.0).then(&Transform::translation(0.5, 0.2, 7.0));
        let p = Point3::new(5.0, 6.0, 7.0);
        let back = t.inverse().apply_point(&t.apply_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);
        assert_relative_eq!(t.inverse().apply_point(&p), t.to_local_point(&p), epsilon = 1e-12);
    }

    #[test]
    fn test_tilt_alpha() {
        let t = Transform::tilt_degrees(10.0, 0.0, 0.0);
        let axis = t.apply_vec(&Vec3::z());
        assert_relative_eq!(axis.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(axis.y, 10f64.to_radians().sin(), epsilon = 1e-12);
        assert_relative_eq!(axis.z, 10f64.to_radians().cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_is_axial() {
        assert!(Transform::translation(0.0, 0.0, 5.0).is_axial());
        assert!(!Transform::translation(0.1, 0.0, 5.0).is_axial());
        assert!(!Transform::rotation_x(0.1).is_axial());
    }

    #[test]
    fn test_infinite_distance() {
        assert!(is_infinite_distance(f64::INFINITY));
        assert!(is_infinite_distance(-2.0e10));
        assert!(!is_infinite_distance(1000.0));
    }
}
