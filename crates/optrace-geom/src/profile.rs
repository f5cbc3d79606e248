//! Surface profiles: sag, implicit function, gradient and normal.

use optrace_math::{Dir3, Point3, Vec3};
use serde::{Deserialize, Serialize};

use crate::intersect::{intersect_newton, intersect_plane, intersect_sphere, Intersection, Miss};

/// Radii smaller than this are treated as flat.
const MIN_RADIUS: f64 = 1e-12;

/// Conic base plus polynomial departure, shared by both asphere kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asphere {
    /// Vertex curvature (1/radius).
    pub cv: f64,
    /// Conic constant; 0 is a sphere, -1 a paraboloid.
    #[serde(default)]
    pub conic: f64,
    /// Polynomial coefficients. For an even asphere `coefficients[i]`
    /// multiplies r^(2i+4); for an odd one it multiplies r^(i+3).
    #[serde(default)]
    pub coefficients: Vec<f64>,
}

impl Asphere {
    /// Asphere with no polynomial terms.
    pub fn conic(cv: f64, conic: f64) -> Self {
        Self {
            cv,
            conic,
            coefficients: Vec::new(),
        }
    }

    /// `1 - (k+1) cv² r²`, negative outside the conic's domain.
    fn conic_root_arg(&self, r2: f64) -> f64 {
        1.0 - (self.conic + 1.0) * self.cv * self.cv * r2
    }

    fn conic_sag(&self, r2: f64) -> f64 {
        let arg = self.conic_root_arg(r2);
        if arg < 0.0 {
            return f64::NAN;
        }
        self.cv * r2 / (1.0 + arg.sqrt())
    }
}

/// Shape of one optical interface in its local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurfaceProfile {
    /// Flat interface at z = 0.
    Plane,
    /// Sphere through the origin with curvature `cv`.
    Spherical {
        /// Curvature (1/radius); 0 degenerates to a plane.
        cv: f64,
    },
    /// Conic plus even powers r⁴ … r²².
    EvenPolynomial(Asphere),
    /// Conic plus all powers r³ … r¹².
    OddPolynomial(Asphere),
}

impl Default for SurfaceProfile {
    fn default() -> Self {
        Self::Plane
    }
}

impl SurfaceProfile {
    /// Sphere of curvature `cv`.
    pub fn spherical(cv: f64) -> Self {
        Self::Spherical { cv }
    }

    /// Sphere of the given radius, following [`SurfaceProfile::set_radius`] rules.
    pub fn from_radius(radius: f64) -> Self {
        let mut profile = Self::spherical(0.0);
        profile.set_radius(radius);
        profile
    }

    /// Vertex curvature.
    pub fn cv(&self) -> f64 {
        match self {
            Self::Plane => 0.0,
            Self::Spherical { cv } => *cv,
            Self::EvenPolynomial(a) | Self::OddPolynomial(a) => a.cv,
        }
    }

    /// Vertex radius; infinite when flat.
    pub fn radius(&self) -> f64 {
        let cv = self.cv();
        if cv == 0.0 {
            f64::INFINITY
        } else {
            1.0 / cv
        }
    }

    /// Set the vertex curvature. Has no effect on a plane.
    pub fn set_cv(&mut self, value: f64) {
        match self {
            Self::Plane => {}
            Self::Spherical { cv } => *cv = value,
            Self::EvenPolynomial(a) | Self::OddPolynomial(a) => a.cv = value,
        }
    }

    /// Set the vertex radius.
    ///
    /// NaN is ignored, an infinite radius gives curvature 0, and a radius
    /// of (numerically) zero is treated as flat too.
    pub fn set_radius(&mut self, radius: f64) {
        if radius.is_nan() {
            return;
        }
        if radius.is_infinite() || radius.abs() < MIN_RADIUS {
            self.set_cv(0.0);
        } else {
            self.set_cv(1.0 / radius);
        }
    }

    /// Axial departure at transverse position `(x, y)`. NaN outside the
    /// surface's domain.
    pub fn sag(&self, x: f64, y: f64) -> f64 {
        let r2 = x * x + y * y;
        match self {
            Self::Plane => 0.0,
            Self::Spherical { cv } => {
                if *cv == 0.0 {
                    return 0.0;
                }
                let arg = 1.0 - cv * cv * r2;
                if arg < 0.0 {
                    return f64::NAN;
                }
                cv * r2 / (1.0 + arg.sqrt())
            }
            Self::EvenPolynomial(a) => {
                let mut z = a.conic_sag(r2);
                let mut power = r2 * r2;
                for coef in &a.coefficients {
                    z += coef * power;
                    power *= r2;
                }
                z
            }
            Self::OddPolynomial(a) => {
                let r = r2.sqrt();
                let mut z = a.conic_sag(r2);
                let mut power = r2 * r;
                for coef in &a.coefficients {
                    z += coef * power;
                    power *= r;
                }
                z
            }
        }
    }

    /// Implicit surface function, zero on the surface and positive beyond it
    /// along +z.
    pub fn f(&self, p: &Point3) -> f64 {
        match self {
            Self::Plane => p.z,
            Self::Spherical { cv } => p.z - 0.5 * cv * p.coords.norm_squared(),
            _ => p.z - self.sag(p.x, p.y),
        }
    }

    /// Gradient of [`SurfaceProfile::f`].
    pub fn df(&self, p: &Point3) -> Vec3 {
        match self {
            Self::Plane => Vec3::z(),
            Self::Spherical { cv } => Vec3::new(-cv * p.x, -cv * p.y, 1.0 - cv * p.z),
            Self::EvenPolynomial(a) => {
                let r2 = p.x * p.x + p.y * p.y;
                let mut e = a.cv / a.conic_root_arg(r2).sqrt();
                let mut power = r2;
                for (i, coef) in a.coefficients.iter().enumerate() {
                    e += (2 * i + 4) as f64 * coef * power;
                    power *= r2;
                }
                Vec3::new(-e * p.x, -e * p.y, 1.0)
            }
            Self::OddPolynomial(a) => {
                let r2 = p.x * p.x + p.y * p.y;
                let r = r2.sqrt();
                let mut e = a.cv / a.conic_root_arg(r2).sqrt();
                let mut power = r;
                for (i, coef) in a.coefficients.iter().enumerate() {
                    e += (i + 3) as f64 * coef * power;
                    power *= r;
                }
                Vec3::new(-e * p.x, -e * p.y, 1.0)
            }
        }
    }

    /// Unit normal at a point on the surface, pointing toward +z near the
    /// vertex.
    pub fn normal(&self, p: &Point3) -> Dir3 {
        Dir3::new_normalize(self.df(p))
    }

    /// Meridional slope dz/dh at height `h`.
    pub fn deriv_1st(&self, h: f64) -> f64 {
        match self {
            Self::Plane => 0.0,
            Self::Spherical { cv } => cv * h / (1.0 - cv * cv * h * h).sqrt(),
            Self::EvenPolynomial(a) => {
                let h2 = h * h;
                let mut d = a.cv * h / a.conic_root_arg(h2).sqrt();
                let mut power = h2 * h;
                for (i, coef) in a.coefficients.iter().enumerate() {
                    d += (2 * i + 4) as f64 * coef * power;
                    power *= h2;
                }
                d
            }
            Self::OddPolynomial(a) => {
                let h2 = h * h;
                let mut d = a.cv * h / a.conic_root_arg(h2).sqrt();
                let mut power = h2;
                for (i, coef) in a.coefficients.iter().enumerate() {
                    d += (i + 3) as f64 * coef * power;
                    power *= h;
                }
                d
            }
        }
    }

    /// Meridional curvature term d²z/dh² at height `h`.
    pub fn deriv_2nd(&self, h: f64) -> f64 {
        match self {
            Self::Plane => 0.0,
            Self::Spherical { cv } => cv / (1.0 - cv * cv * h * h).powf(1.5),
            Self::EvenPolynomial(a) => {
                let h2 = h * h;
                let mut d = a.cv / a.conic_root_arg(h2).powf(1.5);
                let mut power = h2;
                for (i, coef) in a.coefficients.iter().enumerate() {
                    let n = (2 * i + 4) as f64;
                    d += n * (n - 1.0) * coef * power;
                    power *= h2;
                }
                d
            }
            Self::OddPolynomial(a) => {
                let h2 = h * h;
                let mut d = a.cv / a.conic_root_arg(h2).powf(1.5);
                let mut power = h;
                for (i, coef) in a.coefficients.iter().enumerate() {
                    let n = (i + 3) as f64;
                    d += n * (n - 1.0) * coef * power;
                    power *= h;
                }
                d
            }
        }
    }

    /// Intersect the ray `p0 + s·d` with the surface.
    ///
    /// `d` should be a unit vector. The returned distance is measured from
    /// `p0` and may be negative. Start from a point near the surface (the
    /// foot of the perpendicular from the vertex) for best accuracy.
    pub fn intersect(&self, p0: &Point3, d: &Vec3) -> Result<Intersection, Miss> {
        match self {
            Self::Plane => intersect_plane(p0, d),
            Self::Spherical { cv } => intersect_sphere(*cv, p0, d),
            Self::EvenPolynomial(_) | Self::OddPolynomial(_) => intersect_newton(self, p0, d),
        }
    }
}
