//! Real-ray records.

use optrace_math::{Point3, Vec2, Vec3};

/// How a traced ray ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayStatus {
    /// Reached the image surface.
    PassThrough,
    /// Landed outside the clear aperture of `surface`.
    Blocked {
        /// Surface whose aperture clipped the ray.
        surface: usize,
    },
    /// Could not refract out of `surface`.
    TotalInternalReflection {
        /// Surface where refraction failed.
        surface: usize,
    },
    /// Did not meet `surface`.
    Missed {
        /// Surface that was missed.
        surface: usize,
    },
    /// Ray aiming did not converge; the ray was traced from the last guess.
    RayAimingFailed,
}

impl RayStatus {
    /// Whether the ray reached the image.
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough)
    }

    /// Surface at which the ray stopped, if it stopped at one.
    pub fn surface(&self) -> Option<usize> {
        match *self {
            Self::Blocked { surface } | Self::TotalInternalReflection { surface } | Self::Missed { surface } => {
                Some(surface)
            }
            Self::PassThrough | Self::RayAimingFailed => None,
        }
    }
}

/// Ray state at one surface, in that surface's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayAtSurface {
    /// Intersection point.
    pub point: Point3,
    /// Unit surface normal at the intersection.
    pub normal: Vec3,
    /// Unit direction after refraction or reflection.
    pub after_dir: Vec3,
    /// Geometric distance from the previous surface.
    pub distance: f64,
    /// Optical path length accumulated from the first record.
    pub opl: f64,
}

/// A ray traced through the assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    /// One record per surface reached, object first.
    pub segments: Vec<RayAtSurface>,
    /// Outcome of the trace.
    pub status: RayStatus,
    /// Relative pupil coordinate the ray was traced for.
    pub pupil: Vec2,
    /// Wavelength in nanometers.
    pub wvl: f64,
}

impl Ray {
    /// Last record reached.
    pub fn last(&self) -> Option<&RayAtSurface> {
        self.segments.last()
    }

    /// Record at surface `k`, if the ray got that far.
    pub fn at(&self, k: usize) -> Option<&RayAtSurface> {
        self.segments.get(k)
    }

    /// Optical path length to the last record.
    pub fn opl(&self) -> f64 {
        self.segments.last().map(|s| s.opl).unwrap_or(0.0)
    }

    /// Transverse intercept on the image surface, if reached.
    pub fn image_point(&self) -> Option<Vec2> {
        if !self.status.is_pass_through() {
            return None;
        }
        self.segments.last().map(|s| Vec2::new(s.point.x, s.point.y))
    }
}
