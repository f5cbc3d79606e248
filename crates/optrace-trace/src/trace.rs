//! Surface-by-surface propagation and the pupil-ray tracer.

use optrace_assembly::{InteractionMode, OpticalAssembly};
use optrace_math::{Point3, Vec2, Vec3};
use optrace_paraxial::{FirstOrderData, ParaxialError};
use optrace_spec::{Field, FieldType, OpticalSpec};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aim::aim_ray;
use crate::error::Result;
use crate::path::SequentialPath;
use crate::ray::{Ray, RayAtSurface, RayStatus};
use crate::refract::{reflect, refract};

/// Distance beyond an aperture rim still counted as inside, so rays aimed
/// at the rim are not lost to the aiming tolerance.
pub const RIM_TOLERANCE: f64 = 1e-9;

/// How launch points are found for a pupil coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AimMode {
    /// Iterate until the real ray hits the requested stop position.
    #[default]
    Real,
    /// Launch through the scaled paraxial entrance pupil without iterating.
    Paraxial,
}

/// Switches for a trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    /// Ray aiming strategy.
    pub aim: AimMode,
    /// Shrink pupil coordinates by each field's vignetting factors.
    pub apply_vignetting: bool,
    /// Stop rays that land outside a clear aperture.
    pub aperture_check: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            aim: AimMode::Real,
            apply_vignetting: true,
            aperture_check: true,
        }
    }
}

/// Propagate a ray given in the launch frame through surfaces `1..=last`.
///
/// The first record is the launch point itself. Tracing stops at the first
/// surface that is missed, clips the ray or cannot refract it; the
/// returned status says which.
pub fn propagate(
    path: &SequentialPath<'_>,
    start: Point3,
    dir: Vec3,
    last: usize,
    aperture_check: bool,
) -> (Vec<RayAtSurface>, RayStatus) {
    let steps = path.steps();
    let image = steps.len() - 1;
    let last = last.min(image);

    let mut segments = Vec::with_capacity(last + 1);
    segments.push(RayAtSurface {
        point: start,
        normal: Vec3::z(),
        after_dir: dir,
        distance: 0.0,
        opl: 0.0,
    });

    let mut pos = start;
    let mut dir = dir;
    let mut n = path.n_object();
    let mut opl = 0.0;

    for (k, step) in steps.iter().enumerate().take(last + 1).skip(1) {
        let p = step.transform.to_local_point(&pos);
        let d = step.transform.to_local_vec(&dir);

        // intersect from the foot of the perpendicular to the vertex
        let s0 = -p.coords.dot(&d);
        let foot = p + s0 * d;
        let hit = match step.surface.profile.intersect(&foot, &d) {
            Ok(hit) => hit,
            Err(_) => return (segments, RayStatus::Missed { surface: k }),
        };
        let distance = s0 + hit.distance;
        opl += n * distance;
        let normal = step.surface.profile.normal(&hit.point).into_inner();

        let mut record = RayAtSurface {
            point: hit.point,
            normal,
            after_dir: d,
            distance,
            opl,
        };

        if aperture_check && step.surface.clear_aperture.overshoot(hit.point.x, hit.point.y) > RIM_TOLERANCE {
            segments.push(record);
            return (segments, RayStatus::Blocked { surface: k });
        }

        if k < image {
            record.after_dir = match step.surface.interact_mode {
                InteractionMode::Reflect => reflect(&d, &normal),
                InteractionMode::Transmit => match refract(&d, &normal, n, step.n_after) {
                    Some(after) => after,
                    None => {
                        segments.push(record);
                        return (segments, RayStatus::TotalInternalReflection { surface: k });
                    }
                },
            };
        }

        segments.push(record);
        pos = record.point;
        dir = record.after_dir;
        n = step.n_after;
    }

    (segments, RayStatus::PassThrough)
}

/// Where the rays of one field come from, in the launch frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldLaunch {
    /// Finite object: every ray starts at this point.
    Point(Point3),
    /// Object at infinity: every ray travels along this unit direction.
    Direction(Vec3),
}

impl FieldLaunch {
    /// Launch geometry for `field` interpreted as `field_type`.
    pub fn new(field: &Field, field_type: FieldType, fod: &FirstOrderData) -> Result<Self> {
        let t0 = fod.obj_dist;
        let to_pupil = t0 + fod.enp_dist;
        let launch = match field_type {
            FieldType::ObjectAngle => {
                let slope = Vec2::new(field.x.to_radians().tan(), field.y.to_radians().tan());
                if fod.object_at_infinity {
                    Self::Direction(Vec3::new(slope.x, slope.y, 1.0).normalize())
                } else {
                    Self::Point(Point3::new(-slope.x * to_pupil, -slope.y * to_pupil, -t0))
                }
            }
            FieldType::ObjectHeight => {
                if fod.object_at_infinity {
                    return Err(ParaxialError::UnsupportedField(field_type).into());
                }
                Self::Point(Point3::new(field.x, field.y, -t0))
            }
            FieldType::ImageHeight => {
                // paraxial chief ray scales linearly with image height
                let ratio = if fod.img_ht != 0.0 { 1.0 / fod.img_ht } else { 0.0 };
                let (fx, fy) = (field.x * ratio, field.y * ratio);
                if fod.object_at_infinity {
                    let u = fod.chief_start.u;
                    Self::Direction(Vec3::new(fx * u, fy * u, 1.0).normalize())
                } else {
                    let h = fod.chief_start.y;
                    Self::Point(Point3::new(fx * h, fy * h, -t0))
                }
            }
        };
        Ok(launch)
    }

    /// Start point and direction of the ray through `aim` on the entrance
    /// pupil plane at `enp_dist`.
    pub fn ray_through(&self, enp_dist: f64, aim: Vec2) -> (Point3, Vec3) {
        let target = Point3::new(aim.x, aim.y, enp_dist);
        match *self {
            Self::Point(p) => (p, (target - p).normalize()),
            Self::Direction(d) => (target - (enp_dist / d.z) * d, d),
        }
    }
}

/// Real-ray tracer bound to one model state.
///
/// Holds shared borrows only, so several tracers may run at once on the
/// same model.
#[derive(Debug, Clone, Copy)]
pub struct SequentialTracer<'a> {
    assembly: &'a OpticalAssembly,
    spec: &'a OpticalSpec,
    fod: &'a FirstOrderData,
    options: TraceOptions,
}

impl<'a> SequentialTracer<'a> {
    /// Tracer over `assembly` with `spec` and its first-order data.
    pub fn new(
        assembly: &'a OpticalAssembly,
        spec: &'a OpticalSpec,
        fod: &'a FirstOrderData,
        options: TraceOptions,
    ) -> Self {
        Self {
            assembly,
            spec,
            fod,
            options,
        }
    }

    /// Options in effect.
    pub fn options(&self) -> TraceOptions {
        self.options
    }

    /// Same tracer with different options.
    pub fn with_options(mut self, options: TraceOptions) -> Self {
        self.options = options;
        self
    }

    /// The assembly being traced.
    pub fn assembly(&self) -> &'a OpticalAssembly {
        self.assembly
    }

    /// The specification in use.
    pub fn spec(&self) -> &'a OpticalSpec {
        self.spec
    }

    /// First-order data used for launching.
    pub fn first_order(&self) -> &'a FirstOrderData {
        self.fod
    }

    /// Sequential path at `wvl_nm`.
    pub fn path(&self, wvl_nm: f64) -> SequentialPath<'a> {
        SequentialPath::new(self.assembly, wvl_nm)
    }

    /// Radius that pupil coordinates are scaled to on the stop surface.
    pub fn stop_radius(&self) -> f64 {
        self.assembly
            .stop()
            .clear_aperture
            .max_dimension()
            .unwrap_or(self.fod.stop_radius)
    }

    /// Launch geometry for `field`.
    pub fn launch(&self, field: &Field) -> Result<FieldLaunch> {
        FieldLaunch::new(field, self.spec.field_spec.field_type, self.fod)
    }

    /// Trace the ray through entrance-pupil point `aim` to the image.
    pub fn trace_aimed(&self, path: &SequentialPath<'_>, launch: &FieldLaunch, aim: Vec2, pupil: Vec2) -> Ray {
        let (start, dir) = launch.ray_through(self.fod.enp_dist, aim);
        let (segments, status) = propagate(path, start, dir, usize::MAX, self.options.aperture_check);
        Ray {
            segments,
            status,
            pupil,
            wvl: path.wvl(),
        }
    }

    /// Where the ray through `aim` crosses the stop surface, in its local
    /// frame. Apertures are ignored.
    pub fn stop_intercept(&self, path: &SequentialPath<'_>, launch: &FieldLaunch, aim: Vec2) -> Option<Vec2> {
        let stop = self.assembly.stop_index();
        let (start, dir) = launch.ray_through(self.fod.enp_dist, aim);
        let (segments, status) = propagate(path, start, dir, stop, false);
        if !status.is_pass_through() {
            return None;
        }
        let hit = segments.get(stop)?.point;
        Some(Vec2::new(hit.x, hit.y))
    }

    /// Solve for the entrance-pupil point whose real ray passes through
    /// the stop center. Does not consult or update the field's cache.
    pub fn aim_chief_ray(&self, field: &Field, wvl_nm: f64) -> Result<Option<Vec2>> {
        let launch = self.launch(field)?;
        let path = self.path(wvl_nm);
        Ok(aim_ray(self, &path, &launch, Vec2::zeros(), Vec2::zeros()))
    }

    /// Trace `field` at `wvl_nm` through relative pupil coordinate `pupil`.
    ///
    /// Physical failures are reported on the returned ray's status; only
    /// an unsupported field type for the conjugate is an error.
    pub fn trace_field_ray(&self, field: &Field, wvl_nm: f64, pupil: Vec2) -> Result<Ray> {
        let launch = self.launch(field)?;
        let path = self.path(wvl_nm);
        Ok(self.trace_launched(&path, &launch, field, pupil))
    }

    pub(crate) fn trace_launched(
        &self,
        path: &SequentialPath<'_>,
        launch: &FieldLaunch,
        field: &Field,
        pupil: Vec2,
    ) -> Ray {
        let rel = if self.options.apply_vignetting {
            field.apply_vignetting(pupil)
        } else {
            pupil
        };

        match self.options.aim {
            AimMode::Paraxial => {
                let base = field.aim_point().unwrap_or_else(Vec2::zeros);
                self.trace_aimed(path, launch, base + self.fod.enp_radius * rel, pupil)
            }
            AimMode::Real => {
                let chief = match field.aim_point() {
                    Some(pt) => Some(pt),
                    None => aim_ray(self, path, launch, Vec2::zeros(), Vec2::zeros()),
                };
                let base = chief.unwrap_or_else(Vec2::zeros);
                let guess = base + self.fod.enp_radius * rel;
                let aimed = if rel == Vec2::zeros() {
                    chief
                } else {
                    aim_ray(self, path, launch, self.stop_radius() * rel, guess)
                };
                match aimed {
                    Some(aim) => self.trace_aimed(path, launch, aim, pupil),
                    None => {
                        warn!(?pupil, wvl = path.wvl(), "ray aiming failed; tracing from paraxial guess");
                        let mut ray = self.trace_aimed(path, launch, guess, pupil);
                        ray.status = RayStatus::RayAimingFailed;
                        ray
                    }
                }
            }
        }
    }

    /// Trace field `field_index` at wavelength `wvl_index` through relative
    /// pupil coordinate `pupil`.
    pub fn trace_pupil_ray(&self, field_index: usize, wvl_index: usize, pupil: Vec2) -> Result<Ray> {
        let field = self.spec.field_spec.field(field_index)?;
        let wvl = self.spec.wvl_spec.value(wvl_index)?;
        self.trace_field_ray(field, wvl, pupil)
    }
}
