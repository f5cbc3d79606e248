//! Batches of pupil rays: reference rays, fans and spot grids.

use optrace_math::Vec2;

use crate::error::Result;
use crate::ray::Ray;
use crate::trace::SequentialTracer;

/// Chief ray followed by the upper, lower, right and left marginal rays.
pub const REFERENCE_PUPILS: [[f64; 2]; 5] = [[0.0, 0.0], [0.0, 1.0], [0.0, -1.0], [1.0, 0.0], [-1.0, 0.0]];

/// Evenly spaced points from -1 to 1 along the pupil diameter at
/// `azimuth_deg` (0 = x axis, 90 = y axis).
pub fn fan_pupils(azimuth_deg: f64, samples: usize) -> Vec<Vec2> {
    let (sin, cos) = azimuth_deg.to_radians().sin_cos();
    let axis = Vec2::new(cos, sin);
    match samples {
        0 => Vec::new(),
        1 => vec![Vec2::zeros()],
        n => (0..n)
            .map(|i| (2.0 * i as f64 / (n - 1) as f64 - 1.0) * axis)
            .collect(),
    }
}

/// Points of an `n × n` square grid over the pupil that fall inside the
/// unit circle.
pub fn grid_pupils(n: usize) -> Vec<Vec2> {
    if n < 2 {
        return vec![Vec2::zeros(); n];
    }
    let step = 2.0 / (n - 1) as f64;
    let mut points = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let p = Vec2::new(-1.0 + i as f64 * step, -1.0 + j as f64 * step);
            if p.norm_squared() <= 1.0 + 1e-12 {
                points.push(p);
            }
        }
    }
    points
}

impl SequentialTracer<'_> {
    fn trace_batch(&self, field_index: usize, wvl_index: usize, pupils: &[Vec2]) -> Result<Vec<Ray>> {
        let field = self.spec().field_spec.field(field_index)?;
        let wvl = self.spec().wvl_spec.value(wvl_index)?;
        let launch = self.launch(field)?;
        let path = self.path(wvl);
        Ok(pupils
            .iter()
            .map(|&pupil| self.trace_launched(&path, &launch, field, pupil))
            .collect())
    }

    /// The five reference rays in [`REFERENCE_PUPILS`] order.
    pub fn reference_rays(&self, field_index: usize, wvl_index: usize) -> Result<Vec<Ray>> {
        let pupils: Vec<Vec2> = REFERENCE_PUPILS.iter().map(|&[x, y]| Vec2::new(x, y)).collect();
        self.trace_batch(field_index, wvl_index, &pupils)
    }

    /// A fan of `samples` rays across the pupil at `azimuth_deg`.
    ///
    /// Failed rays stay in the batch with their status set.
    pub fn trace_fan(&self, field_index: usize, wvl_index: usize, azimuth_deg: f64, samples: usize) -> Result<Vec<Ray>> {
        self.trace_batch(field_index, wvl_index, &fan_pupils(azimuth_deg, samples))
    }

    /// Rays on a square pupil grid clipped to the unit circle, for spot
    /// diagrams.
    pub fn trace_grid(&self, field_index: usize, wvl_index: usize, n: usize) -> Result<Vec<Ray>> {
        self.trace_batch(field_index, wvl_index, &grid_pupils(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray::RayStatus;
    use crate::trace::TraceOptions;
    use approx::assert_relative_eq;
    use optrace_assembly::{Gap, OpticalAssembly, Surface};
    use optrace_geom::{Aperture, SurfaceProfile};
    use optrace_material::Material;
    use optrace_paraxial::compute_first_order;
    use optrace_spec::{Field, FieldSpec, FieldType, OpticalSpec, PupilSpec, PupilType, WvlSpec};
    use std::sync::Arc;

    #[test]
    fn test_fan_pupils() {
        let fan = fan_pupils(90.0, 5);
        assert_eq!(fan.len(), 5);
        assert_relative_eq!(fan[0].y, -1.0, epsilon = 1e-15);
        assert_relative_eq!(fan[2].y, 0.0, epsilon = 1e-15);
        assert_relative_eq!(fan[4].y, 1.0, epsilon = 1e-15);
        assert!(fan.iter().all(|p| p.x.abs() < 1e-15));
        assert_eq!(fan_pupils(0.0, 1), vec![Vec2::zeros()]);
        assert!(fan_pupils(0.0, 0).is_empty());
    }

    #[test]
    fn test_grid_pupils_inside_unit_circle() {
        let grid = grid_pupils(5);
        // 25 points, corners and their neighbours outside
        assert_eq!(grid.len(), 13);
        assert!(grid.iter().all(|p| p.norm() <= 1.0 + 1e-12));
        assert!(grid.contains(&Vec2::zeros()));
    }

    #[test]
    fn test_batches() {
        let air = Arc::new(Material::vacuum());
        let glass = Arc::new(Material::constant("1.5", 1.5));
        let asm = OpticalAssembly::from_parts(
            vec![
                Surface::new("Obj"),
                Surface::new("S1")
                    .with_profile(SurfaceProfile::spherical(0.01))
                    .with_clear_aperture(Aperture::circular(10.0)),
                Surface::new("Img"),
            ],
            vec![Gap::new(f64::INFINITY, air), Gap::new(300.0, glass)],
            1,
        )
        .unwrap();
        let spec = OpticalSpec::new(
            PupilSpec::new(PupilType::EntrancePupilDiameter, 20.0),
            FieldSpec::new(FieldType::ObjectAngle, vec![Field::new(0.0, 0.0)]),
            WvlSpec::default(),
        );
        let fod = compute_first_order(&asm, &spec).unwrap();
        let tracer = SequentialTracer::new(&asm, &spec, &fod, TraceOptions::default());

        let refs = tracer.reference_rays(0, 0).unwrap();
        assert_eq!(refs.len(), 5);
        assert!(refs.iter().all(|r| r.status.is_pass_through()));

        let fan = tracer.trace_fan(0, 0, 90.0, 3).unwrap();
        assert_eq!(fan.len(), 3);
        assert_relative_eq!(fan[2].at(1).unwrap().point.y, 10.0, epsilon = 1e-9);

        let spots = tracer.trace_grid(0, 0, 7).unwrap();
        assert_eq!(spots.len(), grid_pupils(7).len());
        assert!(tracer.trace_fan(3, 0, 0.0, 3).is_err());
    }

    #[test]
    fn test_fan_keeps_blocked_rays() {
        let air = Arc::new(Material::vacuum());
        // 20 mm beam through a bare stop onto a 7 mm window
        let asm = OpticalAssembly::from_parts(
            vec![
                Surface::new("Obj"),
                Surface::new("Stop"),
                Surface::new("Window").with_clear_aperture(Aperture::circular(7.0)),
                Surface::new("Img"),
            ],
            vec![
                Gap::new(f64::INFINITY, Arc::clone(&air)),
                Gap::new(10.0, Arc::clone(&air)),
                Gap::new(10.0, air),
            ],
            1,
        )
        .unwrap();
        let spec = OpticalSpec::new(
            PupilSpec::new(PupilType::EntrancePupilDiameter, 20.0),
            FieldSpec::new(FieldType::ObjectAngle, vec![Field::new(0.0, 0.0)]),
            WvlSpec::default(),
        );
        let fod = compute_first_order(&asm, &spec).unwrap();
        let tracer = SequentialTracer::new(&asm, &spec, &fod, TraceOptions::default());

        // heights -10, -8, ..., 10; only |y| <= 6 clear the window
        let fan = tracer.trace_fan(0, 0, 90.0, 11).unwrap();
        assert_eq!(fan.len(), 11);
        for (i, ray) in fan.iter().enumerate() {
            if (2..=8).contains(&i) {
                assert!(ray.status.is_pass_through(), "ray {i}: {:?}", ray.status);
                assert_eq!(ray.segments.len(), 4);
            } else {
                assert_eq!(ray.status, RayStatus::Blocked { surface: 2 });
                assert_eq!(ray.segments.len(), 3);
                assert!(ray.image_point().is_none());
            }
        }
        assert_relative_eq!(fan[8].last().unwrap().point.y, 6.0, epsilon = 1e-9);
    }
}
