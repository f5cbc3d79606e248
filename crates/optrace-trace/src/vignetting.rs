//! Vignetting factors from the four marginal reference rays.

use optrace_assembly::OpticalAssembly;
use optrace_math::{Convergence, Vec2};
use optrace_paraxial::FirstOrderData;
use optrace_spec::{Field, OpticalSpec};
use tracing::{debug, warn};

use crate::error::Result;
use crate::trace::{SequentialTracer, TraceOptions};

/// Pupil edges in `[vuy, vly, vux, vlx]` order.
const EDGES: [(f64, f64); 4] = [(0.0, 1.0), (0.0, -1.0), (1.0, 0.0), (-1.0, 0.0)];

/// Vignetting factors of `field` at `wvl_nm`, in `[vuy, vly, vux, vlx]`
/// order.
///
/// Each factor is one minus the largest fraction of the pupil radius along
/// that edge that still reaches the image. A system without any clear
/// aperture is never vignetted. An edge whose chief ray is already lost
/// is logged and left at zero.
pub fn field_vignetting(tracer: &SequentialTracer<'_>, field: &Field, wvl_nm: f64) -> Result<[f64; 4]> {
    let mut factors = [0.0; 4];
    if !tracer
        .assembly()
        .surfaces()
        .iter()
        .any(|s| s.clear_aperture.is_limiting())
    {
        return Ok(factors);
    }

    let tracer = tracer.with_options(TraceOptions {
        apply_vignetting: false,
        aperture_check: true,
        ..tracer.options()
    });
    let launch = tracer.launch(field)?;
    let path = tracer.path(wvl_nm);
    let passes = |pupil: Vec2| {
        tracer
            .trace_launched(&path, &launch, field, pupil)
            .status
            .is_pass_through()
    };

    let conv = Convergence::VIGNETTING;
    for (factor, &(ex, ey)) in factors.iter_mut().zip(EDGES.iter()) {
        let edge = Vec2::new(ex, ey);
        if passes(edge) {
            continue;
        }
        if !passes(Vec2::zeros()) {
            warn!(x = field.x, y = field.y, "chief ray blocked; vignetting left at zero");
            continue;
        }
        let (mut lo, mut hi) = (0.0, 1.0);
        for _ in 0..conv.max_iterations {
            if hi - lo < conv.tolerance {
                break;
            }
            let mid = 0.5 * (lo + hi);
            if passes(mid * edge) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        *factor = 1.0 - lo;
    }
    debug!(x = field.x, y = field.y, ?factors, "vignetting factors");
    Ok(factors)
}

/// Compute and store vignetting factors for every field at the reference
/// wavelength.
pub fn compute_vignetting(
    assembly: &OpticalAssembly,
    spec: &mut OpticalSpec,
    fod: &FirstOrderData,
    options: TraceOptions,
) -> Result<()> {
    let wvl = spec.wvl_spec.reference_wvl();
    let all = {
        let tracer = SequentialTracer::new(assembly, spec, fod, options);
        spec.field_spec
            .fields()
            .iter()
            .map(|field| field_vignetting(&tracer, field, wvl))
            .collect::<Result<Vec<_>>>()?
    };
    for (i, factors) in all.into_iter().enumerate() {
        spec.field_spec.field_mut(i)?.set_vignetting_factors(factors);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use optrace_assembly::{Gap, Surface};
    use optrace_geom::Aperture;
    use optrace_material::Material;
    use optrace_paraxial::compute_first_order;
    use optrace_spec::{FieldSpec, FieldType, PupilSpec, PupilType, WvlSpec};
    use std::sync::Arc;

    /// A 10 mm beam through a bare stop, then an optional window 50 mm on.
    fn window(window_radius: Option<f64>) -> (OpticalAssembly, OpticalSpec) {
        let air = Arc::new(Material::vacuum());
        let mut win = Surface::new("Window");
        if let Some(r) = window_radius {
            win = win.with_clear_aperture(Aperture::circular(r));
        }
        let asm = OpticalAssembly::from_parts(
            vec![Surface::new("Obj"), Surface::new("Stop"), win, Surface::new("Img")],
            vec![
                Gap::new(f64::INFINITY, Arc::clone(&air)),
                Gap::new(50.0, Arc::clone(&air)),
                Gap::new(10.0, air),
            ],
            1,
        )
        .unwrap();
        let spec = OpticalSpec::new(
            PupilSpec::new(PupilType::EntrancePupilDiameter, 10.0),
            FieldSpec::new(FieldType::ObjectAngle, vec![Field::new(0.0, 0.0), Field::new(0.0, 5.0)]),
            WvlSpec::default(),
        );
        (asm, spec)
    }

    #[test]
    fn test_no_apertures_means_no_vignetting() {
        let (asm, mut spec) = window(None);
        let fod = compute_first_order(&asm, &spec).unwrap();
        compute_vignetting(&asm, &mut spec, &fod, TraceOptions::default()).unwrap();
        for field in spec.field_spec.fields() {
            assert_eq!(field.vignetting_factors(), [0.0; 4]);
        }
    }

    #[test]
    fn test_window_vignettes_off_axis_field() {
        let (asm, mut spec) = window(Some(6.0));
        let fod = compute_first_order(&asm, &spec).unwrap();
        compute_vignetting(&asm, &mut spec, &fod, TraceOptions::default()).unwrap();

        assert_eq!(spec.field_spec.fields()[0].vignetting_factors(), [0.0; 4]);

        // at 5 degrees the bundle shifts up by 50·tan 5° ≈ 4.37 at the window
        let shift = 50.0 * 5f64.to_radians().tan();
        let [vuy, vly, vux, vlx] = spec.field_spec.fields()[1].vignetting_factors();
        // upper edge: 5·s + shift = 6
        assert_relative_eq!(vuy, 1.0 - (6.0 - shift) / 5.0, epsilon = 1e-4);
        assert_eq!(vly, 0.0);
        // sagittal edges: (5·s)² + shift² = 36
        let sagittal = 1.0 - (36.0 - shift * shift).sqrt() / 5.0;
        assert_relative_eq!(vux, sagittal, epsilon = 1e-4);
        assert_relative_eq!(vlx, sagittal, epsilon = 1e-4);

        // a vignetted ray at the nominal edge now lands inside the window
        let tracer = SequentialTracer::new(&asm, &spec, &fod, TraceOptions::default());
        let ray = tracer.trace_pupil_ray(1, 0, Vec2::new(0.0, 1.0)).unwrap();
        assert!(ray.status.is_pass_through());
    }
}
