//! Ray aiming: finding the entrance-pupil point whose real ray meets the
//! stop where requested.

use nalgebra::Matrix2;
use optrace_assembly::OpticalAssembly;
use optrace_math::{Convergence, Vec2};
use optrace_paraxial::FirstOrderData;
use optrace_spec::OpticalSpec;
use tracing::{debug, warn};

use crate::error::Result;
use crate::path::SequentialPath;
use crate::trace::{FieldLaunch, SequentialTracer, TraceOptions};

/// Smallest damping factor tried before a Newton step is abandoned.
const MIN_DAMPING: f64 = 1.0 / 1024.0;

/// Damped 2-D Newton search for the entrance-pupil point whose ray hits
/// `target` on the stop, starting from `guess`.
///
/// The Jacobian is estimated by forward differences. Returns `None` when
/// the ray cannot reach the stop, the Jacobian is singular, or the
/// iteration cap is reached.
pub(crate) fn aim_ray(
    tracer: &SequentialTracer<'_>,
    path: &SequentialPath<'_>,
    launch: &FieldLaunch,
    target: Vec2,
    guess: Vec2,
) -> Option<Vec2> {
    let conv = Convergence::RAY_AIMING;
    let residual = |aim: Vec2| tracer.stop_intercept(path, launch, aim).map(|hit| hit - target);
    let h = 1e-6 * tracer.first_order().enp_radius.max(1.0);

    let mut aim = guess;
    let mut err = residual(aim)?;
    for iter in 0..conv.max_iterations {
        if err.norm() < conv.tolerance {
            debug!(iter, x = aim.x, y = aim.y, "ray aimed");
            return Some(aim);
        }
        let ex = residual(aim + Vec2::new(h, 0.0))?;
        let ey = residual(aim + Vec2::new(0.0, h))?;
        let jacobian = Matrix2::from_columns(&[(ex - err) / h, (ey - err) / h]);
        let step = jacobian.try_inverse()? * err;

        let mut damping = 1.0;
        loop {
            let candidate = aim - damping * step;
            match residual(candidate) {
                Some(e) if e.norm() < err.norm() => {
                    aim = candidate;
                    err = e;
                    break;
                }
                _ if damping <= MIN_DAMPING => return None,
                _ => damping *= 0.5,
            }
        }
    }
    (err.norm() < conv.tolerance).then_some(aim)
}

/// Solve and cache the chief-ray aim point of every field at the reference
/// wavelength.
///
/// A field whose chief ray cannot be aimed keeps no aim point; tracing
/// then retries the search on demand.
pub fn aim_chief_rays(
    assembly: &OpticalAssembly,
    spec: &mut OpticalSpec,
    fod: &FirstOrderData,
    options: TraceOptions,
) -> Result<()> {
    let wvl = spec.wvl_spec.reference_wvl();
    let aims = {
        let tracer = SequentialTracer::new(assembly, spec, fod, options);
        spec.field_spec
            .fields()
            .iter()
            .map(|field| tracer.aim_chief_ray(field, wvl))
            .collect::<Result<Vec<_>>>()?
    };
    for (i, aim) in aims.into_iter().enumerate() {
        if aim.is_none() {
            warn!(field = i, "chief ray aiming failed");
        }
        spec.field_spec.field_mut(i)?.set_aim_point(aim);
    }
    Ok(())
}
