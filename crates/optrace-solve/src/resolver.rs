//! Checking and applying thickness solves.

use optrace_assembly::{OpticalAssembly, Solve};
use optrace_paraxial::{FirstOrderData, ParaxialRay, ParaxialStart};
use tracing::debug;

use crate::error::{Result, SolveError};

/// Paraxial inputs shared by the solves that trace a marginal ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveContext {
    /// Wavelength for paraxial traces, in nanometers.
    pub wvl_nm: f64,
    /// Full-aperture marginal ray start.
    pub marginal_start: ParaxialStart,
}

impl SolveContext {
    /// Context with an explicit wavelength and marginal ray.
    pub fn new(wvl_nm: f64, marginal_start: ParaxialStart) -> Self {
        Self {
            wvl_nm,
            marginal_start,
        }
    }

    /// Context taken from first-order data.
    pub fn from_first_order(fod: &FirstOrderData) -> Self {
        Self::new(fod.reference_wvl, fod.marginal_start)
    }
}

fn invalid(gap: usize, solve: &Solve, reason: &'static str) -> SolveError {
    SolveError::InvalidSolve {
        gap,
        solve: solve.name(),
        reason,
    }
}

/// Check that `solve` can be applied to gap `gap` of `assembly`.
pub fn check_solve(solve: &Solve, assembly: &OpticalAssembly, gap: usize) -> Result<()> {
    assembly.gap(gap)?;
    let image = assembly.image_index();
    match *solve {
        Solve::Fixed => {}
        Solve::EdgeThickness { height, .. } => {
            if gap == 0 {
                return Err(invalid(gap, solve, "object gap has no edge"));
            }
            if !(height.is_finite() && height > 0.0) {
                return Err(invalid(gap, solve, "height must be positive"));
            }
            let sag1 = assembly.surface(gap)?.profile.sag(0.0, height);
            let sag2 = assembly.surface(gap + 1)?.profile.sag(0.0, height);
            if !(sag1.is_finite() && sag2.is_finite()) {
                return Err(invalid(gap, solve, "height lies outside a surface"));
            }
        }
        Solve::OverallLength { from, to, .. } => {
            if from >= to || to > image {
                return Err(invalid(gap, solve, "span must satisfy from < to <= image"));
            }
            if gap < from || gap >= to {
                return Err(invalid(gap, solve, "gap lies outside the span"));
            }
        }
        Solve::ParaxialImageDistance => {
            if gap == 0 {
                return Err(invalid(gap, solve, "object gap cannot be solved"));
            }
        }
        Solve::MarginalHeight { zone, .. } => {
            if gap == 0 {
                return Err(invalid(gap, solve, "object gap cannot be solved"));
            }
            if !zone.is_finite() || zone == 0.0 {
                return Err(invalid(gap, solve, "zone must be finite and non-zero"));
            }
        }
        Solve::Pickup { from_gap, .. } => {
            assembly.gap(from_gap)?;
            if from_gap == gap {
                return Err(invalid(gap, solve, "gap cannot pick up itself"));
            }
        }
    }
    Ok(())
}

/// Thickness `solve` would give gap `gap`, or `None` for [`Solve::Fixed`].
pub fn solve_thickness(
    solve: &Solve,
    assembly: &OpticalAssembly,
    gap: usize,
    ctx: &SolveContext,
) -> Result<Option<f64>> {
    check_solve(solve, assembly, gap)?;
    let current = assembly.gap(gap)?.thickness;
    let thickness = match *solve {
        Solve::Fixed => return Ok(None),
        Solve::EdgeThickness { height, value } => {
            let sag1 = assembly.surface(gap)?.profile.sag(0.0, height);
            let sag2 = assembly.surface(gap + 1)?.profile.sag(0.0, height);
            value - (sag2 - sag1)
        }
        Solve::OverallLength { from, to, value } => current + value - assembly.overall_length(from, to)?,
        Solve::ParaxialImageDistance => {
            let ray = ParaxialRay::trace(assembly, ctx.wvl_nm, ctx.marginal_start);
            -ray.y(gap) / ray.u_prime(gap)
        }
        Solve::MarginalHeight { height, zone } => {
            let ray = ParaxialRay::trace(assembly, ctx.wvl_nm, ctx.marginal_start.scaled(zone));
            (height - ray.y(gap)) / ray.u_prime(gap)
        }
        Solve::Pickup {
            from_gap,
            scale,
            offset,
        } => scale * assembly.gap(from_gap)?.thickness + offset,
    };
    if !thickness.is_finite() {
        return Err(SolveError::NotFinite {
            gap,
            solve: solve.name(),
        });
    }
    Ok(Some(thickness))
}

/// Apply `solve` to gap `gap`, returning the new thickness.
///
/// Transforms are not refreshed; call
/// [`OpticalAssembly::update_transforms`] once all edits are done.
pub fn apply_solve(solve: &Solve, assembly: &mut OpticalAssembly, gap: usize, ctx: &SolveContext) -> Result<f64> {
    match solve_thickness(solve, assembly, gap, ctx)? {
        Some(thickness) => {
            debug!(gap, solve = solve.name(), thickness, "applied solve");
            assembly.gap_mut(gap)?.thickness = thickness;
            Ok(thickness)
        }
        None => Ok(assembly.gap(gap)?.thickness),
    }
}

/// Apply every gap's solve once, in gap order, then refresh transforms.
///
/// A solve sees the thicknesses left by the solves before it; interacting
/// solves are not iterated to a fixed point. Returns how many thicknesses
/// were set.
pub fn apply_solves(assembly: &mut OpticalAssembly, ctx: &SolveContext) -> Result<usize> {
    let mut applied = 0;
    for gap in 0..assembly.gap_count() {
        let Some(solve) = assembly.gap(gap)?.solve else {
            continue;
        };
        if solve != Solve::Fixed {
            apply_solve(&solve, assembly, gap, ctx)?;
            applied += 1;
        }
    }
    assembly.update_transforms();
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use optrace_assembly::{Gap, Surface};
    use optrace_geom::SurfaceProfile;
    use optrace_material::Material;
    use std::sync::Arc;

    const WVL: f64 = 587.5618;

    fn lens() -> OpticalAssembly {
        let air = Arc::new(Material::vacuum());
        let glass = Arc::new(Material::constant("1.5", 1.5));
        OpticalAssembly::from_parts(
            vec![
                Surface::new("Obj"),
                Surface::new("S1").with_profile(SurfaceProfile::from_radius(50.0)),
                Surface::new("S2").with_profile(SurfaceProfile::from_radius(-80.0)),
                Surface::new("Img"),
            ],
            vec![
                Gap::new(f64::INFINITY, Arc::clone(&air)),
                Gap::new(5.0, glass),
                Gap::new(60.0, air),
            ],
            1,
        )
        .unwrap()
    }

    fn ctx() -> SolveContext {
        SolveContext::new(WVL, ParaxialStart::new(10.0, 0.0))
    }

    #[test]
    fn test_edge_thickness_round_trip() {
        let mut asm = lens();
        let solve = Solve::EdgeThickness {
            height: 12.0,
            value: 2.0,
        };
        let t = apply_solve(&solve, &mut asm, 1, &ctx()).unwrap();
        let sag1 = asm.surface(1).unwrap().profile.sag(0.0, 12.0);
        let sag2 = asm.surface(2).unwrap().profile.sag(0.0, 12.0);
        assert_relative_eq!(t + sag2 - sag1, 2.0, epsilon = 1e-9);
        assert_eq!(asm.gap(1).unwrap().thickness, t);
    }

    #[test]
    fn test_edge_thickness_rejects_bad_height() {
        let asm = lens();
        let too_high = Solve::EdgeThickness {
            height: 60.0,
            value: 2.0,
        };
        assert!(matches!(
            check_solve(&too_high, &asm, 1),
            Err(SolveError::InvalidSolve { gap: 1, .. })
        ));
        let negative = Solve::EdgeThickness {
            height: -1.0,
            value: 2.0,
        };
        assert!(check_solve(&negative, &asm, 1).is_err());
    }

    #[test]
    fn test_paraxial_image_distance_focuses() {
        let mut asm = lens();
        let t = apply_solve(&Solve::ParaxialImageDistance, &mut asm, 2, &ctx()).unwrap();
        assert!(t > 0.0);
        let ray = ParaxialRay::trace(&asm, WVL, ctx().marginal_start);
        assert_relative_eq!(ray.y(3), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_marginal_height() {
        let mut asm = lens();
        let solve = Solve::MarginalHeight { height: 2.0, zone: 0.5 };
        apply_solve(&solve, &mut asm, 2, &ctx()).unwrap();
        let ray = ParaxialRay::trace(&asm, WVL, ctx().marginal_start.scaled(0.5));
        assert_relative_eq!(ray.y(3), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_overall_length_and_pickup() {
        let mut asm = lens();
        let length = Solve::OverallLength {
            from: 1,
            to: 3,
            value: 100.0,
        };
        apply_solve(&length, &mut asm, 2, &ctx()).unwrap();
        assert_relative_eq!(asm.overall_length(1, 3).unwrap(), 100.0, epsilon = 1e-12);

        let pickup = Solve::Pickup {
            from_gap: 1,
            scale: 2.0,
            offset: 1.0,
        };
        assert_relative_eq!(apply_solve(&pickup, &mut asm, 2, &ctx()).unwrap(), 11.0);
        assert!(check_solve(
            &Solve::Pickup {
                from_gap: 2,
                scale: 1.0,
                offset: 0.0
            },
            &asm,
            2
        )
        .is_err());
    }

    #[test]
    fn test_fixed_leaves_thickness() {
        let mut asm = lens();
        assert_eq!(apply_solve(&Solve::Fixed, &mut asm, 2, &ctx()).unwrap(), 60.0);
    }

    #[test]
    fn test_solves_run_in_gap_order() {
        let mut asm = lens();
        // gap 1 picks up gap 2 before gap 2 is re-solved
        asm.gap_mut(1).unwrap().solve = Some(Solve::Pickup {
            from_gap: 2,
            scale: 0.1,
            offset: 0.0,
        });
        asm.gap_mut(2).unwrap().solve = Some(Solve::OverallLength {
            from: 1,
            to: 3,
            value: 80.0,
        });
        assert_eq!(apply_solves(&mut asm, &ctx()).unwrap(), 2);
        assert_relative_eq!(asm.gap(1).unwrap().thickness, 6.0, epsilon = 1e-12);
        assert_relative_eq!(asm.gap(2).unwrap().thickness, 74.0, epsilon = 1e-12);
        let v3 = asm.surface(3).unwrap().global_transform().translation.z;
        assert_relative_eq!(v3, 80.0, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_range_gap() {
        let asm = lens();
        assert!(matches!(
            check_solve(&Solve::Fixed, &asm, 9),
            Err(SolveError::Assembly(_))
        ));
    }
}
