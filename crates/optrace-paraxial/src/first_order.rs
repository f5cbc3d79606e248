//! First-order (Gaussian) properties of an assembly.

use crate::error::{ParaxialError, Result};
use crate::matrix::{lens_matrix, matrix_to_surface};
use crate::ray::{lagrange_invariant, ParaxialRay, ParaxialStart};
use optrace_assembly::OpticalAssembly;
use optrace_spec::{FieldType, OpticalSpec, PupilType};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// First-order data at the reference wavelength.
///
/// Distances along the axis are signed, positive toward +z. Pupil
/// positions are measured from the first optical surface (entrance) and
/// the last optical surface (exit). Afocal and degenerate systems produce
/// infinite or NaN entries rather than errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstOrderData {
    /// Wavelength the data was computed at, in nanometers.
    pub reference_wvl: f64,
    /// Effective focal length.
    pub efl: f64,
    /// Front focal distance from the first surface.
    pub ffl: f64,
    /// Back focal distance from the last surface.
    pub bfl: f64,
    /// Front principal plane relative to the first surface.
    pub pp1: f64,
    /// Rear principal plane relative to the last surface.
    pub ppk: f64,
    /// Working f-number.
    pub fno: f64,
    /// Paraxial magnification; zero for an object at infinity.
    pub red: f64,
    /// Object distance (gap 0 thickness).
    pub obj_dist: f64,
    /// Image distance (image-space gap thickness).
    pub img_dist: f64,
    /// Distance from the last surface to the paraxial image plane.
    pub paraxial_image_distance: f64,
    /// Object-space chief ray angle at full field, in degrees.
    pub obj_ang: f64,
    /// Paraxial image height at full field.
    pub img_ht: f64,
    /// Entrance pupil position.
    pub enp_dist: f64,
    /// Entrance pupil radius.
    pub enp_radius: f64,
    /// Exit pupil position.
    pub exp_dist: f64,
    /// Exit pupil radius.
    pub exp_radius: f64,
    /// Object-space numerical aperture.
    pub obj_na: f64,
    /// Image-space numerical aperture.
    pub img_na: f64,
    /// Lagrange invariant of the marginal and chief rays.
    pub opt_inv: f64,
    /// Marginal ray height at the stop.
    pub stop_radius: f64,
    /// Marginal ray starting coordinates.
    pub marginal_start: ParaxialStart,
    /// Chief ray starting coordinates at full field.
    pub chief_start: ParaxialStart,
    /// Whether the object was treated as infinitely distant.
    pub object_at_infinity: bool,
}

impl FirstOrderData {
    /// Trace the marginal and chief rays at `wvl_nm` from the stored
    /// starting data.
    pub fn reference_rays(&self, assembly: &OpticalAssembly, wvl_nm: f64) -> (ParaxialRay, ParaxialRay) {
        (
            ParaxialRay::trace(assembly, wvl_nm, self.marginal_start),
            ParaxialRay::trace(assembly, wvl_nm, self.chief_start),
        )
    }
}

/// Distance from the last optical surface to the paraxial focus at `wvl_nm`.
pub fn paraxial_image_distance(assembly: &OpticalAssembly, wvl_nm: f64) -> f64 {
    let ray = ParaxialRay::trace(assembly, wvl_nm, unit_marginal(assembly));
    let last = ray.last_optical();
    -last.y / last.u_prime
}

/// Unit marginal ray: unit height for an object at infinity, unit slope
/// from the axial object point otherwise.
fn unit_marginal(assembly: &OpticalAssembly) -> ParaxialStart {
    if assembly.is_object_at_infinity() {
        ParaxialStart::new(1.0, 0.0)
    } else {
        ParaxialStart::new(0.0, 1.0)
    }
}

/// Unit-slope chief ray through the entrance pupil center.
fn unit_chief(assembly: &OpticalAssembly, enp_dist: f64) -> ParaxialStart {
    if assembly.is_object_at_infinity() {
        ParaxialStart::new(-enp_dist, 1.0)
    } else {
        ParaxialStart::new(-(assembly.object_distance() + enp_dist), 1.0)
    }
}

/// Entrance pupil position relative to the first surface.
fn entrance_pupil_distance(assembly: &OpticalAssembly, wvl_nm: f64) -> Result<f64> {
    let stop = assembly.stop_index();
    let m = matrix_to_surface(assembly, wvl_nm, stop)?;
    let (a, b) = (m[(0, 0)], m[(0, 1)]);
    if a == 0.0 {
        return Ok(f64::INFINITY);
    }
    let n0 = assembly.gap_indices(wvl_nm)[0];
    Ok(n0 * b / a)
}

/// Compute first-order data for `assembly` under `spec` at the reference
/// wavelength.
pub fn compute_first_order(assembly: &OpticalAssembly, spec: &OpticalSpec) -> Result<FirstOrderData> {
    let wvl = spec.wvl_spec.reference_wvl();
    let indices = assembly.gap_indices(wvl);
    let n0 = indices[0];
    let nk = indices[indices.len() - 1];
    let infinite = assembly.is_object_at_infinity();
    let t0 = assembly.object_distance();
    let stop = assembly.stop_index();

    let enp_dist = entrance_pupil_distance(assembly, wvl)?;

    let ax_unit = unit_marginal(assembly);
    let ax_ray = ParaxialRay::trace(assembly, wvl, ax_unit);
    let ax_last = *ax_ray.last_optical();
    let paraxial_image_distance = -ax_last.y / ax_last.u_prime;

    let pupil = spec.pupil;
    let marginal_scale = match pupil.pupil_type {
        PupilType::EntrancePupilDiameter => {
            if infinite {
                pupil.value / 2.0
            } else {
                pupil.value / 2.0 / (t0 + enp_dist)
            }
        }
        PupilType::FNumber => {
            let target = 1.0 / (2.0 * nk.abs() * pupil.value);
            (target / ax_last.u_prime).abs()
        }
        PupilType::ImageNA => {
            let target = (pupil.value / nk.abs()).asin().tan();
            (target / ax_last.u_prime).abs()
        }
        PupilType::ObjectNA => {
            if infinite {
                return Err(ParaxialError::UnsupportedPupil(pupil.pupil_type));
            }
            (pupil.value / n0).asin().tan()
        }
    };
    let marginal_start = ax_unit.scaled(marginal_scale);
    let marginal = ParaxialRay::trace(assembly, wvl, marginal_start);

    let ch_unit = unit_chief(assembly, enp_dist);
    let max_field = spec.field_spec.max_field();
    let field_type = spec.field_spec.field_type;
    let chief_scale = match field_type {
        FieldType::ObjectAngle => max_field.to_radians().tan(),
        FieldType::ObjectHeight => {
            if infinite {
                return Err(ParaxialError::UnsupportedField(field_type));
            }
            -max_field / (t0 + enp_dist)
        }
        FieldType::ImageHeight => {
            let unit = ParaxialRay::trace(assembly, wvl, ch_unit);
            let last = unit.last_optical();
            max_field / (last.y + paraxial_image_distance * last.u_prime)
        }
    };
    let chief_start = ch_unit.scaled(chief_scale);
    let chief = ParaxialRay::trace(assembly, wvl, chief_start);

    let m = lens_matrix(assembly, wvl)?;
    let (a, c, d) = (m[(0, 0)], m[(1, 0)], m[(1, 1)]);
    let efl = -1.0 / c;
    let ffl = n0 * d / c;
    let bfl = -nk * a / c;
    let pp1 = n0 * (d - 1.0) / c;
    let ppk = nk * (1.0 - a) / c;

    let mg_last = *marginal.last_optical();
    let ch_last = *chief.last_optical();
    let fno = 1.0 / (2.0 * (nk * mg_last.u_prime).abs());
    let img_na = (nk * mg_last.u_prime.atan().sin()).abs();
    let (obj_na, red, enp_radius) = if infinite {
        (0.0, 0.0, marginal_start.y.abs())
    } else {
        let u0 = marginal_start.u;
        (
            (n0 * u0.atan().sin()).abs(),
            n0 * u0 / (nk * mg_last.u_prime),
            (u0 * (t0 + enp_dist)).abs(),
        )
    };
    let exp_dist = -ch_last.y / ch_last.u_prime;
    let exp_radius = (mg_last.y + exp_dist * mg_last.u_prime).abs();
    let img_ht = ch_last.y + paraxial_image_distance * ch_last.u_prime;
    let obj_ang = chief_start.u.atan().to_degrees();
    let opt_inv = lagrange_invariant(&marginal, &chief, 1);
    let stop_radius = marginal.y(stop).abs();

    debug!(efl, bfl, fno, enp_dist, enp_radius, exp_dist, "first-order data");

    Ok(FirstOrderData {
        reference_wvl: wvl,
        efl,
        ffl,
        bfl,
        pp1,
        ppk,
        fno,
        red,
        obj_dist: t0,
        img_dist: assembly.image_space_gap().thickness,
        paraxial_image_distance,
        obj_ang,
        img_ht,
        enp_dist,
        enp_radius,
        exp_dist,
        exp_radius,
        obj_na,
        img_na,
        opt_inv,
        stop_radius,
        marginal_start,
        chief_start,
        object_at_infinity: infinite,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use optrace_assembly::{Gap, Surface};
    use optrace_geom::SurfaceProfile;
    use optrace_material::Material;
    use optrace_spec::{Field, FieldSpec, PupilSpec, WvlSpec};
    use std::sync::Arc;

    /// Biconvex singlet, stop on the first surface.
    fn singlet(object_distance: f64) -> OpticalAssembly {
        let air = Arc::new(Material::vacuum());
        let glass = Arc::new(Material::constant("1.5", 1.5));
        OpticalAssembly::from_parts(
            vec![
                Surface::new("Obj"),
                Surface::new("S1").with_profile(SurfaceProfile::from_radius(50.0)),
                Surface::new("S2").with_profile(SurfaceProfile::from_radius(-50.0)),
                Surface::new("Img"),
            ],
            vec![
                Gap::new(object_distance, Arc::clone(&air)),
                Gap::new(5.0, glass),
                Gap::new(47.0, air),
            ],
            1,
        )
        .unwrap()
    }

    fn spec(pupil: PupilSpec, field_type: FieldType, max_field: f64) -> OpticalSpec {
        OpticalSpec::new(
            pupil,
            FieldSpec::new(field_type, vec![Field::new(0.0, 0.0), Field::new(0.0, max_field)]),
            WvlSpec::default(),
        )
    }

    #[test]
    fn test_singlet_at_infinity() {
        let asm = singlet(f64::INFINITY);
        let spec = spec(
            PupilSpec::new(PupilType::EntrancePupilDiameter, 10.0),
            FieldType::ObjectAngle,
            5.0,
        );
        let fod = compute_first_order(&asm, &spec).unwrap();
        // 1/f = 0.5·(2/50) − 0.25·5/1.5/2500
        let power = 0.02 - 0.25 * 5.0 / 1.5 / 2500.0;
        assert_relative_eq!(fod.efl, 1.0 / power, epsilon = 1e-9);
        assert!(fod.object_at_infinity);
        assert_relative_eq!(fod.enp_dist, 0.0);
        assert_relative_eq!(fod.enp_radius, 5.0);
        assert_relative_eq!(fod.stop_radius, 5.0);
        assert_relative_eq!(fod.fno, fod.efl / 10.0, epsilon = 1e-9);
        assert_relative_eq!(fod.obj_ang, 5.0, epsilon = 1e-12);
        // a chief ray rising through the pupil lands above the axis
        assert_relative_eq!(fod.img_ht, fod.efl * 5f64.to_radians().tan(), epsilon = 1e-9);
        assert_relative_eq!(fod.bfl, fod.paraxial_image_distance, epsilon = 1e-9);
        assert_relative_eq!(fod.red, 0.0);
        assert_relative_eq!(fod.obj_na, 0.0);
    }

    #[test]
    fn test_principal_planes_are_consistent() {
        let asm = singlet(f64::INFINITY);
        let fod = compute_first_order(&asm, &OpticalSpec::default()).unwrap();
        // rear focal point = rear principal plane + efl in air
        assert_relative_eq!(fod.ppk + fod.efl, fod.bfl, epsilon = 1e-9);
        assert_relative_eq!(fod.pp1 - fod.efl, fod.ffl, epsilon = 1e-9);
    }

    #[test]
    fn test_fnumber_pupil() {
        let asm = singlet(f64::INFINITY);
        let spec = spec(PupilSpec::new(PupilType::FNumber, 4.0), FieldType::ObjectAngle, 1.0);
        let fod = compute_first_order(&asm, &spec).unwrap();
        assert_relative_eq!(fod.fno, 4.0, epsilon = 1e-12);
        assert_relative_eq!(fod.enp_radius, fod.efl / 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_finite_conjugates() {
        let asm = singlet(200.0);
        let spec = spec(PupilSpec::new(PupilType::ObjectNA, 0.05), FieldType::ObjectHeight, 10.0);
        let fod = compute_first_order(&asm, &spec).unwrap();
        assert!(!fod.object_at_infinity);
        assert_relative_eq!(fod.obj_na, 0.05, epsilon = 1e-12);
        assert_relative_eq!(fod.chief_start.y, 10.0, epsilon = 1e-12);
        // magnification agrees with image height over object height
        assert_relative_eq!(fod.red, fod.img_ht / 10.0, epsilon = 1e-9);
        assert!(fod.red < 0.0);
        // Lagrange invariant at the object: n·u0·h
        assert_relative_eq!(fod.opt_inv.abs(), fod.marginal_start.u * 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_image_height_field() {
        let asm = singlet(f64::INFINITY);
        let spec = spec(
            PupilSpec::new(PupilType::EntrancePupilDiameter, 10.0),
            FieldType::ImageHeight,
            3.0,
        );
        let fod = compute_first_order(&asm, &spec).unwrap();
        assert_relative_eq!(fod.img_ht, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unsupported_conjugates() {
        let asm = singlet(f64::INFINITY);
        let na = spec(PupilSpec::new(PupilType::ObjectNA, 0.1), FieldType::ObjectAngle, 1.0);
        assert_eq!(
            compute_first_order(&asm, &na),
            Err(ParaxialError::UnsupportedPupil(PupilType::ObjectNA))
        );
        let height = spec(
            PupilSpec::new(PupilType::EntrancePupilDiameter, 10.0),
            FieldType::ObjectHeight,
            1.0,
        );
        assert_eq!(
            compute_first_order(&asm, &height),
            Err(ParaxialError::UnsupportedField(FieldType::ObjectHeight))
        );
    }

    #[test]
    fn test_rear_stop_pupils() {
        let air = Arc::new(Material::vacuum());
        let glass = Arc::new(Material::constant("1.5", 1.5));
        let asm = OpticalAssembly::from_parts(
            vec![
                Surface::new("Obj"),
                Surface::new("S1").with_profile(SurfaceProfile::from_radius(50.0)),
                Surface::new("S2").with_profile(SurfaceProfile::from_radius(-50.0)),
                Surface::new("Stop"),
                Surface::new("Img"),
            ],
            vec![
                Gap::new(f64::INFINITY, Arc::clone(&air)),
                Gap::new(5.0, glass),
                Gap::new(10.0, Arc::clone(&air)),
                Gap::new(37.0, air),
            ],
            3,
        )
        .unwrap();
        let spec = spec(
            PupilSpec::new(PupilType::EntrancePupilDiameter, 10.0),
            FieldType::ObjectAngle,
            5.0,
        );
        let fod = compute_first_order(&asm, &spec).unwrap();
        // stop sits behind the lens: its image through the lens is virtual
        assert!(fod.enp_dist > 0.0);
        // last optical surface is the stop, so it is its own exit pupil
        assert_relative_eq!(fod.exp_dist, 0.0, epsilon = 1e-9);
        assert_relative_eq!(fod.exp_radius, fod.stop_radius, epsilon = 1e-9);
        let (marginal, chief) = fod.reference_rays(&asm, fod.reference_wvl);
        assert_relative_eq!(chief.y(3), 0.0, epsilon = 1e-9);
        assert_relative_eq!(marginal.y(1), 5.0, epsilon = 1e-12);
    }
}
