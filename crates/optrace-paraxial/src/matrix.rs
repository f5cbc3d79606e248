//! Gaussian ABCD matrices in reduced-angle form.
//!
//! A ray is the column `(y, n·u)`. Refraction at surface `k` is
//! `[[1, 0], [−φ, 1]]`, transfer across gap `k` is `[[1, t/n], [0, 1]]`.

use nalgebra::Matrix2;
use optrace_assembly::OpticalAssembly;

use crate::error::Result;

/// Refraction by a surface of the given power.
fn refraction(power: f64) -> Matrix2<f64> {
    Matrix2::new(1.0, 0.0, -power, 1.0)
}

fn transfer(thickness: f64, n: f64) -> Matrix2<f64> {
    Matrix2::new(1.0, thickness / n, 0.0, 1.0)
}

/// Matrix from just before surface `from` to just after surface `to`.
///
/// Both indices must be optical surfaces or the image; `from > to` gives
/// the identity.
pub fn system_matrix(
    assembly: &OpticalAssembly,
    wvl_nm: f64,
    from: usize,
    to: usize,
) -> Result<Matrix2<f64>> {
    assembly.surface(from)?;
    assembly.surface(to)?;
    let indices = assembly.gap_indices(wvl_nm);
    let gaps = assembly.gaps();
    let surfaces = assembly.surfaces();
    let image = assembly.image_index();

    let mut m = Matrix2::identity();
    for k in from..=to {
        if k > from {
            m = transfer(gaps[k - 1].thickness, indices[k - 1]) * m;
        }
        if k > 0 && k < image {
            let power = (indices[k] - indices[k - 1]) * surfaces[k].cv();
            m = refraction(power) * m;
        }
    }
    Ok(m)
}

/// Matrix from just before the first optical surface to just before
/// surface `k`.
pub fn matrix_to_surface(assembly: &OpticalAssembly, wvl_nm: f64, k: usize) -> Result<Matrix2<f64>> {
    assembly.surface(k)?;
    if k <= 1 {
        return Ok(Matrix2::identity());
    }
    let n = assembly.gap_indices(wvl_nm)[k - 1];
    let m = system_matrix(assembly, wvl_nm, 1, k - 1)?;
    Ok(transfer(assembly.gaps()[k - 1].thickness, n) * m)
}

/// Matrix from the first optical surface to the last one.
pub fn lens_matrix(assembly: &OpticalAssembly, wvl_nm: f64) -> Result<Matrix2<f64>> {
    system_matrix(assembly, wvl_nm, 1, assembly.image_index() - 1)
}
