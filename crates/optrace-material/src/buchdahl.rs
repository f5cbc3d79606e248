//! Two-parameter model glass defined by nd and vd.

use crate::error::{MaterialError, Result};
use crate::spectral::SpectralLine;

/// Fit constants relating the first and second Buchdahl coefficients
/// for typical optical glasses.
const B: f64 = -0.064_667;
const M: f64 = -1.604_048;

/// Buchdahl chromatic coordinate for a wavelength offset in micrometers.
pub fn omega(delta_um: f64) -> f64 {
    delta_um / (1.0 + 2.5 * delta_um)
}

/// A glass modeled from its d-line index and Abbe number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buchdahl {
    nd: f64,
    vd: f64,
    v1: f64,
    v2: f64,
}

impl Buchdahl {
    /// Fit the dispersion coefficients to `nd` and `vd`.
    pub fn new(nd: f64, vd: f64) -> Result<Self> {
        if !nd.is_finite() || !vd.is_finite() || nd < 1.0 || vd <= 0.0 {
            return Err(MaterialError::InvalidModelGlass { nd, vd });
        }
        let wv0 = SpectralLine::D.wavelength() / 1000.0;
        let om_f = omega(SpectralLine::F.wavelength() / 1000.0 - wv0);
        let om_c = omega(SpectralLine::C.wavelength() / 1000.0 - wv0);
        let d_om = om_f - om_c;
        let d_om2 = om_f * om_f - om_c * om_c;

        // nF - nC = v1·Δω + v2·Δω², with v1 = B + M·v2
        let d_fc = (nd - 1.0) / vd;
        let v2 = (d_fc - B * d_om) / (M * d_om + d_om2);
        let v1 = B + M * v2;
        Ok(Self { nd, vd, v1, v2 })
    }

    /// Index at the d line.
    pub fn nd(&self) -> f64 {
        self.nd
    }

    /// Abbe number.
    pub fn vd(&self) -> f64 {
        self.vd
    }

    /// Name in `nd:vd` form, parseable by the material library.
    pub fn name(&self) -> String {
        format!("{}:{}", self.nd, self.vd)
    }

    /// Index at `wvl_nm` nanometers.
    pub fn rindex(&self, wvl_nm: f64) -> f64 {
        let om = omega(wvl_nm / 1000.0 - SpectralLine::D.wavelength() / 1000.0);
        self.nd + self.v1 * om + self.v2 * om * om
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reproduces_nd_and_vd() {
        let glass = Buchdahl::new(1.6, 40.0).unwrap();
        let nd = glass.rindex(SpectralLine::D.wavelength());
        let nf = glass.rindex(SpectralLine::F.wavelength());
        let nc = glass.rindex(SpectralLine::C.wavelength());
        assert_relative_eq!(nd, 1.6, epsilon = 1e-14);
        assert_relative_eq!((nd - 1.0) / (nf - nc), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_normal_dispersion() {
        let glass = Buchdahl::new(1.5168, 64.17).unwrap();
        assert!(glass.rindex(435.834) > glass.rindex(546.074));
        assert!(glass.rindex(546.074) > glass.rindex(706.519));
    }

    #[test]
    fn test_name() {
        assert_eq!(Buchdahl::new(1.5168, 64.17).unwrap().name(), "1.5168:64.17");
    }

    #[test]
    fn test_invalid() {
        assert!(Buchdahl::new(1.5, 0.0).is_err());
        assert!(Buchdahl::new(f64::NAN, 50.0).is_err());
    }
}
