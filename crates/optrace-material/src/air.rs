//! Index of air as a function of wavelength, temperature and pressure.

use crate::environment::{Environment, STANDARD_PRESSURE};
use crate::spectral::SpectralLine;

/// Temperature at which the reference formula is defined, in °C.
const REFERENCE_TEMPERATURE: f64 = 15.0;

/// Thermal coefficient of the refractivity of air, per °C.
const THERMAL_COEFFICIENT: f64 = 3.4785e-3;

/// Index of dry air at 15 °C and one atmosphere. `wvl_um` in micrometers.
pub fn reference_index(wvl_um: f64) -> f64 {
    let l2 = wvl_um * wvl_um;
    let refractivity =
        6432.8 + 2_949_810.0 * l2 / (146.0 * l2 - 1.0) + 25_540.0 * l2 / (41.0 * l2 - 1.0);
    1.0 + refractivity * 1e-8
}

/// Absolute index of air at the given temperature (°C) and pressure (Pa).
pub fn air_index(wvl_um: f64, temperature: f64, pressure: f64) -> f64 {
    let refractivity = reference_index(wvl_um) - 1.0;
    let scale = 1.0 + (temperature - REFERENCE_TEMPERATURE) * THERMAL_COEFFICIENT;
    1.0 + refractivity / scale * (pressure / STANDARD_PRESSURE)
}

/// Air at a fixed ambient condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Air {
    environment: Environment,
}

impl Air {
    /// Air at the given conditions.
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// The conditions this air was built for.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Absolute index at `wvl_nm` nanometers.
    pub fn rindex(&self, wvl_nm: f64) -> f64 {
        air_index(
            wvl_nm / 1000.0,
            self.environment.temperature,
            self.environment.pressure,
        )
    }

    /// Abbe number at the d line.
    pub fn abbe_d(&self) -> f64 {
        let nd = self.rindex(SpectralLine::D.wavelength());
        let nf = self.rindex(SpectralLine::F.wavelength());
        let nc = self.rindex(SpectralLine::C.wavelength());
        (nd - 1.0) / (nf - nc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_conditions() {
        let air = Air::new(Environment::new(15.0, STANDARD_PRESSURE));
        assert_relative_eq!(air.rindex(587.562), 1.000_277_16, epsilon = 1e-8);
    }

    #[test]
    fn test_warmer_air_is_thinner() {
        let cool = air_index(0.5876, 15.0, STANDARD_PRESSURE);
        let warm = air_index(0.5876, 25.0, STANDARD_PRESSURE);
        assert!(warm < cool);
        assert_relative_eq!(warm, 1.000_267_85, epsilon = 1e-8);
    }

    #[test]
    fn test_vacuum_pressure() {
        assert_relative_eq!(air_index(0.5876, 20.0, 0.0), 1.0);
    }

    #[test]
    fn test_air_is_dispersive() {
        let air = Air::new(Environment::default());
        assert!(air.rindex(486.133) > air.rindex(656.273));
        assert!(air.abbe_d() > 80.0);
    }
}
