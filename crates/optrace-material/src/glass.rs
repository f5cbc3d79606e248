//! Catalog glasses: dispersion formulas and the thermal index model.

use serde::{Deserialize, Serialize};

use crate::air::air_index;
use crate::environment::{Environment, STANDARD_PRESSURE};
use crate::error::{MaterialError, Result};
use crate::spectral::SpectralLine;

/// Number of coefficient slots a dispersion formula can read.
pub const MAX_COEFFICIENTS: usize = 12;

/// Dispersion formulas found in glass catalogs.
///
/// Every formula takes the wavelength in micrometers and returns the index
/// relative to air at the catalog's reference temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispersionFormula {
    /// `n² = a0 + a1 λ² + a2 λ⁻² + a3 λ⁻⁴ + a4 λ⁻⁶ + a5 λ⁻⁸`
    Schott,
    /// Three-term Sellmeier with `(B, C)` pairs.
    Sellmeier1,
    /// Herzberger with `L = 1/(λ² − 0.028)`.
    Herzberger,
    /// `n² = 1 + A + B1 λ²/(λ² − λ1²) + B2 λ²/(λ² − λ2²)`
    Sellmeier2,
    /// `n = n0 + A/λ + B/λ^3.5`
    Conrady,
    /// Four-term Sellmeier.
    Sellmeier3,
    /// Handbook of Optics formula 1.
    HandbookOfOptics1,
    /// Handbook of Optics formula 2.
    HandbookOfOptics2,
    /// `n² = A + B λ²/(λ² − C) + D λ²/(λ² − E)`
    Sellmeier4,
    /// Schott formula extended to λ⁻¹².
    Extended1,
    /// Five-term Sellmeier.
    Sellmeier5,
    /// Schott formula extended with λ⁴ and λ⁶ terms.
    Extended2,
    /// Formula used by Nikon Hikari catalogs.
    NikonHikari,
    /// No formula; index is 1.
    Unknown,
}

impl DispersionFormula {
    /// Decode a catalog formula code.
    ///
    /// Code 13 is ambiguous in catalogs: HIKARI uses it for its own formula,
    /// everyone else for "unknown".
    pub fn from_code(code: i32, supplier: &str) -> Result<Self> {
        let formula = match code {
            1 => Self::Schott,
            2 => Self::Sellmeier1,
            3 => Self::Herzberger,
            4 => Self::Sellmeier2,
            5 => Self::Conrady,
            6 => Self::Sellmeier3,
            7 => Self::HandbookOfOptics1,
            8 => Self::HandbookOfOptics2,
            9 => Self::Sellmeier4,
            10 => Self::Extended1,
            11 => Self::Sellmeier5,
            12 => Self::Extended2,
            13 if supplier.to_uppercase().contains("HIKARI") => Self::NikonHikari,
            13 => Self::Unknown,
            other => return Err(MaterialError::UnknownFormula(other)),
        };
        Ok(formula)
    }

    /// Evaluate the formula at `l` micrometers with coefficients `c`.
    pub fn evaluate(self, l: f64, c: &[f64; MAX_COEFFICIENTS]) -> f64 {
        let l2 = l * l;
        let pole = |b: f64, c: f64| b * l2 / (l2 - c);
        match self {
            Self::Schott => (c[0]
                + c[1] * l2
                + c[2] / l2
                + c[3] / l2.powi(2)
                + c[4] / l2.powi(3)
                + c[5] / l2.powi(4))
            .sqrt(),
            Self::Sellmeier1 => {
                (1.0 + pole(c[0], c[1]) + pole(c[2], c[3]) + pole(c[4], c[5])).sqrt()
            }
            Self::Herzberger => {
                let big_l = 1.0 / (l2 - 0.028);
                c[0] + c[1] * big_l
                    + c[2] * big_l * big_l
                    + c[3] * l2
                    + c[4] * l2.powi(2)
                    + c[5] * l2.powi(3)
            }
            Self::Sellmeier2 => (1.0 + c[0] + pole(c[1], c[2]) + pole(c[3], c[4])).sqrt(),
            Self::Conrady => c[0] + c[1] / l + c[2] / l.powf(3.5),
            Self::Sellmeier3 => (1.0
                + pole(c[0], c[1])
                + pole(c[2], c[3])
                + pole(c[4], c[5])
                + pole(c[6], c[7]))
            .sqrt(),
            Self::HandbookOfOptics1 => (c[0] + c[1] / (l2 - c[2]) - c[3] * l2).sqrt(),
            Self::HandbookOfOptics2 => (c[0] + pole(c[1], c[2]) - c[3] * l2).sqrt(),
            Self::Sellmeier4 => (c[0] + pole(c[1], c[2]) + pole(c[3], c[4])).sqrt(),
            Self::Extended1 => (c[0]
                + c[1] * l2
                + c[2] / l2
                + c[3] / l2.powi(2)
                + c[4] / l2.powi(3)
                + c[5] / l2.powi(4)
                + c[6] / l2.powi(5)
                + c[7] / l2.powi(6))
            .sqrt(),
            Self::Sellmeier5 => (1.0
                + pole(c[0], c[1])
                + pole(c[2], c[3])
                + pole(c[4], c[5])
                + pole(c[6], c[7])
                + pole(c[8], c[9]))
            .sqrt(),
            Self::Extended2 => (c[0]
                + c[1] * l2
                + c[2] / l2
                + c[3] / l2.powi(2)
                + c[4] / l2.powi(3)
                + c[5] / l2.powi(4)
                + c[6] * l2.powi(2)
                + c[7] * l2.powi(3))
            .sqrt(),
            Self::NikonHikari => (c[0]
                + c[1] * l2
                + c[2] * l2.powi(2)
                + c[3] / l2
                + c[4] / l2.powi(2)
                + c[5] / l2.powi(3)
                + c[6] / l2.powi(4)
                + c[7] / l2.powi(5)
                + c[8] / l2.powi(6))
            .sqrt(),
            Self::Unknown => 1.0,
        }
    }
}

/// Coefficients of the Schott model for the temperature dependence of the
/// absolute index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalData {
    /// Constant term of dn/dT.
    pub d0: f64,
    /// Linear term of dn/dT.
    pub d1: f64,
    /// Quadratic term of dn/dT.
    pub d2: f64,
    /// Constant term of the resonance contribution.
    pub e0: f64,
    /// Linear term of the resonance contribution.
    pub e1: f64,
    /// Effective resonance wavelength in micrometers (sign matters).
    pub ltk: f64,
    /// Temperature at which the catalog formula is valid, in °C.
    pub reference_temperature: f64,
}

impl Default for ThermalData {
    fn default() -> Self {
        Self {
            d0: 0.0,
            d1: 0.0,
            d2: 0.0,
            e0: 0.0,
            e1: 0.0,
            ltk: 0.0,
            reference_temperature: 20.0,
        }
    }
}

impl ThermalData {
    /// Change of absolute index from the reference temperature to `t`,
    /// given the catalog index `n` at `wvl_um`.
    pub fn delta_n_abs(&self, n: f64, wvl_um: f64, t: f64) -> f64 {
        let dt = t - self.reference_temperature;
        let stk = if self.ltk > 0.0 {
            1.0
        } else if self.ltk < 0.0 {
            -1.0
        } else {
            0.0
        };
        let resonance = (self.e0 * dt + self.e1 * dt * dt)
            / (wvl_um * wvl_um - stk * self.ltk * self.ltk);
        (n * n - 1.0) / (2.0 * n)
            * (self.d0 * dt + self.d1 * dt * dt + self.d2 * dt * dt * dt + resonance)
    }
}

/// A catalog glass.
#[derive(Debug, Clone, PartialEq)]
pub struct Glass {
    name: String,
    supplier: String,
    formula: DispersionFormula,
    coefficients: [f64; MAX_COEFFICIENTS],
    thermal: ThermalData,
    environment: Environment,
}

impl Glass {
    /// Create a glass from catalog data.
    ///
    /// Missing trailing coefficients are zero.
    pub fn new(
        name: impl Into<String>,
        supplier: impl Into<String>,
        formula: DispersionFormula,
        coefficients: &[f64],
    ) -> Result<Self> {
        if coefficients.len() > MAX_COEFFICIENTS {
            return Err(MaterialError::TooManyCoefficients {
                count: coefficients.len(),
                max: MAX_COEFFICIENTS,
            });
        }
        let mut coefs = [0.0; MAX_COEFFICIENTS];
        coefs[..coefficients.len()].copy_from_slice(coefficients);
        Ok(Self {
            name: name.into(),
            supplier: supplier.into(),
            formula,
            coefficients: coefs,
            thermal: ThermalData::default(),
            environment: Environment::default(),
        })
    }

    /// Attach thermal coefficients.
    pub fn with_thermal(mut self, thermal: ThermalData) -> Self {
        self.thermal = thermal;
        self
    }

    /// Evaluate at the given ambient conditions.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Product name, e.g. `N-BK7`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Catalog supplier, e.g. `SCHOTT`.
    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    /// The dispersion formula in use.
    pub fn formula(&self) -> DispersionFormula {
        self.formula
    }

    /// Thermal coefficients.
    pub fn thermal(&self) -> &ThermalData {
        &self.thermal
    }

    /// Ambient conditions used for evaluation.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Index relative to air at the catalog reference temperature.
    pub fn catalog_index(&self, wvl_um: f64) -> f64 {
        self.formula.evaluate(wvl_um, &self.coefficients)
    }

    /// Absolute (vacuum-referenced) index at the glass temperature.
    pub fn absolute_index(&self, wvl_nm: f64) -> f64 {
        let wvl_um = wvl_nm / 1000.0;
        let tref = self.thermal.reference_temperature;
        let n_rel = self.catalog_index(wvl_um);
        let n_abs_ref = n_rel * air_index(wvl_um, tref, STANDARD_PRESSURE);
        n_abs_ref + self.thermal.delta_n_abs(n_rel, wvl_um, self.environment.temperature)
    }

    /// Index relative to the surrounding air.
    pub fn relative_index(&self, wvl_nm: f64) -> f64 {
        let env = self.environment;
        self.absolute_index(wvl_nm) / air_index(wvl_nm / 1000.0, env.temperature, env.pressure)
    }

    /// Index used by the ray tracer: relative to air, like every other
    /// material.
    pub fn rindex(&self, wvl_nm: f64) -> f64 {
        self.relative_index(wvl_nm)
    }

    /// Abbe number from relative indices at d, F and C.
    pub fn abbe_d(&self) -> f64 {
        let nd = self.relative_index(SpectralLine::D.wavelength());
        let nf = self.relative_index(SpectralLine::F.wavelength());
        let nc = self.relative_index(SpectralLine::C.wavelength());
        (nd - 1.0) / (nf - nc)
    }
}
