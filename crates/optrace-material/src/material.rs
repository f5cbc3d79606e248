//! The closed set of refractive media.

use crate::air::Air;
use crate::buchdahl::Buchdahl;
use crate::glass::Glass;
use crate::spectral::SpectralLine;

/// A refractive medium filling a gap.
///
/// Materials are immutable once built; gaps share them through `Arc`.
/// Every variant reports its index relative to the ambient air, so air
/// itself is exactly 1.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Same index at every wavelength.
    Constant {
        /// Display name.
        name: String,
        /// The index.
        index: f64,
    },
    /// Catalog glass.
    Glass(Glass),
    /// Model glass from nd and vd.
    Buchdahl(Buchdahl),
    /// Ambient air.
    Air(Air),
}

impl Material {
    /// A constant-index material.
    pub fn constant(name: impl Into<String>, index: f64) -> Self {
        Self::Constant {
            name: name.into(),
            index,
        }
    }

    /// Vacuum (index exactly 1).
    pub fn vacuum() -> Self {
        Self::constant("VACUUM", 1.0)
    }

    /// Name used to refer to this material in a prescription.
    pub fn name(&self) -> String {
        match self {
            Self::Constant { name, .. } => name.clone(),
            Self::Glass(glass) => glass.name().to_string(),
            Self::Buchdahl(model) => model.name(),
            Self::Air(_) => "AIR".to_string(),
        }
    }

    /// Index relative to ambient air at `wvl_nm` nanometers.
    pub fn rindex(&self, wvl_nm: f64) -> f64 {
        match self {
            Self::Constant { index, .. } => *index,
            Self::Glass(glass) => glass.rindex(wvl_nm),
            Self::Buchdahl(model) => model.rindex(wvl_nm),
            Self::Air(_) => 1.0,
        }
    }

    /// Abbe number at the d line. Infinite for non-dispersive media.
    pub fn abbe_d(&self) -> f64 {
        match self {
            Self::Constant { .. } => f64::INFINITY,
            Self::Glass(glass) => glass.abbe_d(),
            Self::Buchdahl(model) => model.vd(),
            Self::Air(air) => air.abbe_d(),
        }
    }

    /// Index at the d line.
    pub fn nd(&self) -> f64 {
        self.rindex(SpectralLine::D.wavelength())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;

    #[test]
    fn test_constant() {
        let m = Material::constant("1.5", 1.5);
        assert_eq!(m.rindex(400.0), 1.5);
        assert_eq!(m.rindex(700.0), 1.5);
        assert!(m.abbe_d().is_infinite());
    }

    #[test]
    fn test_indices_are_relative_to_air() {
        let env = Environment::default();
        let air = Material::Air(Air::new(env));
        assert_eq!(air.rindex(587.562), 1.0);
        assert_eq!(air.rindex(435.834), 1.0);

        let constant = Material::constant("1.5", 1.5);
        assert_eq!(constant.rindex(587.562) / air.rindex(587.562), 1.5);

        let model = Material::Buchdahl(Buchdahl::new(1.5168, 64.17).unwrap());
        assert!((model.nd() / air.nd() - 1.5168).abs() < 1e-12);
    }

    #[test]
    fn test_names() {
        assert_eq!(Material::vacuum().name(), "VACUUM");
        assert_eq!(Material::Air(Air::new(Environment::default())).name(), "AIR");
        let model = Material::Buchdahl(Buchdahl::new(1.7, 30.0).unwrap());
        assert_eq!(model.name(), "1.7:30");
        assert!((model.abbe_d() - 30.0).abs() < 1e-12);
    }
}
