//! Name-based material lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::air::Air;
use crate::buchdahl::Buchdahl;
use crate::environment::Environment;
use crate::error::{MaterialError, Result};
use crate::glass::{DispersionFormula, Glass, ThermalData};
use crate::material::Material;

/// Built-in Schott glasses: name and Sellmeier1 coefficients.
const SCHOTT_SELLMEIER: [(&str, [f64; 6]); 4] = [
    (
        "N-BK7",
        [1.039_612_12, 0.006_000_698_67, 0.231_792_344, 0.020_017_914_4, 1.010_469_45, 103.560_653],
    ),
    (
        "F2",
        [1.345_333_59, 0.009_977_438_71, 0.209_073_176, 0.047_045_076_7, 0.937_357_162, 111.886_764],
    ),
    (
        "N-SK16",
        [1.343_177_74, 0.007_046_873_39, 0.241_144_399, 0.022_900_5, 0.994_317_969, 92.750_852_6],
    ),
    (
        "SF5",
        [1.524_818_89, 0.011_254_756, 0.187_085_527, 0.058_899_539_2, 1.427_290_15, 129.141_675],
    ),
];

const BK7_THERMAL: ThermalData = ThermalData {
    d0: 1.86e-6,
    d1: 1.31e-8,
    d2: -1.37e-11,
    e0: 4.34e-7,
    e1: 6.27e-10,
    ltk: 0.17,
    reference_temperature: 20.0,
};

/// Resolves material names to shared material instances.
///
/// Accepted names, case-insensitive for catalog entries:
/// - `AIR`, `VACUUM`
/// - a catalog product, optionally qualified by supplier (`N-BK7_SCHOTT`)
/// - a model glass as `nd:vd` (`1.5168:64.17`)
/// - a bare number for a constant index (`1.5`)
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    environment: Environment,
    air: Arc<Material>,
    vacuum: Arc<Material>,
    glasses: HashMap<String, Arc<Material>>,
}

impl MaterialLibrary {
    /// Library with the built-in catalog evaluated at `environment`.
    pub fn new(environment: Environment) -> Self {
        let mut library = Self {
            environment,
            air: Arc::new(Material::Air(Air::new(environment))),
            vacuum: Arc::new(Material::vacuum()),
            glasses: HashMap::new(),
        };
        for (name, coefs) in SCHOTT_SELLMEIER {
            let glass = match Glass::new(name, "SCHOTT", DispersionFormula::Sellmeier1, &coefs) {
                Ok(glass) => glass,
                Err(_) => continue,
            };
            let glass = if name == "N-BK7" {
                glass.with_thermal(BK7_THERMAL)
            } else {
                glass
            };
            library.add_glass(glass);
        }
        library
    }

    /// Ambient conditions every material is evaluated at.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Shared ambient air.
    pub fn air(&self) -> Arc<Material> {
        Arc::clone(&self.air)
    }

    /// Shared vacuum.
    pub fn vacuum(&self) -> Arc<Material> {
        Arc::clone(&self.vacuum)
    }

    /// Register a catalog glass. Replaces any glass of the same name.
    pub fn add_glass(&mut self, glass: Glass) -> Arc<Material> {
        let key = glass.name().to_uppercase();
        let supplier = glass.supplier().to_uppercase();
        let material = Arc::new(Material::Glass(glass.with_environment(self.environment)));
        self.glasses.insert(format!("{key}_{supplier}"), Arc::clone(&material));
        self.glasses.insert(key, Arc::clone(&material));
        material
    }

    /// Number of distinct catalog glasses.
    pub fn glass_count(&self) -> usize {
        self.glasses.keys().filter(|k| !k.contains('_')).count()
    }

    /// Resolve a material by name.
    pub fn find(&self, name: &str) -> Result<Arc<Material>> {
        let trimmed = name.trim();
        let upper = trimmed.to_uppercase();
        match upper.as_str() {
            "AIR" => return Ok(self.air()),
            "VACUUM" => return Ok(self.vacuum()),
            _ => {}
        }
        if let Some(material) = self.glasses.get(&upper) {
            return Ok(Arc::clone(material));
        }
        if let Some((nd, vd)) = trimmed.split_once(':') {
            let (nd, vd) = match (nd.trim().parse::<f64>(), vd.trim().parse::<f64>()) {
                (Ok(nd), Ok(vd)) => (nd, vd),
                _ => return Err(MaterialError::UnknownMaterial(name.to_string())),
            };
            debug!(nd, vd, "building model glass");
            return Ok(Arc::new(Material::Buchdahl(Buchdahl::new(nd, vd)?)));
        }
        if let Ok(index) = trimmed.parse::<f64>() {
            if index.is_finite() && index > 0.0 {
                return Ok(Arc::new(Material::constant(trimmed, index)));
            }
        }
        Err(MaterialError::UnknownMaterial(name.to_string()))
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}
