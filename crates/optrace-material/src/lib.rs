#![warn(missing_docs)]

//! Refractive index models for the optrace ray tracer.
//!
//! Every medium maps a vacuum wavelength in nanometers to a refractive
//! index relative to the ambient air, so `AIR` is exactly 1:
//!
//! - [`Material::Constant`] - fixed index
//! - [`Glass`] - catalog dispersion formula with the Schott thermal model
//! - [`Buchdahl`] - model glass fitted to nd and vd
//! - [`Air`] - temperature and pressure corrected air
//!
//! Ambient conditions are an explicit [`Environment`] value handed to each
//! material when it is built.
//!
//! # Example
//!
//! ```ignore
//! use optrace_material::{MaterialLibrary, SpectralLine};
//!
//! let lib = MaterialLibrary::default();
//! let bk7 = lib.find("N-BK7")?;
//! let nd = bk7.rindex(SpectralLine::D.wavelength());
//! ```

mod air;
mod buchdahl;
mod environment;
mod error;
mod glass;
mod library;
mod material;
mod spectral;

pub use air::{air_index, reference_index, Air};
pub use buchdahl::{omega, Buchdahl};
pub use environment::{Environment, STANDARD_PRESSURE};
pub use error::{MaterialError, Result};
pub use glass::{DispersionFormula, Glass, ThermalData, MAX_COEFFICIENTS};
pub use library::MaterialLibrary;
pub use material::Material;
pub use spectral::SpectralLine;
