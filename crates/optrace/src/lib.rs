#![warn(missing_docs)]

//! optrace: sequential optical ray tracing.
//!
//! Ties the component crates together into an [`OpticalSystem`] that owns
//! a lens prescription, its optical specification and the derived model
//! data, and keeps them consistent through [`OpticalSystem::update_model`].
//!
//! # Example
//!
//! ```ignore
//! use optrace::{MaterialLibrary, OpticalSystem, Vec2};
//!
//! let mut system = OpticalSystem::load("doublet.json".as_ref(), MaterialLibrary::default())?;
//! system.update_model()?;
//! let fod = system.first_order().unwrap();
//! println!("efl {:.3}  f/{:.2}", fod.efl, fod.fno);
//!
//! let ray = system.trace_pupil_ray(1, 0, Vec2::new(0.0, 1.0))?;
//! println!("{:?}", ray.image_point());
//! ```

mod config;
mod error;
mod prescription;
mod system;

pub use config::EngineConfig;
pub use error::{OptraceError, Result};
pub use prescription::{GapRecord, Prescription, SurfaceRecord, FORMAT_VERSION};
pub use system::OpticalSystem;

pub use optrace_assembly;
pub use optrace_geom;
pub use optrace_material;
pub use optrace_math;
pub use optrace_paraxial;
pub use optrace_solve;
pub use optrace_spec;
pub use optrace_trace;

pub use optrace_assembly::{Decenter, DecenterKind, Gap, InteractionMode, OpticalAssembly, Solve, Surface};
pub use optrace_geom::{Aperture, Asphere, SurfaceProfile};
pub use optrace_material::{Environment, Material, MaterialLibrary};
pub use optrace_math::Vec2;
pub use optrace_paraxial::{FirstOrderData, ParaxialRay};
pub use optrace_spec::{Field, FieldSpec, FieldType, OpticalSpec, PupilSpec, PupilType, Wvl, WvlSpec};
pub use optrace_trace::{AimMode, Ray, RayStatus, SequentialTracer, TraceOptions};
