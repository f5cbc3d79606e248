#![warn(missing_docs)]

//! Lens prescription model for the optrace ray tracer.
//!
//! An [`OpticalAssembly`] is an ordered sequence of [`Surface`]s separated
//! by [`Gap`]s, with one surface designated as the aperture stop. The
//! assembly owns profiles and apertures; materials are shared between
//! gaps through `Arc`.
//!
//! # Example
//!
//! ```ignore
//! use optrace_assembly::{Gap, OpticalAssembly, Surface};
//! use optrace_geom::SurfaceProfile;
//!
//! let mut asm = OpticalAssembly::minimal(lib.air());
//! asm.insert(2, Surface::new("L1").with_profile(SurfaceProfile::spherical(0.01)), Gap::new(5.0, lib.find("N-BK7")?))?;
//! ```

mod assembly;
mod error;
mod gap;
mod solve;
mod surface;

pub use assembly::OpticalAssembly;
pub use error::{AssemblyError, Result};
pub use gap::Gap;
pub use solve::Solve;
pub use surface::{Decenter, DecenterKind, InteractionMode, Surface};
