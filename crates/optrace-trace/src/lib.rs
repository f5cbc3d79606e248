#![warn(missing_docs)]

//! Sequential real-ray tracing for optrace.
//!
//! Rays are launched from a field point through the paraxial entrance
//! pupil, aimed so they meet the stop where their pupil coordinate says,
//! and propagated surface by surface with exact intersections and vector
//! Snell's law.
//!
//! # Architecture
//!
//! - [`SequentialPath`] - surfaces, transforms and indices for one wavelength
//! - [`propagate`] - the surface-by-surface loop
//! - [`SequentialTracer`] - pupil-ray tracing with ray aiming
//! - [`compute_vignetting`] / [`aim_chief_rays`] - per-field batch updates
//!
//! Physical failures (missed surface, TIR, clipping, aiming) end up on
//! [`Ray::status`]; only structural problems are errors.
//!
//! # Example
//!
//! ```ignore
//! use optrace_trace::{SequentialTracer, TraceOptions};
//!
//! let tracer = SequentialTracer::new(&assembly, &spec, &fod, TraceOptions::default());
//! let ray = tracer.trace_pupil_ray(0, 0, Vec2::new(0.0, 1.0))?;
//! println!("{:?} at {:?}", ray.status, ray.image_point());
//! ```

mod aim;
mod error;
mod fans;
mod path;
mod ray;
pub mod refract;
mod trace;
mod vignetting;

pub use aim::aim_chief_rays;
pub use error::{Result, TraceError};
pub use fans::{fan_pupils, grid_pupils, REFERENCE_PUPILS};
pub use path::{PathStep, SequentialPath};
pub use ray::{Ray, RayAtSurface, RayStatus};
pub use trace::{propagate, AimMode, FieldLaunch, SequentialTracer, TraceOptions, RIM_TOLERANCE};
pub use vignetting::{compute_vignetting, field_vignetting};
