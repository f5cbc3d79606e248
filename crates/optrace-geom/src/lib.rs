#![warn(missing_docs)]

//! Surface geometry for sequential ray tracing.
//!
//! A [`SurfaceProfile`] describes an optical interface in its local frame:
//! the vertex sits at the origin and the optical axis runs along +z. Every
//! profile provides its sag, an implicit function `f(p) = 0` with gradient,
//! the unit normal, and ray intersection.
//!
//! - [`SurfaceProfile`] - plane, sphere, even and odd polynomial aspheres
//! - [`intersect`] - closed-form and Newton intersectors
//! - [`Aperture`] - clear and edge apertures
//!
//! # Example
//!
//! ```ignore
//! use optrace_geom::SurfaceProfile;
//! use optrace_math::{Point3, Vec3};
//!
//! let profile = SurfaceProfile::spherical(0.01);
//! let hit = profile.intersect(&Point3::new(0.0, 5.0, -1.0), &Vec3::z())?;
//! let n = profile.normal(&hit.point);
//! ```

mod aperture;
pub mod intersect;
mod profile;

pub use aperture::Aperture;
pub use intersect::{Intersection, Miss};
pub use profile::{Asphere, SurfaceProfile};
