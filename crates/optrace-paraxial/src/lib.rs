#![warn(missing_docs)]

//! Paraxial optics for the optrace sequential ray tracer.
//!
//! Traces marginal and chief rays with the y-nu recursion, builds Gaussian
//! system matrices and reduces them to first-order data: focal lengths,
//! pupils, f-number and the Lagrange invariant.
//!
//! # Example
//!
//! ```ignore
//! use optrace_paraxial::compute_first_order;
//!
//! let fod = compute_first_order(&assembly, &spec)?;
//! println!("efl = {:.4}, f/{:.2}", fod.efl, fod.fno);
//! ```

mod error;
mod first_order;
mod matrix;
mod ray;

pub use error::{ParaxialError, Result};
pub use first_order::{compute_first_order, paraxial_image_distance, FirstOrderData};
pub use matrix::{lens_matrix, matrix_to_surface, system_matrix};
pub use ray::{lagrange_invariant, ParaxialRay, ParaxialRayAtSurface, ParaxialStart};
