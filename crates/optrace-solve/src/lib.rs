#![warn(missing_docs)]

//! Thickness solves for optrace.
//!
//! A [`Solve`] attached to a gap recomputes that gap's thickness from the
//! rest of the system: edge thickness, overall length, paraxial focus,
//! marginal ray height, or a pickup from another gap. [`apply_solves`]
//! runs them once in gap order.
//!
//! # Example
//!
//! ```ignore
//! use optrace_solve::{apply_solves, SolveContext};
//!
//! let ctx = SolveContext::from_first_order(&fod);
//! let applied = apply_solves(&mut assembly, &ctx)?;
//! ```

mod error;
mod resolver;

pub use error::{Result, SolveError};
pub use optrace_assembly::Solve;
pub use resolver::{apply_solve, apply_solves, check_solve, solve_thickness, SolveContext};
