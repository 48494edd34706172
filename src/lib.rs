//! Convergence analysis for fracture apertures computed by displacement correlation.
//!
//! The crate sets up a domain with a single embedded fracture, runs a mechanical
//! solve for a sequence of mesh resolutions, extracts the fracture-face displacement
//! jump (the aperture) at every fracture cell, and compares the result against the
//! closed-form Sneddon solution. The outcome is an ordered sequence of
//! [`ConvergenceRecord`](crate::norms::ConvergenceRecord)s from which empirical
//! convergence orders can be read off.
//!
//! Meshing of general (oblique) fracture geometries and the mechanical
//! discretization operator are external collaborators, consumed through the
//! [`Mesher`](crate::grid::Mesher) and [`Discretization`](crate::driver::Discretization)
//! traits. A structured reference mesher for the axis-aligned fracture case is
//! provided in [`grid`].

pub mod analytical;
pub mod correlation;
pub mod driver;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod norms;
pub mod params;
pub mod solver;

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;
