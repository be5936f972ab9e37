//! Generation of 3D wing surface geometry from spanwise chord, twist, sweep, dihedral and airfoil
//! distributions. Sections are produced from analytic NACA 4/5-digit airfoils or from digitized
//! coordinate files, placed along the span and transformed into a single point cloud.

pub mod airfoil;
pub mod algorithms;
pub mod config;
pub mod errors;
pub mod serialize;
pub mod spline;
pub mod wing;

pub use errors::WingError;

pub type Result<T> = std::result::Result<T, WingError>;
