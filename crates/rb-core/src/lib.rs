//! rb-core: stable foundation for rotorbem.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real, convergence and relaxation helpers, interpolation, quadrature)
//! - atmosphere (ISA standard atmosphere)
//! - error (shared error types)

pub mod atmosphere;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use atmosphere::{Atmosphere, FluidProperties, Isa};
pub use error::{RbError, RbResult};
pub use numeric::*;
pub use units::*;
