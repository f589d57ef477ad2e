//! Airfoil aerodynamic coefficients for blade-element solvers.
//!
//! The BEMT solvers only ever ask one question of an airfoil: "what are the
//! lift and drag coefficients at this angle of attack and Reynolds number?"
//! ([`AirfoilCoeffProvider::coeffs`]), plus the linearised lift-curve slope
//! used by closed-form solvers ([`AirfoilCoeffProvider::lift_slope`]).
//!
//! Two providers ship with the crate:
//! - [`LinearAirfoils`]: thin-airfoil lift with a drag polar, for quick
//!   studies and verification cases
//! - [`PolarTable`]: tabulated polars at several Reynolds numbers with
//!   configurable post-range extrapolation
//!
//! [`AirfoilSet`] concatenates providers when a blade mixes both kinds.
//!
//! Out-of-range lookups with extrapolation disabled yield NaN coefficients;
//! callers are expected to treat NaN as a hard error.

pub mod error;
pub mod linear;
pub mod model;
pub mod polar;
pub mod set;

pub use error::{AirfoilError, AirfoilResult};
pub use linear::{LinearAirfoils, LinearSection};
pub use model::{AeroCoeffs, AirfoilCoeffProvider};
pub use polar::{Extrapolation, Polar, PolarCurve, PolarTable};
pub use set::AirfoilSet;
