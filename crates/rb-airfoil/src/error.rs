//! Airfoil coefficient errors.

use rb_core::RbError;
use thiserror::Error;

/// Result type for airfoil operations.
pub type AirfoilResult<T> = Result<T, AirfoilError>;

/// Errors that can occur while building or querying airfoil data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AirfoilError {
    /// Airfoil index not known to the provider.
    #[error("Unknown airfoil index {index} (provider has {count})")]
    UnknownAirfoil { index: usize, count: usize },

    /// Non-physical values (negative drag, non-finite inputs, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid table or parameter.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Lift slope fit failed (too few points in the linear range).
    #[error("Lift slope unavailable: {what}")]
    SlopeUnavailable { what: &'static str },
}

impl From<AirfoilError> for RbError {
    fn from(err: AirfoilError) -> Self {
        RbError::Upstream {
            context: "airfoil",
            message: err.to_string(),
        }
    }
}
