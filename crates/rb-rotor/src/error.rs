//! Error types for rotor geometry and operating-state construction.

use rb_airfoil::AirfoilError;
use rb_core::RbError;
use thiserror::Error;

/// Errors that can occur while building blades and operating states.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RotorError {
    #[error("Invalid geometry: {what}")]
    InvalidGeometry { what: &'static str },

    #[error("Invalid operating point: {what}")]
    InvalidOperatingPoint { what: &'static str },

    #[error("Length mismatch: {what} (expected={expected}, got={got})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Spline construction failed: {what}")]
    Spline { what: &'static str },

    #[error("Airfoil error: {0}")]
    Airfoil(#[from] AirfoilError),
}

pub type RotorResult<T> = Result<T, RotorError>;

impl From<RotorError> for RbError {
    fn from(e: RotorError) -> Self {
        match e {
            RotorError::InvalidGeometry { what } => RbError::InvalidArg { what },
            RotorError::InvalidOperatingPoint { what } => RbError::InvalidArg { what },
            RotorError::LengthMismatch {
                what,
                expected,
                got,
            } => RbError::LengthMismatch {
                what,
                expected,
                got,
            },
            RotorError::Spline { what } => RbError::Invariant { what },
            RotorError::Airfoil(e) => e.into(),
        }
    }
}
