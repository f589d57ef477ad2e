//! Error types for BEMT solving.

use crate::root::ResidualCurve;
use rb_airfoil::AirfoilError;
use rb_core::RbError;
use rb_rotor::RotorError;
use thiserror::Error;

/// Hard solver failures. Soft non-convergence is reported through
/// [`crate::SolveReport`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid solver configuration: {what}")]
    InvalidConfig { what: String },

    #[error("{solver}: no convergence after {iterations} iterations")]
    NotConverged {
        solver: &'static str,
        iterations: usize,
    },

    #[error(
        "{solver}: no root for element {element} in bracket [{:.3}, {:.3}] deg",
        .bracket_deg.0,
        .bracket_deg.1
    )]
    NoRoot {
        solver: &'static str,
        element: usize,
        bracket_deg: (f64, f64),
        /// g(φ) sampled over the bracket
        diagnostic: Box<ResidualCurve>,
    },

    #[error(
        "{solver}: no valid aerodynamic data for the current angle of attack — adjust \
         extrapolation policy or operating range (element {element}, alpha={alpha_deg:.2} deg, \
         Re={reynolds:.0})"
    )]
    InvalidAeroData {
        solver: &'static str,
        element: usize,
        alpha_deg: f64,
        reynolds: f64,
    },

    #[error("Rotor error: {0}")]
    Rotor(#[from] RotorError),

    #[error("Airfoil error: {0}")]
    Airfoil(#[from] AirfoilError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for RbError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Rotor(e) => e.into(),
            SolverError::Airfoil(e) => e.into(),
            other => RbError::Upstream {
                context: "solver",
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aero_data_message_names_the_remedy() {
        let err = SolverError::InvalidAeroData {
            solver: "indfact",
            element: 3,
            alpha_deg: 42.0,
            reynolds: 1e5,
        };
        let msg = err.to_string();
        assert!(msg.contains("no valid aerodynamic data"));
        assert!(msg.contains("extrapolation policy"));
        assert!(msg.contains("element 3"));
    }

    #[test]
    fn no_root_reports_bracket_in_degrees() {
        let err = SolverError::NoRoot {
            solver: "stahlhut",
            element: 7,
            bracket_deg: (-90.0, 0.0),
            diagnostic: Box::default(),
        };
        let msg = err.to_string();
        assert!(msg.contains("element 7"));
        assert!(msg.contains("-90.000"));
    }

    #[test]
    fn converts_into_foundation_error() {
        let err: RbError = SolverError::NotConverged {
            solver: "leishman",
            iterations: 10,
        }
        .into();
        assert!(matches!(err, RbError::Upstream { context: "solver", .. }));
    }
}
