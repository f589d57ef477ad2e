//! Non-dimensional rotor coefficients.

use crate::error::{SolverError, SolverResult};
use rb_rotor::{RotorOperatingState, RotorPerformance};

/// Reference scaling of the coefficients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoefficientKind {
    /// n = rev/s, D = diameter
    #[default]
    Propeller,
    /// Tip speed ΩR and disk area
    Helicopter,
    /// Freestream dynamic pressure and disk area
    WindTurbine,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Convention {
    pub kind: CoefficientKind,
    /// European helicopter convention: an extra ½ in the reference, so
    /// every coefficient doubles. Has no effect on the other kinds.
    pub eu: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficients {
    pub ct: f64,
    pub cq: f64,
    pub cp: f64,
}

/// Coefficients of a rotor from its totals. Pure, no state is modified.
pub fn coefficients_of(
    perf: &RotorPerformance,
    density: f64,
    radius: f64,
    omega: f64,
    speed: f64,
    convention: Convention,
) -> Coefficients {
    let area = std::f64::consts::PI * radius * radius;
    let (t_ref, q_ref, p_ref) = match convention.kind {
        CoefficientKind::Propeller => {
            let n = omega / (2.0 * std::f64::consts::PI);
            let d = 2.0 * radius;
            (
                density * n.powi(2) * d.powi(4),
                density * n.powi(2) * d.powi(5),
                density * n.powi(3) * d.powi(5),
            )
        }
        CoefficientKind::Helicopter => {
            let tip = omega * radius;
            let scale = if convention.eu { 0.5 } else { 1.0 };
            (
                scale * density * area * tip.powi(2),
                scale * density * area * tip.powi(2) * radius,
                scale * density * area * tip.powi(3),
            )
        }
        CoefficientKind::WindTurbine => {
            let q = 0.5 * density * area;
            (
                q * speed.powi(2),
                q * speed.powi(2) * radius,
                q * speed.powi(3),
            )
        }
    };
    Coefficients {
        ct: perf.thrust / t_ref,
        cq: perf.torque / q_ref,
        cp: perf.power / p_ref,
    }
}

/// Coefficients of a solved operating state.
pub fn coefficients(state: &RotorOperatingState, convention: Convention) -> SolverResult<Coefficients> {
    let perf = state.performance.as_ref().ok_or_else(|| SolverError::InvalidConfig {
        what: "rotor performance has not been computed".to_string(),
    })?;
    Ok(coefficients_of(
        perf,
        state.fluid.density,
        state.rotor.radius(),
        state.op.omega,
        state.op.speed,
        convention,
    ))
}
