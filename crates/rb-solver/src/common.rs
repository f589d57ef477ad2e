//! Pieces shared by the four solvers.

use crate::error::{SolverError, SolverResult};
use rb_airfoil::{AeroCoeffs, AirfoilCoeffProvider};
use rb_rotor::{ElementState, RotorOperatingState, SolidityDef};

/// Geometric data of one element as the solvers need it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ElementGeom {
    /// y/R
    pub r: f64,
    /// y [m]
    pub y: f64,
    /// dy [m]
    pub dy: f64,
    pub chord: f64,
    /// Element solidity σ
    pub sigma: f64,
}

pub(crate) fn element_geometry(state: &RotorOperatingState, def: SolidityDef) -> Vec<ElementGeom> {
    let sigma = state.rotor.solidity(def);
    state
        .rotor
        .blade()
        .elements()
        .iter()
        .zip(sigma)
        .map(|(e, sigma)| ElementGeom {
            r: e.relative_radius,
            y: e.absolute_radius,
            dy: e.span,
            chord: e.chord,
            sigma,
        })
        .collect()
}

/// Set α on an element and fail if the provider has no data there.
pub(crate) fn fetch_coeffs(
    element: &mut ElementState,
    provider: &dyn AirfoilCoeffProvider,
    alpha: f64,
    solver: &'static str,
    index: usize,
) -> SolverResult<AeroCoeffs> {
    let coeffs = element.set_angle_of_attack(provider, alpha)?;
    if coeffs.is_missing() {
        return Err(SolverError::InvalidAeroData {
            solver,
            element: index,
            alpha_deg: alpha.to_degrees(),
            reynolds: element.reynolds,
        });
    }
    Ok(coeffs)
}

/// Lift and drag resolved onto the thrust (`cx`) and tangential (`cy`)
/// directions for inflow angle `phi`.
#[inline]
pub(crate) fn force_coeffs(c: AeroCoeffs, phi: f64) -> (f64, f64) {
    let (s, co) = phi.sin_cos();
    (c.cl * co - c.cd * s, c.cl * s + c.cd * co)
}
