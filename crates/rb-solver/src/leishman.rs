//! Closed-form inflow ratio (Leishman).
//!
//! Combining blade-element thrust with annular momentum in hover or axial
//! climb gives a quadratic in the inflow ratio λ:
//!
//! ```text
//! (8F/σa)·λ·(λ − λc) = θ·r − λ
//! ```
//!
//! Without losses it is solved once. With a loss model F depends on
//! φ = atan(λ/ξ), so λ and F are iterated until λ settles.

use crate::common::{element_geometry, fetch_coeffs};
use crate::config::{LossType, ModelConfig, SolveReport, SolverKind};
use crate::error::{SolverError, SolverResult};
use crate::loss::loss_factor_at;
use rb_airfoil::AirfoilCoeffProvider;
use rb_core::numeric::is_converged;
use rb_rotor::RotorOperatingState;
use tracing::{debug, error};

const NAME: &str = "leishman";

/// Positive root of the inflow quadratic.
///
/// # Arguments
/// * `sigma` - Element solidity
/// * `slope` - Lift-curve slope [1/rad]
/// * `pitch` - Pitch angle θ [rad]
/// * `r` - Relative radius
/// * `climb_ratio` - λc = V/ΩR
/// * `f` - Loss factor
///
/// A negative discriminant (strongly negative pitch) is clamped to zero.
pub fn inflow_ratio(sigma: f64, slope: f64, pitch: f64, r: f64, climb_ratio: f64, f: f64) -> f64 {
    let half_b = sigma * slope / (16.0 * f) - 0.5 * climb_ratio;
    let disc = half_b * half_b + sigma * slope * pitch * r / (8.0 * f);
    disc.max(0.0).sqrt() - half_b
}

pub fn solve(
    state: &mut RotorOperatingState,
    config: &ModelConfig,
    provider: &dyn AirfoilCoeffProvider,
) -> SolverResult<SolveReport> {
    let geom = element_geometry(state, config.solidity);
    let n_blades = state.rotor.n_blades;
    let r0 = state.rotor.root_cutout() / state.rotor.radius();
    let tip_speed = state.tip_speed();

    let mut slope = Vec::with_capacity(geom.len());
    for e in &state.elements {
        slope.push(provider.lift_slope(e.airfoil, e.reynolds)?);
    }
    let climb: Vec<f64> = state.elements.iter().map(|e| e.axial_inflow / tip_speed).collect();
    let swirl: Vec<f64> = state
        .elements
        .iter()
        .map(|e| e.tangential_inflow / tip_speed)
        .collect();

    let closed_form = |i: usize, f: f64| {
        inflow_ratio(
            geom[i].sigma,
            slope[i],
            state.elements[i].true_pitch,
            geom[i].r,
            climb[i],
            f,
        )
    };

    let mut lambda: Vec<f64> = (0..geom.len()).map(|i| closed_form(i, 1.0)).collect();
    let mut iterations = 1;

    if config.loss != LossType::None {
        let mut converged = false;
        for iter in 1..=config.max_iter {
            iterations = iter;
            let next: Vec<f64> = (0..geom.len())
                .map(|i| {
                    let phi = lambda[i].atan2(swirl[i]);
                    let f = loss_factor_at(n_blades, geom[i].r, r0, phi, config.loss);
                    closed_form(i, f)
                })
                .collect();
            let done = is_converged(&next, &lambda, config.convergence_tol, None);
            lambda = next;
            if done {
                converged = true;
                break;
            }
        }
        if !converged {
            error!(solver = NAME, iterations, "loss factor iteration did not converge");
            return Err(SolverError::NotConverged {
                solver: NAME,
                iterations,
            });
        }
    }

    for (i, e) in state.elements.iter_mut().enumerate() {
        let phi = lambda[i].atan2(swirl[i]);
        let alpha = e.true_pitch - phi;
        e.set_inflow_angle(phi);
        fetch_coeffs(e, provider, alpha, NAME, i)?;
        e.set_induced_velocities(lambda[i] * tip_speed - e.axial_inflow, 0.0);
    }

    debug!(solver = NAME, iterations, "solved");
    Ok(SolveReport::converged(SolverKind::Leishman, iterations))
}
