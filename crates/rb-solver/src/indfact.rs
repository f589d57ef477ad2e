//! Relaxed fixed point on the axial velocity and the tangential induction
//! factor (propeller formulation).
//!
//! Annular momentum gives, per element,
//!
//! ```text
//! |v|·(v − V)   = W²·s·cx / (4·K_T)             (V ≠ 0)
//! v·|v|         = W²·s·cx / (4·K_T)             (V = 0)
//! b             = W²·s·cy / (4·K_P·|v|·V_tg)
//! ```
//!
//! with `s = B·c / (2πy)`, `v = (1 + a)·V` the axial velocity at the disk and
//! `V_tg` the undisturbed tangential velocity. The mass flow through the
//! annulus is `|v|`, so a flow reversed through the disk is balanced with the
//! right sign.
//!
//! In forward flight the quadratic in `a` is solved exactly at every step.
//! The hover balance has an infinite slope at zero load, so it is updated with
//! a Newton step on `v·|v| − L(v)` instead of the signed square root. An annulus
//! without axial through-flow carries no angular momentum and gets `b = 0`.

use crate::common::{element_geometry, fetch_coeffs, force_coeffs};
use crate::config::{LossType, ModelConfig, SolveReport, SolverKind};
use crate::error::SolverResult;
use crate::loss::{loss_factor_at, loss_split};
use rb_airfoil::AirfoilCoeffProvider;
use rb_core::numeric::{is_converged, relax};
use rb_rotor::{ElementState, RotorOperatingState};
use tracing::{debug, warn};

const NAME: &str = "indfact";

/// Seed of the axial induction factor in forward flight
const A_SEED: f64 = 0.1;
/// Seed of the axial velocity in hover [m/s]
const HOVER_SEED: f64 = 1.0;
/// Seed of the tangential induction factor
const B_SEED: f64 = 0.01;

/// Through-flow below this fraction of the undisturbed speed carries no swirl
pub(crate) const SWIRL_MIN_FLOW: f64 = 1e-3;
/// Floor of the convergence reference, as a fraction of the undisturbed speed
/// (velocities) or absolute (induction factors)
pub(crate) const REF_FLOOR: f64 = 1e-2;
/// Forward-difference step of the load slope, as a fraction of the undisturbed speed
pub(crate) const SLOPE_STEP: f64 = 1e-6;

/// Axial velocity at the disk from the momentum balance.
///
/// `load` is `W²·s·cx / (4·K_T)`. In hover this is the signed root of
/// `v·|v| = load`; otherwise `|v|·(v − V) = load` is solved on the branch that
/// keeps `v` on the side of `V`. A discriminant below zero (the momentum
/// balance has no solution there) is clamped.
pub fn axial_velocity(load: f64, airspeed: f64) -> f64 {
    if airspeed == 0.0 {
        load.signum() * load.abs().sqrt()
    } else {
        let dummy = airspeed.signum() * load / (airspeed * airspeed);
        let a = 0.5 * (-1.0 + (1.0 + 4.0 * dummy).max(0.0).sqrt());
        (1.0 + a) * airspeed
    }
}

/// One Newton step on the hover balance `v·|v| − L(v) = 0`.
///
/// `load_slope` is dL/dv at `v`. Where the residual does not increase with
/// `v` (stalled sections) the direct signed root is taken instead.
pub fn hover_newton_step(v: f64, load: f64, load_slope: f64) -> f64 {
    let slope = 2.0 * v.abs() - load_slope;
    if slope > 0.0 {
        v - (v * v.abs() - load) / slope
    } else {
        axial_velocity(load, 0.0)
    }
}

/// Tangential induction factor; zero without axial through-flow.
pub fn tangential_factor(torque_load: f64, v: f64, tangential_inflow: f64, speed: f64) -> f64 {
    if v.abs() < SWIRL_MIN_FLOW * speed {
        0.0
    } else {
        torque_load / (v.abs() * tangential_inflow)
    }
}

/// One blade annulus at fixed swirl.
struct Annulus {
    n_blades: usize,
    loss: LossType,
    r: f64,
    r0: f64,
    s: f64,
    /// Tangential velocity at the disk [m/s]
    v_tg: f64,
}

impl Annulus {
    /// Momentum loads `W²·s·cx/(4·K_T)` and `W²·s·cy/(4·K_P)` at axial velocity `v`.
    fn loads(
        &self,
        e: &mut ElementState,
        provider: &dyn AirfoilCoeffProvider,
        index: usize,
        v: f64,
    ) -> SolverResult<(f64, f64)> {
        let phi = v.atan2(self.v_tg);
        let alpha = e.true_pitch - phi;
        let coeffs = fetch_coeffs(e, provider, alpha, NAME, index)?;
        let f = loss_factor_at(self.n_blades, self.r, self.r0, phi, self.loss);
        let (k_t, k_p) = loss_split(f, phi);
        let (cx, cy) = force_coeffs(coeffs, phi);
        let w2 = v * v + self.v_tg * self.v_tg;
        Ok((w2 * self.s * cx / (4.0 * k_t), w2 * self.s * cy / (4.0 * k_p)))
    }
}

/// Relative-change reference floored at `floor`.
pub(crate) fn floored_reference(values: &[f64], floor: impl Fn(usize) -> f64) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| v.abs().max(floor(i)))
        .collect()
}

pub fn solve(
    state: &mut RotorOperatingState,
    config: &ModelConfig,
    provider: &dyn AirfoilCoeffProvider,
) -> SolverResult<SolveReport> {
    let geom = element_geometry(state, config.solidity);
    let n_blades = state.rotor.n_blades;
    let r0 = state.rotor.root_cutout() / state.rotor.radius();
    let n = geom.len();

    let airspeed: Vec<f64> = state.elements.iter().map(|e| e.axial_inflow).collect();
    let v_tg0: Vec<f64> = state.elements.iter().map(|e| e.tangential_inflow).collect();
    // Undisturbed relative speed, the scale of the convergence test
    let speed: Vec<f64> = airspeed.iter().zip(&v_tg0).map(|(v, t)| v.hypot(*t)).collect();
    // s = B·c / (2πy) = σ / (2r)
    let s: Vec<f64> = geom.iter().map(|g| g.sigma / (2.0 * g.r)).collect();

    let mut v_ax: Vec<f64> = airspeed
        .iter()
        .map(|&v| if v == 0.0 { HOVER_SEED } else { (1.0 + A_SEED) * v })
        .collect();
    let mut b = vec![B_SEED; n];

    let mut converged = false;
    let mut iterations = 0;
    for iter in 1..=config.max_iter {
        iterations = iter;
        let mut v_next = v_ax.clone();
        let mut b_next = b.clone();

        for i in 0..n {
            let annulus = Annulus {
                n_blades,
                loss: config.loss,
                r: geom[i].r,
                r0,
                s: s[i],
                v_tg: v_tg0[i] * (1.0 - b[i]),
            };
            let e = &mut state.elements[i];
            let (thrust_load, torque_load) = annulus.loads(e, provider, i, v_ax[i])?;

            let v_new = if airspeed[i] == 0.0 {
                let h = SLOPE_STEP * speed[i];
                let (ahead, _) = annulus.loads(e, provider, i, v_ax[i] + h)?;
                hover_newton_step(v_ax[i], thrust_load, (ahead - thrust_load) / h)
            } else {
                axial_velocity(thrust_load, airspeed[i])
            };
            let b_new = tangential_factor(torque_load, v_new, v_tg0[i], speed[i]);

            v_next[i] = relax(v_ax[i], v_new, config.relax);
            b_next[i] = relax(b[i], b_new, config.relax);
        }

        let v_ref = floored_reference(&v_ax, |i| REF_FLOOR * speed[i]);
        let b_ref = floored_reference(&b, |_| REF_FLOOR);
        let done = is_converged(&v_next, &v_ax, config.convergence_tol, Some(&v_ref))
            && is_converged(&b_next, &b, config.convergence_tol, Some(&b_ref));
        v_ax = v_next;
        b = b_next;
        if done {
            converged = true;
            break;
        }
    }

    for (i, e) in state.elements.iter_mut().enumerate() {
        let phi = v_ax[i].atan2(v_tg0[i] * (1.0 - b[i]));
        let alpha = e.true_pitch - phi;
        e.set_inflow_angle(phi);
        fetch_coeffs(e, provider, alpha, NAME, i)?;
        e.set_induced_velocities(v_ax[i] - airspeed[i], b[i] * v_tg0[i]);
    }

    if converged {
        debug!(solver = NAME, iterations, "converged");
        Ok(SolveReport::converged(SolverKind::IndFact, iterations))
    } else {
        warn!(
            solver = NAME,
            max_iter = config.max_iter,
            "iteration cap reached without convergence, keeping last iterate"
        );
        Ok(SolveReport::capped(SolverKind::IndFact, iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_branch_takes_signed_root() {
        assert!((axial_velocity(4.0, 0.0) - 2.0).abs() < 1e-15);
        assert!((axial_velocity(-4.0, 0.0) + 2.0).abs() < 1e-15);
    }

    #[test]
    fn forward_flight_solves_induction_quadratic() {
        let (load, v) = (30.0, 10.0);
        let v_ax = axial_velocity(load, v);
        let a = v_ax / v - 1.0;
        assert!((a * (1.0 + a) - load / (v * v)).abs() < 1e-12);
    }

    #[test]
    fn descent_balance_uses_the_mass_flow_magnitude() {
        let (load, v) = (12.0, -10.0);
        let v_ax = axial_velocity(load, v);
        // Upward flow decelerated by positive loading
        assert!(v_ax < 0.0 && v_ax > v);
        assert!((v_ax.abs() * (v_ax - v) - load).abs() < 1e-12);
    }

    #[test]
    fn newton_step_is_bounded_at_zero_load() {
        // L(v) = -k·v has its only root at zero; the signed root would jump to ±sqrt(k|v|)
        let k = 2.6;
        let mut v = 1.0;
        for _ in 0..12 {
            v = hover_newton_step(v, -k * v, -k);
        }
        assert!(v.abs() < 1e-12, "{v}");
        let direct = axial_velocity(-k * 1e-4, 0.0);
        assert!(direct.abs() > 1e-2);
    }

    #[test]
    fn newton_step_hits_a_linear_root() {
        // v·|v| = 4 − 0.5·(v − 2) has its root at v = 2
        let next = hover_newton_step(2.5, 4.0 - 0.5 * 0.5, -0.5);
        assert!((next - 2.0).abs() < 0.1);
        assert!((next - 2.0).abs() < (2.5f64 - 2.0).abs());
    }

    #[test]
    fn stalled_slope_falls_back_to_signed_root() {
        assert_eq!(hover_newton_step(1.0, 4.0, 5.0), 2.0);
    }

    #[test]
    fn swirl_vanishes_without_through_flow() {
        assert_eq!(tangential_factor(0.3, 1e-9, 26.0, 26.0), 0.0);
        let up = tangential_factor(0.3, -2.0, 26.0, 26.0);
        let down = tangential_factor(0.3, 2.0, 26.0, 26.0);
        assert!(up > 0.0);
        assert_eq!(up, down);
    }

    #[test]
    fn negative_discriminant_is_clamped() {
        // a(1+a) has a minimum of -1/4
        let v_ax = axial_velocity(-50.0, 10.0);
        assert!((v_ax - 5.0).abs() < 1e-12);
    }
}
