//! Relaxed fixed point on the far-wake velocities (turbine formulation).
//!
//! The unknowns are the axial (`vw`) and tangential (`uw`) slipstream
//! velocities. Disk velocities are the averages of upstream and slipstream
//! values and the annulus mass flow is `ṁ = ρ·2πy·dy·|v_ax|`:
//!
//! ```text
//! ṁ·(vw − V) = q·cx / K_T
//! ṁ·uw       = q·cy / K_P
//! ```
//!
//! The axial balance is updated with a Newton step on its residual, which
//! stays well conditioned where `ṁ` vanishes. An annulus without axial
//! through-flow carries no swirl.

use crate::common::{ElementGeom, element_geometry, fetch_coeffs, force_coeffs};
use crate::config::{LossType, ModelConfig, SolveReport, SolverKind};
use crate::error::SolverResult;
use crate::indfact::{REF_FLOOR, SLOPE_STEP, SWIRL_MIN_FLOW, floored_reference};
use crate::loss::{loss_factor_at, loss_split};
use rb_airfoil::AirfoilCoeffProvider;
use rb_core::numeric::{is_converged, relax};
use rb_rotor::{ElementState, RotorOperatingState};
use std::f64::consts::PI;
use tracing::{debug, warn};

const NAME: &str = "indvel";

/// Initial axial slipstream velocity above the airspeed [m/s]
const VW_SEED_OFFSET: f64 = 2.0;

/// Momentum and blade-element terms of one annulus at a trial `vw`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Balance {
    /// |ṁ| [kg/s]
    pub mass_flow: f64,
    /// Axial blade load over K_T [N]
    pub thrust: f64,
    /// Tangential blade load over K_P [N]
    pub torque_force: f64,
}

impl Balance {
    /// Axial momentum residual `ṁ·(vw − V) − T`.
    pub fn residual(&self, vw: f64, airspeed: f64) -> f64 {
        self.mass_flow * (vw - airspeed) - self.thrust
    }
}

/// Next slipstream velocity from the residual at `vw` and at `vw + h`.
///
/// Takes the Newton step when the residual increases with `vw`, otherwise the
/// direct momentum update `V + T/ṁ`; with no mass flow `vw` is kept.
pub fn axial_update(vw: f64, airspeed: f64, here: Balance, ahead: Balance, h: f64) -> f64 {
    let r = here.residual(vw, airspeed);
    let slope = (ahead.residual(vw + h, airspeed) - r) / h;
    if slope > 0.0 {
        vw - r / slope
    } else if here.mass_flow > 0.0 {
        airspeed + here.thrust / here.mass_flow
    } else {
        vw
    }
}

struct Annulus<'a> {
    geom: &'a ElementGeom,
    n_blades: usize,
    loss: LossType,
    r0: f64,
    rho: f64,
    airspeed: f64,
    /// Tangential velocity at the disk [m/s]
    v_tg: f64,
}

impl Annulus<'_> {
    fn mass_flow(&self, v_ax: f64) -> f64 {
        self.rho * 2.0 * PI * self.geom.y * self.geom.dy * v_ax.abs()
    }

    fn balance(
        &self,
        e: &mut ElementState,
        provider: &dyn AirfoilCoeffProvider,
        index: usize,
        vw: f64,
    ) -> SolverResult<Balance> {
        let v_ax = 0.5 * (self.airspeed + vw);
        let phi = v_ax.atan2(self.v_tg);
        let alpha = e.true_pitch - phi;
        let coeffs = fetch_coeffs(e, provider, alpha, NAME, index)?;

        let f = loss_factor_at(self.n_blades, self.geom.r, self.r0, phi, self.loss);
        let (k_t, k_p) = loss_split(f, phi);
        let (cx, cy) = force_coeffs(coeffs, phi);
        let w2 = v_ax * v_ax + self.v_tg * self.v_tg;
        let q = 0.5 * self.rho * w2 * self.n_blades as f64 * self.geom.chord * self.geom.dy;
        Ok(Balance {
            mass_flow: self.mass_flow(v_ax),
            thrust: q * cx / k_t,
            torque_force: q * cy / k_p,
        })
    }
}

pub fn solve(
    state: &mut RotorOperatingState,
    config: &ModelConfig,
    provider: &dyn AirfoilCoeffProvider,
) -> SolverResult<SolveReport> {
    let geom = element_geometry(state, config.solidity);
    let r0 = state.rotor.root_cutout() / state.rotor.radius();
    let rho = state.fluid.density;
    let n = geom.len();

    let airspeed: Vec<f64> = state.elements.iter().map(|e| e.axial_inflow).collect();
    let v_tg0: Vec<f64> = state.elements.iter().map(|e| e.tangential_inflow).collect();
    let speed: Vec<f64> = airspeed.iter().zip(&v_tg0).map(|(v, t)| v.hypot(*t)).collect();

    let mut vw: Vec<f64> = airspeed.iter().map(|v| v + VW_SEED_OFFSET).collect();
    let mut uw = vec![0.0; n];

    let mut converged = false;
    let mut iterations = 0;
    for iter in 1..=config.max_iter {
        iterations = iter;
        let mut vw_next = vw.clone();
        let mut uw_next = uw.clone();

        for i in 0..n {
            let annulus = Annulus {
                geom: &geom[i],
                n_blades: state.rotor.n_blades,
                loss: config.loss,
                r0,
                rho,
                airspeed: airspeed[i],
                v_tg: v_tg0[i] - 0.5 * uw[i],
            };
            let e = &mut state.elements[i];
            let h = SLOPE_STEP * speed[i];
            let here = annulus.balance(e, provider, i, vw[i])?;
            let ahead = annulus.balance(e, provider, i, vw[i] + h)?;

            let vw_new = axial_update(vw[i], airspeed[i], here, ahead, h);
            let v_ax_new = 0.5 * (airspeed[i] + vw_new);
            let uw_new = if v_ax_new.abs() < SWIRL_MIN_FLOW * speed[i] {
                0.0
            } else {
                here.torque_force / annulus.mass_flow(v_ax_new)
            };

            vw_next[i] = relax(vw[i], vw_new, config.relax);
            uw_next[i] = relax(uw[i], uw_new, config.relax);
        }

        let vw_ref = floored_reference(&vw, |i| REF_FLOOR * speed[i]);
        let uw_ref = floored_reference(&uw, |i| REF_FLOOR * speed[i]);
        let done = is_converged(&vw_next, &vw, config.convergence_tol, Some(&vw_ref))
            && is_converged(&uw_next, &uw, config.convergence_tol, Some(&uw_ref));
        vw = vw_next;
        uw = uw_next;
        if done {
            converged = true;
            break;
        }
    }

    for (i, e) in state.elements.iter_mut().enumerate() {
        let ind_ax = 0.5 * (vw[i] - airspeed[i]);
        let ind_tg = 0.5 * uw[i];
        let phi = (airspeed[i] + ind_ax).atan2(v_tg0[i] - ind_tg);
        let alpha = e.true_pitch - phi;
        e.set_inflow_angle(phi);
        fetch_coeffs(e, provider, alpha, NAME, i)?;
        e.set_induced_velocities(ind_ax, ind_tg);
    }

    if converged {
        debug!(solver = NAME, iterations, "converged");
        Ok(SolveReport::converged(SolverKind::IndVel, iterations))
    } else {
        warn!(
            solver = NAME,
            max_iter = config.max_iter,
            "iteration cap reached without convergence, keeping last iterate"
        );
        Ok(SolveReport::capped(SolverKind::IndVel, iterations))
    }
}
