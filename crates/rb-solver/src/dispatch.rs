//! Solver dispatch: one rotor, or a coaxial stack solved front to back.

use crate::config::{ModelConfig, SolveReport, SolverKind};
use crate::error::SolverResult;
use crate::forces::calc_forces;
use crate::perf::calc_perf;
use crate::wake::wake_contraction;
use crate::{indfact, indvel, leishman, stahlhut};
use rb_airfoil::AirfoilCoeffProvider;
use rb_rotor::RotorOperatingState;
use tracing::debug;

/// Solve one rotor in place and integrate its performance.
///
/// Previous solver output on `state` is discarded; its upstream velocity
/// field is kept.
pub fn solve(
    state: &mut RotorOperatingState,
    config: &ModelConfig,
    provider: &dyn AirfoilCoeffProvider,
) -> SolverResult<SolveReport> {
    config.validate()?;
    state.rotor.check_airfoils(provider.n_airfoils())?;
    state.reset();

    let report = match config.solver {
        SolverKind::Leishman => leishman::solve(state, config, provider)?,
        SolverKind::IndFact => indfact::solve(state, config, provider)?,
        SolverKind::IndVel => indvel::solve(state, config, provider)?,
        SolverKind::Stahlhut => stahlhut::solve(state, config, provider)?,
    };

    calc_forces(state)?;
    let perf = calc_perf(state, config.integration)?;
    debug!(
        rotor = %state.rotor.name,
        solver = %config.solver,
        thrust = perf.thrust,
        power = perf.power,
        converged = report.converged,
        "rotor solved"
    );
    Ok(report)
}

/// Solve a stack of rotors in order, upstream first.
///
/// With `wake` set, every rotor after the first receives the contracted
/// slipstream of the rotor just ahead of it; otherwise all rotors are
/// solved in isolation.
pub fn bemt(
    states: &mut [RotorOperatingState],
    config: &ModelConfig,
    provider: &dyn AirfoilCoeffProvider,
    wake: bool,
) -> SolverResult<Vec<SolveReport>> {
    let mut reports = Vec::with_capacity(states.len());
    for k in 0..states.len() {
        if wake && k > 0 {
            let (ahead, rest) = states.split_at_mut(k);
            let field = wake_contraction(&ahead[k - 1], &rest[0])?;
            rest[0].set_upstream_velocity(&field.axial, &field.tangential)?;
        }
        reports.push(solve(&mut states[k], config, provider)?);
    }
    Ok(reports)
}
