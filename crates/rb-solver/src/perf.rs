//! Spanwise integration of elemental loads into rotor totals.

use crate::config::Quadrature;
use crate::error::{SolverError, SolverResult};
use rb_core::numeric::{interp_linear, trapz};
use rb_rotor::{ElementForces, RotorOperatingState, RotorPerformance};

/// Integrate one elemental quantity over the span `[root, tip]`.
///
/// Trapezoidal quadrature works on the load per unit span at element centres.
/// The end values at `root` and `tip` are extrapolated linearly from the two
/// nearest centres, or held when the blade has a single element.
fn integrate(y: &[f64], dy: &[f64], d: &[f64], quadrature: Quadrature, span: (f64, f64)) -> f64 {
    match quadrature {
        Quadrature::Rectangular => d.iter().sum(),
        Quadrature::Trapezoidal => {
            let n = y.len();
            if n == 0 {
                return 0.0;
            }
            let per_span: Vec<f64> = d.iter().zip(dy).map(|(v, w)| v / w).collect();
            let (root, tip) = span;
            let (root_load, tip_load) = if n == 1 {
                (per_span[0], per_span[0])
            } else {
                (
                    interp_linear(&y[..2], &per_span[..2], root, true),
                    interp_linear(&y[n - 2..], &per_span[n - 2..], tip, true),
                )
            };

            let mut xs = Vec::with_capacity(n + 2);
            xs.push(root);
            xs.extend_from_slice(y);
            xs.push(tip);
            let mut loads = Vec::with_capacity(n + 2);
            loads.push(root_load);
            loads.extend(per_span);
            loads.push(tip_load);
            trapz(&xs, &loads)
        }
    }
}

/// Compute rotor totals from the elemental loads and store them.
pub fn calc_perf(
    state: &mut RotorOperatingState,
    quadrature: Quadrature,
) -> SolverResult<RotorPerformance> {
    let forces: Vec<ElementForces> = state
        .elements
        .iter()
        .enumerate()
        .map(|(i, e)| {
            e.forces().copied().ok_or_else(|| SolverError::InvalidConfig {
                what: format!("element {i} has no loads, run force integration first"),
            })
        })
        .collect::<SolverResult<_>>()?;

    let blade = state.rotor.blade();
    let span = (state.rotor.root_cutout(), state.rotor.radius());
    let y: Vec<f64> = blade.elements().iter().map(|e| e.absolute_radius).collect();
    let dy: Vec<f64> = blade.elements().iter().map(|e| e.span).collect();
    let total = |pick: fn(&ElementForces) -> f64| {
        let d: Vec<f64> = forces.iter().map(pick).collect();
        integrate(&y, &dy, &d, quadrature, span)
    };

    let thrust = total(|f| f.d_thrust);
    let torque = total(|f| f.d_torque);
    let power_induced = total(|f| f.d_power_induced);
    let power_profile = total(|f| f.d_power_profile);
    let power = power_induced + power_profile;

    let rho = state.fluid.density;
    let area = state.rotor.disk_area();
    let perf = RotorPerformance {
        thrust,
        torque,
        power,
        power_induced,
        power_profile,
        efficiency: thrust * state.op.speed / power,
        figure_of_merit: thrust.abs().powf(1.5) / (power * (2.0 * rho * area).sqrt()),
    };
    state.performance = Some(perf);
    Ok(perf)
}
