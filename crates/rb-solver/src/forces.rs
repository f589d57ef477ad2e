//! Elemental loads from a solved flow state.

use crate::error::{SolverError, SolverResult};
use rb_rotor::{ElementForces, RotorOperatingState};

/// Compute and store the loads of every element (all blades included).
///
/// Uses the inflow angle and the cl/cd stored by the solver at its final α.
pub fn calc_forces(state: &mut RotorOperatingState) -> SolverResult<()> {
    let rho = state.fluid.density;
    let omega = state.op.omega;
    let b = state.rotor.n_blades as f64;
    let rotor = state.rotor.clone();

    for (i, (e, geo)) in state
        .elements
        .iter_mut()
        .zip(rotor.blade().elements())
        .enumerate()
    {
        let phi = e.inflow_angle();
        if !phi.is_finite() || e.cl().is_nan() || e.cd().is_nan() {
            return Err(SolverError::InvalidConfig {
                what: format!("element {i} has not been solved"),
            });
        }

        let w = e.relative_velocity();
        let q = 0.5 * rho * w * w * geo.chord * geo.span;
        let d_lift = q * e.cl();
        let d_drag = q * e.cd();
        let (sin, cos) = phi.sin_cos();
        let y = geo.absolute_radius;

        let d_power_induced = b * d_lift * sin * y * omega;
        let d_power_profile = b * d_drag * cos * y * omega;
        e.set_forces(ElementForces {
            d_lift,
            d_drag,
            d_thrust: b * (d_lift * cos - d_drag * sin),
            d_torque: b * (d_lift * sin + d_drag * cos) * y,
            d_power_induced,
            d_power_profile,
            d_power: d_power_induced + d_power_profile,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_airfoil::LinearAirfoils;
    use rb_core::FluidProperties;
    use rb_core::units::{deg, m, mps, rpm};
    use rb_rotor::{Blade, Discretization, GuideStations, OperatingPoint, Rotor};
    use std::sync::Arc;

    fn solved_state() -> RotorOperatingState {
        let blade = Blade::new(
            GuideStations::rectangular(0.1, 1.0, 0.1, 0.0),
            Discretization {
                n_elem: 6,
                ..Default::default()
            },
        )
        .unwrap();
        let rotor = Arc::new(Rotor::new("r", 3, blade).unwrap());
        let op = OperatingPoint::new(m(0.0), mps(5.0), rpm(800.0), deg(30.0)).unwrap();
        let mut state =
            RotorOperatingState::new(rotor, op, FluidProperties::fixed(1.2, 1.5e-5).unwrap())
                .unwrap();
        let af = LinearAirfoils::thin(0.012).unwrap();
        for (k, e) in state.elements.iter_mut().enumerate() {
            e.set_induced_velocities(1.0 + 0.1 * k as f64, 0.2);
            let phi = e.disk_axial_velocity().atan2(e.disk_tangential_velocity());
            e.set_inflow_angle(phi);
            e.set_angle_of_attack(&af, e.true_pitch - phi).unwrap();
        }
        state
    }

    #[test]
    fn power_is_sum_of_induced_and_profile() {
        let mut state = solved_state();
        calc_forces(&mut state).unwrap();
        for e in &state.elements {
            let f = e.forces().unwrap();
            assert_eq!(f.d_power, f.d_power_induced + f.d_power_profile);
        }
    }

    #[test]
    fn torque_times_omega_is_power() {
        let mut state = solved_state();
        let omega = state.op.omega;
        calc_forces(&mut state).unwrap();
        for e in &state.elements {
            let f = e.forces().unwrap();
            assert!((f.d_torque * omega - f.d_power).abs() < 1e-9 * f.d_power.abs().max(1.0));
            assert!(f.d_thrust > 0.0);
        }
    }

    #[test]
    fn unsolved_state_is_rejected() {
        let mut state = solved_state();
        state.reset();
        assert!(calc_forces(&mut state).is_err());
    }
}
