//! End-to-end solver scenarios on a small two-bladed rotor.

use rb_airfoil::{Extrapolation, LinearAirfoils, Polar, PolarCurve, PolarTable};
use rb_core::FluidProperties;
use rb_core::units::{deg, m, mps, rpm};
use rb_rotor::{Blade, Discretization, GuideStations, OperatingPoint, Rotor, RotorOperatingState};
use rb_solver::{
    Bracket, LossType, ModelConfig, SolverError, SolverKind, bemt, select_bracket, solve,
};
use std::sync::Arc;

/// R = 1 m, cutout 0.1 m, chord 0.1 m, no twist, two blades.
fn rotor(position: f64) -> Arc<Rotor> {
    let blade = Blade::new(
        GuideStations::rectangular(0.1, 1.0, 0.1, 0.0),
        Discretization {
            n_elem: 30,
            ..Default::default()
        },
    )
    .unwrap();
    Arc::new(Rotor::new("test", 2, blade).unwrap().with_position(position))
}

fn state_at(rotor: Arc<Rotor>, speed: f64, rpm_value: f64, collective_deg: f64) -> RotorOperatingState {
    let op = OperatingPoint::new(m(0.0), mps(speed), rpm(rpm_value), deg(collective_deg)).unwrap();
    RotorOperatingState::new(rotor, op, FluidProperties::fixed(1.225, 1.46e-5).unwrap()).unwrap()
}

fn config(solver: SolverKind) -> ModelConfig {
    ModelConfig {
        solver,
        loss: LossType::None,
        convergence_tol: 1e-4,
        max_iter: 500,
        relax: 0.1,
        ..Default::default()
    }
}

fn thin() -> LinearAirfoils {
    LinearAirfoils::thin(0.01).unwrap()
}

#[test]
fn hover_indfact_converges_with_positive_thrust() {
    let mut state = state_at(rotor(0.0), 0.0, 500.0, 8.0);
    let report = solve(&mut state, &config(SolverKind::IndFact), &thin()).unwrap();
    assert!(report.converged, "{:?}", report.warnings);
    assert!(report.iterations < 500);

    let perf = state.performance.unwrap();
    assert!(perf.thrust > 0.0);
    assert!(perf.power > 0.0);
    assert!(perf.figure_of_merit > 0.0 && perf.figure_of_merit < 1.0);
    // Static rotor: T·V/P is zero, surfaced as-is
    assert_eq!(perf.efficiency, 0.0);
    for e in &state.elements {
        assert!(e.induced_vel_axial() > 0.0);
        assert!(e.inflow_angle() > 0.0);
    }
}

/// Thrust of every listed solver at one operating point; each must converge.
fn thrust_by_solver(solvers: &[SolverKind], speed: f64, collective_deg: f64) -> Vec<f64> {
    solvers
        .iter()
        .map(|&solver| {
            let mut state = state_at(rotor(0.0), speed, 500.0, collective_deg);
            let report = solve(&mut state, &config(solver), &thin()).unwrap();
            assert!(report.converged, "{solver}: {:?}", report.warnings);
            assert!(report.iterations < 500, "{solver}");
            state.performance.unwrap().thrust
        })
        .collect()
}

fn assert_agree(thrust: &[f64], rel_tol: f64) {
    for t in &thrust[1..] {
        assert!((t - thrust[0]).abs() / thrust[0].abs() < rel_tol, "{thrust:?}");
    }
}

#[test]
fn hover_indfact_at_zero_collective_converges_to_zero_thrust() {
    let mut state = state_at(rotor(0.0), 0.0, 500.0, 0.0);
    let report = solve(&mut state, &config(SolverKind::IndFact), &thin()).unwrap();
    assert!(report.converged, "{:?}", report.warnings);
    assert!(report.iterations < 500);

    let perf = state.performance.unwrap();
    assert!(perf.thrust.abs() < 0.05, "thrust = {}", perf.thrust);
    // Profile drag still costs power
    assert!(perf.power > 0.0);
    for e in &state.elements {
        assert!(e.disk_axial_velocity().abs() < 1e-2);
    }
}

#[test]
fn zero_collective_hover_is_unloaded_for_every_solver() {
    let momentum = [SolverKind::IndFact, SolverKind::IndVel, SolverKind::Stahlhut];
    for t in thrust_by_solver(&momentum, 0.0, 0.0) {
        assert!(t.abs() < 0.05, "thrust = {t}");
    }
    let leishman = thrust_by_solver(&[SolverKind::Leishman], 0.0, 0.0);
    assert!(leishman[0].abs() < 1e-9);
}

#[test]
fn momentum_formulations_agree_at_negative_loading() {
    let thrust = thrust_by_solver(
        &[SolverKind::IndFact, SolverKind::IndVel, SolverKind::Stahlhut],
        0.0,
        -4.0,
    );
    assert!(thrust[0] < 0.0);
    assert_agree(&thrust, 0.02);
}

#[test]
fn momentum_formulations_agree_in_descent() {
    let thrust = thrust_by_solver(
        &[SolverKind::IndFact, SolverKind::IndVel, SolverKind::Stahlhut],
        -10.0,
        0.0,
    );
    // Descending flow loads a flat-pitch rotor upward
    assert!(thrust[0] > 0.0);
    assert_agree(&thrust, 0.01);
}

#[test]
fn descent_stahlhut_has_negative_inflow_angles() {
    let mut state = state_at(rotor(0.0), -10.0, 500.0, 0.0);
    for e in &state.elements {
        assert_eq!(
            select_bracket(e.axial_inflow, || unreachable!()),
            Bracket::DESCENT
        );
    }
    let report = solve(&mut state, &config(SolverKind::Stahlhut), &thin()).unwrap();
    assert!(report.converged);
    for e in &state.elements {
        assert!(e.inflow_angle() < 0.0, "phi = {}", e.inflow_angle());
        assert!(e.inflow_angle() >= -std::f64::consts::FRAC_PI_2);
    }
    assert!(state.performance.unwrap().thrust.is_finite());
}

#[test]
fn momentum_formulations_agree_in_hover() {
    let thrust = thrust_by_solver(
        &[SolverKind::IndFact, SolverKind::IndVel, SolverKind::Stahlhut],
        0.0,
        8.0,
    );
    assert!(thrust[0] > 0.0);
    assert_agree(&thrust, 0.02);

    // Closed-form small-angle inflow
    let leishman = thrust_by_solver(&[SolverKind::Leishman], 0.0, 8.0);
    assert_agree(&[thrust[0], leishman[0]], 0.03);
}

#[test]
fn momentum_formulations_agree_in_climb() {
    let thrust = thrust_by_solver(
        &[SolverKind::IndFact, SolverKind::IndVel, SolverKind::Stahlhut],
        3.0,
        10.0,
    );
    assert_agree(&thrust, 0.01);
}

#[test]
fn leishman_with_losses_converges_and_has_no_swirl() {
    let mut cfg = config(SolverKind::Leishman);
    cfg.loss = LossType::All;
    let mut state = state_at(rotor(0.0), 2.0, 500.0, 10.0);
    let report = solve(&mut state, &cfg, &thin()).unwrap();
    assert!(report.converged);
    assert!(state.performance.unwrap().thrust > 0.0);
    assert!(state.elements.iter().all(|e| e.induced_vel_tangential() == 0.0));
}

#[test]
fn tip_loss_reduces_thrust() {
    let mut plain = state_at(rotor(0.0), 0.0, 500.0, 8.0);
    solve(&mut plain, &config(SolverKind::Stahlhut), &thin()).unwrap();

    let mut cfg = config(SolverKind::Stahlhut);
    cfg.loss = LossType::Tip;
    let mut lossy = state_at(rotor(0.0), 0.0, 500.0, 8.0);
    solve(&mut lossy, &cfg, &thin()).unwrap();

    assert!(lossy.performance.unwrap().thrust < plain.performance.unwrap().thrust);
}

#[test]
fn energy_identity_holds_for_every_solver() {
    for solver in SolverKind::ALL {
        let mut state = state_at(rotor(0.0), 3.0, 500.0, 10.0);
        solve(&mut state, &config(solver), &thin()).unwrap();
        for e in &state.elements {
            let f = e.forces().unwrap();
            assert_eq!(f.d_power, f.d_power_induced + f.d_power_profile);
        }
        let perf = state.performance.unwrap();
        assert_eq!(perf.power, perf.power_induced + perf.power_profile);
    }
}

#[test]
fn missing_aero_data_is_fatal() {
    let alpha: Vec<f64> = [-2.0f64, 0.0, 2.0].iter().map(|d| d.to_radians()).collect();
    let cl: Vec<f64> = alpha.iter().map(|a| 6.0 * a).collect();
    let curve = PolarCurve::new(1e5, alpha, cl, vec![0.01; 3]).unwrap();
    let table = PolarTable::new(
        vec![Polar::new("narrow", vec![curve]).unwrap()],
        Extrapolation::Disabled,
    )
    .unwrap();

    for solver in [SolverKind::IndFact, SolverKind::Stahlhut] {
        let mut state = state_at(rotor(0.0), 0.0, 500.0, 8.0);
        let err = solve(&mut state, &config(solver), &table).unwrap_err();
        assert!(
            matches!(err, SolverError::InvalidAeroData { .. }),
            "{solver}: {err}"
        );
        assert!(err.to_string().contains("no valid aerodynamic data"));
    }
}

#[test]
fn invalid_config_is_rejected_before_solving() {
    let mut state = state_at(rotor(0.0), 0.0, 500.0, 8.0);
    let mut cfg = config(SolverKind::IndFact);
    cfg.relax = 0.0;
    assert!(matches!(
        solve(&mut state, &cfg, &thin()),
        Err(SolverError::InvalidConfig { .. })
    ));
    assert!(state.performance.is_none());
}

#[test]
fn coaxial_stack_lower_rotor_sees_upper_slipstream() {
    let mut states = vec![
        state_at(rotor(0.0), 0.0, 500.0, 8.0),
        state_at(rotor(0.3), 0.0, 500.0, 8.0),
    ];
    let reports = bemt(&mut states, &config(SolverKind::Stahlhut), &thin(), true).unwrap();
    assert_eq!(reports.len(), 2);

    assert!(states[1].elements[0].axial_inflow > 0.0);
    let upper = states[0].performance.unwrap().thrust;
    let lower = states[1].performance.unwrap().thrust;
    assert!(lower < upper, "upper={upper} lower={lower}");
}
