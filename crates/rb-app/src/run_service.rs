//! Operating-point sweep execution.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use rb_airfoil::AirfoilCoeffProvider;
use rb_project::schema::Project;
use rb_rotor::{OperatingPoint, RotorOperatingState};
use rb_solver::{SolveReport, SolverError, bemt, coefficients};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::results::{
    Diagnostic, ElementRecord, PointResult, RotorResult, RunManifest, RunResults, finite,
};
use crate::runtime_build::{ProjectRuntime, build_runtime, fluid_at};
use crate::store::compute_run_id;

pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options that change what is recorded, not what is solved.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Keep per-element distributions regardless of the project output setting
    pub elements: bool,
}

struct PointOutcome {
    result: PointResult,
    diagnostic: Option<Diagnostic>,
}

/// Solve every operating point of `project`.
///
/// Points are independent and run in parallel; the rotors of one point are
/// solved in order so that wake contraction can feed the stack. A point whose
/// solve fails is recorded with its error and the sweep continues.
pub fn run_project(project: &Project, options: RunOptions) -> AppResult<RunResults> {
    rb_project::validate_project(project)?;
    let runtime = build_runtime(project)?;
    let keep_elements = options.elements || project.output.elements;

    let started = Instant::now();
    let outcomes: Vec<PointOutcome> = runtime
        .points
        .par_iter()
        .enumerate()
        .map(|(index, op)| solve_point(&runtime, index, *op, keep_elements))
        .collect::<AppResult<_>>()?;

    let n_failed = outcomes.iter().filter(|o| o.result.error.is_some()).count();
    info!(
        project = %project.name,
        points = outcomes.len(),
        failed = n_failed,
        elapsed_s = started.elapsed().as_secs_f64(),
        "sweep finished"
    );

    let mut points = Vec::with_capacity(outcomes.len());
    let mut diagnostics = Vec::new();
    for outcome in outcomes {
        points.push(outcome.result);
        diagnostics.extend(outcome.diagnostic);
    }

    Ok(RunResults {
        manifest: RunManifest {
            run_id: compute_run_id(project, SOLVER_VERSION),
            project: project.name.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            solver: runtime.config.solver.name().to_string(),
            loss: runtime.config.loss.name().to_string(),
            solver_version: SOLVER_VERSION.to_string(),
            n_points: points.len(),
            n_failed,
        },
        rotor_ids: runtime.rotor_ids.clone(),
        points,
        diagnostics,
    })
}

fn solve_point(
    runtime: &ProjectRuntime,
    index: usize,
    op: OperatingPoint,
    keep_elements: bool,
) -> AppResult<PointOutcome> {
    let fluid = fluid_at(&runtime.environment, op.altitude)?;
    let mut result = PointResult {
        index,
        altitude_m: op.altitude,
        speed_mps: op.speed,
        rpm: op.rpm(),
        collective_deg: op.collective.to_degrees(),
        fluid,
        rotors: Vec::new(),
        error: None,
    };

    let mut states = runtime
        .rotors
        .iter()
        .map(|rotor| RotorOperatingState::new(rotor.clone(), op, fluid))
        .collect::<Result<Vec<_>, _>>()
        .map_err(SolverError::from)?;

    let provider: &dyn AirfoilCoeffProvider = &runtime.airfoils;
    match bemt(&mut states, &runtime.config, provider, runtime.wake_contraction) {
        Ok(reports) => {
            info!(
                point = index,
                altitude_m = op.altitude,
                speed_mps = op.speed,
                rpm = op.rpm(),
                collective_deg = op.collective.to_degrees(),
                "operating point solved"
            );
            for ((state, report), id) in states.iter().zip(&reports).zip(&runtime.rotor_ids) {
                result
                    .rotors
                    .push(rotor_result(state, report, id, runtime, keep_elements)?);
            }
            Ok(PointOutcome {
                result,
                diagnostic: None,
            })
        }
        Err(err) => {
            // bemt stops at the first failing rotor, which is the first one without performance
            let failed = states
                .iter()
                .position(|s| s.performance.is_none())
                .unwrap_or(0);
            let rotor_id = runtime.rotor_ids.get(failed).cloned().unwrap_or_default();
            warn!(point = index, rotor = %rotor_id, error = %err, "operating point failed");

            let diagnostic = match &err {
                SolverError::NoRoot {
                    element,
                    diagnostic,
                    ..
                } => Some(Diagnostic {
                    point: index,
                    rotor_id,
                    element: *element,
                    csv: diagnostic.to_csv(),
                }),
                _ => None,
            };
            result.error = Some(err.to_string());
            Ok(PointOutcome { result, diagnostic })
        }
    }
}

fn rotor_result(
    state: &RotorOperatingState,
    report: &SolveReport,
    rotor_id: &str,
    runtime: &ProjectRuntime,
    keep_elements: bool,
) -> AppResult<RotorResult> {
    let perf = state
        .performance
        .ok_or_else(|| AppError::Solver(format!("rotor '{rotor_id}' has no integrated performance")))?;
    let coeffs = coefficients(state, runtime.convention)?;

    let elements = keep_elements.then(|| element_records(state));
    Ok(RotorResult {
        rotor_id: rotor_id.to_string(),
        converged: report.converged,
        iterations: report.iterations,
        warnings: report.warnings.clone(),
        thrust_n: perf.thrust,
        torque_nm: perf.torque,
        power_w: perf.power,
        power_induced_w: perf.power_induced,
        power_profile_w: perf.power_profile,
        efficiency: finite(perf.efficiency),
        figure_of_merit: finite(perf.figure_of_merit),
        ct: finite(coeffs.ct),
        cq: finite(coeffs.cq),
        cp: finite(coeffs.cp),
        elements,
    })
}

fn element_records(state: &RotorOperatingState) -> Vec<ElementRecord> {
    state
        .rotor
        .blade()
        .elements()
        .iter()
        .zip(&state.elements)
        .map(|(geom, e)| {
            let forces = e.forces().copied().unwrap_or_default();
            ElementRecord {
                radius_m: geom.absolute_radius,
                chord_m: geom.chord,
                pitch_deg: e.true_pitch.to_degrees(),
                inflow_angle_deg: e.inflow_angle().to_degrees(),
                alpha_deg: e.angle_of_attack().to_degrees(),
                cl: e.cl(),
                cd: e.cd(),
                reynolds: e.reynolds,
                axial_velocity_mps: e.disk_axial_velocity(),
                tangential_velocity_mps: e.disk_tangential_velocity(),
                induced_axial_mps: e.induced_vel_axial(),
                induced_tangential_mps: e.induced_vel_tangential(),
                d_thrust_n: forces.d_thrust,
                d_torque_nm: forces.d_torque,
                d_power_w: forces.d_power,
            }
        })
        .collect()
}

pub fn write_json(path: &Path, results: &RunResults) -> AppResult<()> {
    std::fs::write(path, serde_json::to_string_pretty(results)?)?;
    Ok(())
}

pub fn write_yaml(path: &Path, results: &RunResults) -> AppResult<()> {
    std::fs::write(path, serde_yaml::to_string(results)?)?;
    Ok(())
}

/// Write by extension: `.yaml`/`.yml` as YAML, anything else as JSON.
pub fn write_results(path: &Path, results: &RunResults) -> AppResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => write_yaml(path, results),
        _ => write_json(path, results),
    }
}

/// Dump every residual curve into `dir`; returns the written paths.
pub fn write_diagnostics(dir: &Path, results: &RunResults) -> AppResult<Vec<PathBuf>> {
    if results.diagnostics.is_empty() {
        return Ok(Vec::new());
    }
    std::fs::create_dir_all(dir)?;
    results
        .diagnostics
        .iter()
        .map(|d| {
            let path = dir.join(d.file_name());
            std::fs::write(&path, &d.csv)?;
            Ok(path)
        })
        .collect()
}
