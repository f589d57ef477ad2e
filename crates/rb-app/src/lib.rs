//! Application service layer for rotorbem.
//!
//! Turns a project file into solver inputs, sweeps its operating points and
//! persists the results. Shared by the CLI and tests.

pub mod error;
pub mod project_service;
pub mod results;
pub mod run_service;
pub mod runtime_build;
pub mod store;

pub use error::{AppError, AppResult};
pub use project_service::{RotorSummary, list_airfoils, list_rotors, load_project, validate_project};
pub use results::{
    Diagnostic, ElementRecord, PointResult, RotorResult, RunId, RunManifest, RunResults,
};
pub use run_service::{
    RunOptions, SOLVER_VERSION, run_project, write_diagnostics, write_json, write_results,
    write_yaml,
};
pub use runtime_build::{ProjectRuntime, build_runtime};
pub use store::{RunStore, compute_run_id};
