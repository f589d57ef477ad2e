//! Serializable sweep results.
//!
//! Non-finite values (efficiency at zero power, wind-turbine coefficients in
//! hover) are stored as `None` so that both JSON and YAML round-trip.

use rb_core::FluidProperties;
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub project: String,
    pub timestamp: String,
    pub solver: String,
    pub loss: String,
    pub solver_version: String,
    pub n_points: usize,
    pub n_failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunResults {
    pub manifest: RunManifest,
    pub rotor_ids: Vec<String>,
    pub points: Vec<PointResult>,
    /// Residual curves of failed bracketed solves, written as CSV on demand
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl RunResults {
    pub fn failed(&self) -> impl Iterator<Item = &PointResult> {
        self.points.iter().filter(|p| p.error.is_some())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointResult {
    pub index: usize,
    pub altitude_m: f64,
    pub speed_mps: f64,
    pub rpm: f64,
    pub collective_deg: f64,
    /// Air at the point altitude
    pub fluid: FluidProperties,
    /// One entry per solved rotor, upstream first
    pub rotors: Vec<RotorResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RotorResult {
    pub rotor_id: String,
    pub converged: bool,
    pub iterations: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub thrust_n: f64,
    pub torque_nm: f64,
    pub power_w: f64,
    pub power_induced_w: f64,
    pub power_profile_w: f64,
    pub efficiency: Option<f64>,
    pub figure_of_merit: Option<f64>,
    pub ct: Option<f64>,
    pub cq: Option<f64>,
    pub cp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ElementRecord>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementRecord {
    pub radius_m: f64,
    pub chord_m: f64,
    pub pitch_deg: f64,
    pub inflow_angle_deg: f64,
    pub alpha_deg: f64,
    pub cl: f64,
    pub cd: f64,
    pub reynolds: f64,
    pub axial_velocity_mps: f64,
    pub tangential_velocity_mps: f64,
    pub induced_axial_mps: f64,
    pub induced_tangential_mps: f64,
    pub d_thrust_n: f64,
    pub d_torque_nm: f64,
    pub d_power_w: f64,
}

/// g(φ) sampled across the bracket of an element without a root.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub point: usize,
    pub rotor_id: String,
    pub element: usize,
    pub csv: String,
}

impl Diagnostic {
    pub fn file_name(&self) -> String {
        format!(
            "residual_p{}_{}_e{}.csv",
            self.point, self.rotor_id, self.element
        )
    }
}

pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
