//! Project schema definitions.
//!
//! Angles are in degrees, speeds in m/s and rotational speeds in rpm; the
//! application layer converts to SI radians when it builds solver inputs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub model: ModelDef,
    #[serde(default)]
    pub numerics: NumericsDef,
    #[serde(default)]
    pub environment: EnvironmentDef,
    pub rotors: Vec<RotorDef>,
    pub operation: OperationDef,
    pub airfoils: Vec<AirfoilDef>,
    #[serde(default)]
    pub output: OutputDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ModelDef {
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default)]
    pub loss: LossDef,
    #[serde(default)]
    pub solidity: SolidityModelDef,
    /// Feed each rotor the contracted slipstream of the rotor ahead of it
    #[serde(default)]
    pub wake_contraction: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SolverDef {
    #[serde(alias = "leishman")]
    Leishman,
    #[serde(alias = "indfact")]
    IndFact,
    #[serde(alias = "indvel")]
    IndVel,
    #[default]
    #[serde(alias = "stahlhut")]
    Stahlhut,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LossDef {
    #[serde(alias = "none")]
    None,
    #[serde(alias = "hub")]
    Hub,
    #[serde(alias = "tip")]
    Tip,
    #[default]
    #[serde(alias = "all", alias = "both", alias = "Both")]
    All,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SolidityModelDef {
    /// σ = B·c/(πR) per element
    #[default]
    LocalChord,
    /// σ = B·A_blade/(πR²), uniform
    BladeArea,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumericsDef {
    #[serde(default = "default_convergence_tol")]
    pub convergence_tol: f64,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_relax")]
    pub relax: f64,
    #[serde(default)]
    pub integration: IntegrationDef,
}

fn default_convergence_tol() -> f64 {
    1e-4
}

fn default_max_iter() -> usize {
    500
}

fn default_relax() -> f64 {
    0.1
}

impl Default for NumericsDef {
    fn default() -> Self {
        Self {
            convergence_tol: default_convergence_tol(),
            max_iter: default_max_iter(),
            relax: default_relax(),
            integration: IntegrationDef::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum IntegrationDef {
    #[default]
    Trapezoidal,
    Rectangular,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum EnvironmentDef {
    /// International Standard Atmosphere at each operating altitude
    #[default]
    Isa,
    /// Same fluid at every altitude
    Fixed {
        density_kg_m3: f64,
        kinematic_viscosity_m2_s: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RotorDef {
    pub id: String,
    pub name: String,
    pub n_blades: usize,
    /// Axial position along the shaft, positive downstream
    #[serde(default)]
    pub position_m: f64,
    pub stations: Vec<StationDef>,
    #[serde(default = "default_n_elements")]
    pub n_elements: usize,
    #[serde(default)]
    pub spacing: SpacingDef,
    #[serde(default)]
    pub interpolation: InterpolationDef,
}

fn default_n_elements() -> usize {
    50
}

/// Blade guide station. The first station is the root cutout, the last the tip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationDef {
    pub radius_m: f64,
    pub chord_m: f64,
    pub twist_deg: f64,
    /// Airfoil id used from this station outboard
    pub airfoil: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SpacingDef {
    #[default]
    Linear,
    Cosine,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum InterpolationDef {
    Linear,
    #[default]
    Spline,
}

/// Operating points are every combination of the four lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationDef {
    #[serde(default = "default_altitude")]
    pub altitude_m: Vec<f64>,
    pub speed_mps: Vec<f64>,
    pub rpm: Vec<f64>,
    pub collective_deg: Vec<f64>,
}

fn default_altitude() -> Vec<f64> {
    vec![0.0]
}

impl OperationDef {
    pub fn n_points(&self) -> usize {
        self.altitude_m.len() * self.speed_mps.len() * self.rpm.len() * self.collective_deg.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirfoilDef {
    pub id: String,
    pub model: AirfoilModelDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum AirfoilModelDef {
    /// cl = slope·(α − α0), cd = cd0 + cd2·cl²
    Linear {
        #[serde(default = "default_lift_slope")]
        slope_per_rad: f64,
        #[serde(default)]
        alpha0_deg: f64,
        cd0: f64,
        #[serde(default)]
        cd2: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cl_max: Option<f64>,
    },
    Polar {
        #[serde(default)]
        extrapolation: ExtrapolationDef,
        curves: Vec<PolarCurveDef>,
    },
}

fn default_lift_slope() -> f64 {
    2.0 * std::f64::consts::PI
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolarCurveDef {
    pub reynolds: f64,
    pub alpha_deg: Vec<f64>,
    pub cl: Vec<f64>,
    pub cd: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ExtrapolationDef {
    Disabled,
    Linear,
    Viterna { cd_max: f64 },
}

impl Default for ExtrapolationDef {
    fn default() -> Self {
        ExtrapolationDef::Viterna { cd_max: 2.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OutputDef {
    /// Keep per-element distributions in the results
    #[serde(default)]
    pub elements: bool,
    #[serde(default)]
    pub coefficients: CoefficientsDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CoefficientsDef {
    #[serde(default)]
    pub kind: CoefficientKindDef,
    /// European helicopter convention (extra ½ in the reference)
    #[serde(default)]
    pub eu: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CoefficientKindDef {
    #[default]
    Propeller,
    Helicopter,
    WindTurbine,
}
