//! Project definitions to solver runtime objects.

use std::collections::HashMap;
use std::sync::Arc;

use rb_airfoil::{
    AirfoilSet, Extrapolation, LinearAirfoils, LinearSection, Polar, PolarCurve, PolarTable,
};
use rb_core::units::{deg, kg_per_m3, m, m2_per_s, mps, rpm};
use rb_core::{Atmosphere, FluidProperties, Isa};
use rb_project::schema::{
    AirfoilDef, AirfoilModelDef, CoefficientKindDef, EnvironmentDef, ExtrapolationDef,
    IntegrationDef, InterpolationDef, LossDef, OperationDef, OutputDef, Project, RotorDef,
    SolidityModelDef, SolverDef, SpacingDef,
};
use rb_rotor::{
    Blade, Discretization, GuideStations, OperatingPoint, Rotor, SolidityDef, Spacing,
    StationInterp,
};
use rb_solver::{CoefficientKind, Convention, LossType, ModelConfig, Quadrature, SolverKind};

use crate::error::{AppError, AppResult};

/// Everything a sweep needs, built once per project.
#[derive(Debug)]
pub struct ProjectRuntime {
    pub airfoils: AirfoilSet,
    /// Upstream first
    pub rotors: Vec<Arc<Rotor>>,
    pub rotor_ids: Vec<String>,
    pub config: ModelConfig,
    pub wake_contraction: bool,
    pub convention: Convention,
    pub environment: EnvironmentDef,
    pub points: Vec<OperatingPoint>,
}

pub fn build_runtime(project: &Project) -> AppResult<ProjectRuntime> {
    let (airfoils, index) = build_airfoils(&project.airfoils)?;
    let rotors = project
        .rotors
        .iter()
        .map(|def| build_rotor(def, &index).map(Arc::new))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ProjectRuntime {
        airfoils,
        rotors,
        rotor_ids: project.rotors.iter().map(|r| r.id.clone()).collect(),
        config: model_config(project),
        wake_contraction: project.model.wake_contraction,
        convention: convention(&project.output),
        environment: project.environment.clone(),
        points: operating_points(&project.operation)?,
    })
}

/// Airfoil provider plus the id → global index map used by blade stations.
pub fn build_airfoils(defs: &[AirfoilDef]) -> AppResult<(AirfoilSet, HashMap<String, usize>)> {
    let mut set = AirfoilSet::new();
    let mut index = HashMap::new();
    for def in defs {
        let what = || format!("airfoil '{}'", def.id);
        let first = match &def.model {
            AirfoilModelDef::Linear {
                slope_per_rad,
                alpha0_deg,
                cd0,
                cd2,
                cl_max,
            } => {
                let section = LinearSection {
                    slope: *slope_per_rad,
                    alpha_0: alpha0_deg.to_radians(),
                    cd0: *cd0,
                    cd2: *cd2,
                    cl_max: *cl_max,
                };
                let provider =
                    LinearAirfoils::new(vec![section]).map_err(|e| AppError::build(what(), e))?;
                set.push(Box::new(provider))
            }
            AirfoilModelDef::Polar {
                extrapolation,
                curves,
            } => {
                let curves = curves
                    .iter()
                    .map(|c| {
                        PolarCurve::new(
                            c.reynolds,
                            c.alpha_deg.iter().map(|a| a.to_radians()).collect(),
                            c.cl.clone(),
                            c.cd.clone(),
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| AppError::build(what(), e))?;
                let polar = Polar::new(def.id.clone(), curves).map_err(|e| AppError::build(what(), e))?;
                let table = PolarTable::new(vec![polar], extrapolation_of(extrapolation))
                    .map_err(|e| AppError::build(what(), e))?;
                set.push(Box::new(table))
            }
        }
        .map_err(|e| AppError::build(what(), e))?;
        index.insert(def.id.clone(), first);
    }
    Ok((set, index))
}

pub fn build_rotor(def: &RotorDef, airfoil_index: &HashMap<String, usize>) -> AppResult<Rotor> {
    let what = || format!("rotor '{}'", def.id);
    let airfoil = def
        .stations
        .iter()
        .map(|s| {
            airfoil_index.get(&s.airfoil).copied().ok_or_else(|| {
                AppError::build(what(), format!("unknown airfoil '{}'", s.airfoil))
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let stations = GuideStations {
        radius: def.stations.iter().map(|s| s.radius_m).collect(),
        chord: def.stations.iter().map(|s| s.chord_m).collect(),
        twist: def.stations.iter().map(|s| s.twist_deg.to_radians()).collect(),
        airfoil,
    };
    let disc = Discretization {
        n_elem: def.n_elements,
        spacing: match def.spacing {
            SpacingDef::Linear => Spacing::Linear,
            SpacingDef::Cosine => Spacing::Cosine,
        },
        interp: match def.interpolation {
            InterpolationDef::Linear => StationInterp::Linear,
            InterpolationDef::Spline => StationInterp::Spline,
        },
    };
    let blade = Blade::new(stations, disc).map_err(|e| AppError::build(what(), e))?;
    let rotor = Rotor::new(def.name.clone(), def.n_blades, blade)
        .map_err(|e| AppError::build(what(), e))?;
    Ok(rotor.with_position(def.position_m))
}

pub fn model_config(project: &Project) -> ModelConfig {
    let model = &project.model;
    let numerics = &project.numerics;
    ModelConfig {
        solver: match model.solver {
            SolverDef::Leishman => SolverKind::Leishman,
            SolverDef::IndFact => SolverKind::IndFact,
            SolverDef::IndVel => SolverKind::IndVel,
            SolverDef::Stahlhut => SolverKind::Stahlhut,
        },
        loss: match model.loss {
            LossDef::None => LossType::None,
            LossDef::Hub => LossType::Hub,
            LossDef::Tip => LossType::Tip,
            LossDef::All => LossType::All,
        },
        convergence_tol: numerics.convergence_tol,
        max_iter: numerics.max_iter,
        relax: numerics.relax,
        integration: match numerics.integration {
            IntegrationDef::Trapezoidal => Quadrature::Trapezoidal,
            IntegrationDef::Rectangular => Quadrature::Rectangular,
        },
        solidity: match model.solidity {
            SolidityModelDef::LocalChord => SolidityDef::LocalChord,
            SolidityModelDef::BladeArea => SolidityDef::BladeArea,
        },
    }
}

pub fn convention(output: &OutputDef) -> Convention {
    Convention {
        kind: match output.coefficients.kind {
            CoefficientKindDef::Propeller => CoefficientKind::Propeller,
            CoefficientKindDef::Helicopter => CoefficientKind::Helicopter,
            CoefficientKindDef::WindTurbine => CoefficientKind::WindTurbine,
        },
        eu: output.coefficients.eu,
    }
}

fn extrapolation_of(def: &ExtrapolationDef) -> Extrapolation {
    match def {
        ExtrapolationDef::Disabled => Extrapolation::Disabled,
        ExtrapolationDef::Linear => Extrapolation::Linear,
        ExtrapolationDef::Viterna { cd_max } => Extrapolation::Viterna { cd_max: *cd_max },
    }
}

/// Cartesian product altitude × speed × rpm × collective, collective fastest.
pub fn operating_points(op: &OperationDef) -> AppResult<Vec<OperatingPoint>> {
    let mut points = Vec::with_capacity(op.n_points());
    for &h in &op.altitude_m {
        for &v in &op.speed_mps {
            for &n in &op.rpm {
                for &theta in &op.collective_deg {
                    let point = OperatingPoint::new(m(h), mps(v), rpm(n), deg(theta))
                        .map_err(|e| AppError::build("operating point", e))?;
                    points.push(point);
                }
            }
        }
    }
    Ok(points)
}

pub fn fluid_at(environment: &EnvironmentDef, altitude: f64) -> AppResult<FluidProperties> {
    let fluid = match environment {
        EnvironmentDef::Isa => Isa.properties(altitude),
        EnvironmentDef::Fixed {
            density_kg_m3,
            kinematic_viscosity_m2_s,
        } => FluidProperties::from_quantities(
            kg_per_m3(*density_kg_m3),
            m2_per_s(*kinematic_viscosity_m2_s),
        ),
    };
    fluid.map_err(|e| AppError::build(format!("fluid at {altitude} m"), e))
}
