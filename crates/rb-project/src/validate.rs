//! Project validation logic.

use crate::schema::{
    AirfoilDef, AirfoilModelDef, EnvironmentDef, ExtrapolationDef, NumericsDef, OperationDef,
    PolarCurveDef, Project, RotorDef,
};
use rb_core::Isa;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    validate_numerics(&project.numerics)?;
    validate_environment(&project.environment, &project.operation)?;
    validate_operation(&project.operation)?;

    if project.airfoils.is_empty() {
        return Err(invalid("airfoils", "[]", "at least one airfoil is required"));
    }
    let mut airfoil_ids = HashSet::new();
    for airfoil in &project.airfoils {
        if !airfoil_ids.insert(airfoil.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: airfoil.id.clone(),
                context: "airfoils".to_string(),
            });
        }
        validate_airfoil(airfoil)?;
    }

    if project.rotors.is_empty() {
        return Err(invalid("rotors", "[]", "at least one rotor is required"));
    }
    let mut rotor_ids = HashSet::new();
    for rotor in &project.rotors {
        if !rotor_ids.insert(rotor.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: rotor.id.clone(),
                context: "rotors".to_string(),
            });
        }
        validate_rotor(rotor, &airfoil_ids)?;
    }

    if project.model.wake_contraction
        && project
            .rotors
            .windows(2)
            .any(|w| !(w[1].position_m > w[0].position_m))
    {
        return Err(ValidationError::Unsupported {
            feature: "wake contraction".to_string(),
            reason: "rotors must be listed upstream first with strictly increasing position_m"
                .to_string(),
        });
    }

    Ok(())
}

fn validate_numerics(numerics: &NumericsDef) -> Result<(), ValidationError> {
    if !(numerics.convergence_tol > 0.0) || !numerics.convergence_tol.is_finite() {
        return Err(invalid(
            "numerics.convergence_tol",
            numerics.convergence_tol,
            "must be positive",
        ));
    }
    if numerics.max_iter == 0 {
        return Err(invalid("numerics.max_iter", 0, "must be at least 1"));
    }
    if !(numerics.relax > 0.0 && numerics.relax <= 1.0) {
        return Err(invalid("numerics.relax", numerics.relax, "must be in (0, 1]"));
    }
    Ok(())
}

fn validate_environment(
    environment: &EnvironmentDef,
    operation: &OperationDef,
) -> Result<(), ValidationError> {
    match environment {
        EnvironmentDef::Isa => {
            for &h in &operation.altitude_m {
                if h > Isa::CEILING || h < -1_000.0 {
                    return Err(ValidationError::Unsupported {
                        feature: format!("altitude {h} m"),
                        reason: "standard atmosphere covers -1000 m to 20000 m".to_string(),
                    });
                }
            }
        }
        EnvironmentDef::Fixed {
            density_kg_m3,
            kinematic_viscosity_m2_s,
        } => {
            if !(*density_kg_m3 > 0.0) {
                return Err(invalid("environment.density_kg_m3", density_kg_m3, "must be positive"));
            }
            if !(*kinematic_viscosity_m2_s > 0.0) {
                return Err(invalid(
                    "environment.kinematic_viscosity_m2_s",
                    kinematic_viscosity_m2_s,
                    "must be positive",
                ));
            }
        }
    }
    Ok(())
}

fn validate_operation(op: &OperationDef) -> Result<(), ValidationError> {
    for (field, values) in [
        ("operation.altitude_m", &op.altitude_m),
        ("operation.speed_mps", &op.speed_mps),
        ("operation.rpm", &op.rpm),
        ("operation.collective_deg", &op.collective_deg),
    ] {
        if values.is_empty() {
            return Err(invalid(field, "[]", "at least one value is required"));
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(invalid(field, v, "must be finite"));
        }
    }
    if let Some(v) = op.rpm.iter().find(|&&v| !(v > 0.0)) {
        return Err(invalid("operation.rpm", v, "rotational speed must be positive"));
    }
    Ok(())
}

fn validate_rotor(rotor: &RotorDef, airfoil_ids: &HashSet<&str>) -> Result<(), ValidationError> {
    let field = |name: &str| format!("rotors[{}].{}", rotor.id, name);

    if rotor.n_blades == 0 {
        return Err(invalid(field("n_blades"), 0, "a rotor needs at least one blade"));
    }
    if rotor.n_elements == 0 {
        return Err(invalid(field("n_elements"), 0, "must be at least 1"));
    }
    if !rotor.position_m.is_finite() {
        return Err(invalid(field("position_m"), rotor.position_m, "must be finite"));
    }
    if rotor.stations.len() < 2 {
        return Err(invalid(
            field("stations"),
            rotor.stations.len(),
            "root and tip stations are required",
        ));
    }
    if !(rotor.stations[0].radius_m >= 0.0) {
        return Err(invalid(
            field("stations[0].radius_m"),
            rotor.stations[0].radius_m,
            "root cutout must be non-negative",
        ));
    }
    for (i, pair) in rotor.stations.windows(2).enumerate() {
        if !(pair[1].radius_m > pair[0].radius_m) {
            return Err(invalid(
                field(&format!("stations[{}].radius_m", i + 1)),
                pair[1].radius_m,
                "station radii must be strictly increasing",
            ));
        }
    }
    for (i, station) in rotor.stations.iter().enumerate() {
        if !(station.chord_m > 0.0) || !station.chord_m.is_finite() {
            return Err(invalid(
                field(&format!("stations[{i}].chord_m")),
                station.chord_m,
                "must be positive",
            ));
        }
        if !station.twist_deg.is_finite() {
            return Err(invalid(
                field(&format!("stations[{i}].twist_deg")),
                station.twist_deg,
                "must be finite",
            ));
        }
        if !airfoil_ids.contains(station.airfoil.as_str()) {
            return Err(ValidationError::MissingReference {
                id: station.airfoil.clone(),
                context: field(&format!("stations[{i}].airfoil")),
            });
        }
    }
    Ok(())
}

fn validate_airfoil(airfoil: &AirfoilDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("airfoils[{}].{}", airfoil.id, name);
    match &airfoil.model {
        AirfoilModelDef::Linear {
            slope_per_rad,
            alpha0_deg,
            cd0,
            cd2,
            cl_max,
        } => {
            if !(*slope_per_rad > 0.0) || !slope_per_rad.is_finite() {
                return Err(invalid(field("slope_per_rad"), slope_per_rad, "must be positive"));
            }
            if !alpha0_deg.is_finite() {
                return Err(invalid(field("alpha0_deg"), alpha0_deg, "must be finite"));
            }
            if !(*cd0 >= 0.0) || !(*cd2 >= 0.0) {
                return Err(invalid(
                    field("cd0"),
                    format!("{cd0}/{cd2}"),
                    "drag polar coefficients must be non-negative",
                ));
            }
            if let Some(cl_max) = cl_max {
                if !(*cl_max > 0.0) {
                    return Err(invalid(field("cl_max"), cl_max, "must be positive"));
                }
            }
        }
        AirfoilModelDef::Polar {
            extrapolation,
            curves,
        } => {
            if curves.is_empty() {
                return Err(invalid(field("curves"), "[]", "at least one polar curve is required"));
            }
            if let ExtrapolationDef::Viterna { cd_max } = extrapolation {
                if !(*cd_max > 0.0) {
                    return Err(invalid(field("extrapolation.cd_max"), cd_max, "must be positive"));
                }
            }
            let mut seen = Vec::with_capacity(curves.len());
            for curve in curves {
                if seen.contains(&curve.reynolds) {
                    return Err(ValidationError::DuplicateId {
                        id: curve.reynolds.to_string(),
                        context: field("curves.reynolds"),
                    });
                }
                seen.push(curve.reynolds);
                validate_curve(curve, &field("curves"))?;
            }
        }
    }
    Ok(())
}

fn validate_curve(curve: &PolarCurveDef, context: &str) -> Result<(), ValidationError> {
    let field = |name: &str| format!("{context}[Re={}].{name}", curve.reynolds);
    if !(curve.reynolds > 0.0) {
        return Err(invalid(field("reynolds"), curve.reynolds, "must be positive"));
    }
    let n = curve.alpha_deg.len();
    if n < 2 {
        return Err(invalid(field("alpha_deg"), n, "at least two points are required"));
    }
    if curve.cl.len() != n || curve.cd.len() != n {
        return Err(invalid(
            field("cl/cd"),
            format!("{}/{}", curve.cl.len(), curve.cd.len()),
            "must have one value per alpha",
        ));
    }
    if curve.alpha_deg.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(invalid(field("alpha_deg"), "", "must be strictly increasing"));
    }
    if curve.cd.iter().any(|&cd| !(cd >= 0.0)) {
        return Err(invalid(field("cd"), "", "must be non-negative"));
    }
    Ok(())
}
