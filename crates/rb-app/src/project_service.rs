//! Project loading, validation and introspection.

use std::path::Path;

use rb_project::schema::{AirfoilModelDef, Project};

use crate::error::{AppError, AppResult};
use crate::runtime_build::build_runtime;

/// One line per rotor for listings.
#[derive(Debug, Clone)]
pub struct RotorSummary {
    pub id: String,
    pub name: String,
    pub n_blades: usize,
    pub radius_m: f64,
    pub root_cutout_m: f64,
    pub n_elements: usize,
    pub position_m: f64,
}

/// Load a YAML or JSON project, migrated and validated.
pub fn load_project(path: &Path) -> AppResult<Project> {
    if !path.exists() {
        return Err(AppError::ProjectFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    Ok(rb_project::load(path)?)
}

/// Schema validation plus a dry build of airfoils, blades and operating points.
pub fn validate_project(project: &Project) -> AppResult<()> {
    rb_project::validate_project(project)?;
    build_runtime(project)?;
    Ok(())
}

pub fn list_rotors(project: &Project) -> Vec<RotorSummary> {
    project
        .rotors
        .iter()
        .map(|r| RotorSummary {
            id: r.id.clone(),
            name: r.name.clone(),
            n_blades: r.n_blades,
            radius_m: r.stations.last().map(|s| s.radius_m).unwrap_or(0.0),
            root_cutout_m: r.stations.first().map(|s| s.radius_m).unwrap_or(0.0),
            n_elements: r.n_elements,
            position_m: r.position_m,
        })
        .collect()
}

/// `(id, model kind)` of every airfoil.
pub fn list_airfoils(project: &Project) -> Vec<(String, &'static str)> {
    project
        .airfoils
        .iter()
        .map(|a| {
            let kind = match a.model {
                AirfoilModelDef::Linear { .. } => "linear",
                AirfoilModelDef::Polar { .. } => "polar",
            };
            (a.id.clone(), kind)
        })
        .collect()
}
