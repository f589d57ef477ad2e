//! Schema migration framework.

use crate::ProjectError;
use crate::schema::Project;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut project: Project) -> Result<Project, ProjectError> {
    while project.version < LATEST_VERSION {
        project = migrate_one_version(project)?;
    }
    Ok(project)
}

fn migrate_one_version(project: Project) -> Result<Project, ProjectError> {
    match project.version {
        0 => migrate_v0_to_v1(project),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

// Version 0 files predate the explicit altitude sweep; an empty list meant sea level.
fn migrate_v0_to_v1(mut project: Project) -> Result<Project, ProjectError> {
    if project.operation.altitude_m.is_empty() {
        project.operation.altitude_m.push(0.0);
    }
    project.version = 1;
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OperationDef;

    fn project(version: u32, altitude_m: Vec<f64>) -> Project {
        Project {
            version,
            name: "test".to_string(),
            model: Default::default(),
            numerics: Default::default(),
            environment: Default::default(),
            rotors: vec![],
            operation: OperationDef {
                altitude_m,
                speed_mps: vec![0.0],
                rpm: vec![1000.0],
                collective_deg: vec![5.0],
            },
            airfoils: vec![],
            output: Default::default(),
        }
    }

    #[test]
    fn migrate_latest_is_noop() {
        let p = project(LATEST_VERSION, vec![100.0]);
        assert_eq!(migrate_to_latest(p.clone()).unwrap(), p);
    }

    #[test]
    fn v0_empty_altitude_becomes_sea_level() {
        let migrated = migrate_to_latest(project(0, vec![])).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.operation.altitude_m, vec![0.0]);
    }
}
