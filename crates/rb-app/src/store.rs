//! Run cache keyed by a content hash of the project.

use std::fs;
use std::path::{Path, PathBuf};

use rb_project::schema::Project;
use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};
use crate::results::{RunManifest, RunResults};

/// SHA-256 over the project contents and the solver version.
///
/// The project name is excluded so that renaming a study keeps its cache.
pub fn compute_run_id(project: &Project, solver_version: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [
        serde_json::to_string(&project.model),
        serde_json::to_string(&project.numerics),
        serde_json::to_string(&project.environment),
        serde_json::to_string(&project.rotors),
        serde_json::to_string(&project.operation),
        serde_json::to_string(&project.airfoils),
        serde_json::to_string(&project.output),
    ] {
        hasher.update(part.unwrap_or_default().as_bytes());
    }
    hasher.update(solver_version.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> AppResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store under `.rotorbem/runs` next to the project file.
    pub fn for_project(project_path: &Path) -> AppResult<Self> {
        let project_dir = project_path.parent().ok_or_else(|| {
            AppError::InvalidInput("project path has no parent directory".to_string())
        })?;
        Self::new(project_dir.join(".rotorbem").join("runs"))
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join("results.json").exists()
    }

    pub fn save_run(&self, results: &RunResults) -> AppResult<PathBuf> {
        let run_dir = self.run_dir(&results.manifest.run_id);
        fs::create_dir_all(&run_dir)?;
        fs::write(
            run_dir.join("manifest.json"),
            serde_json::to_string_pretty(&results.manifest)?,
        )?;
        fs::write(
            run_dir.join("results.json"),
            serde_json::to_string_pretty(results)?,
        )?;
        Ok(run_dir)
    }

    pub fn load_manifest(&self, run_id: &str) -> AppResult<RunManifest> {
        let path = self.run_dir(run_id).join("manifest.json");
        if !path.exists() {
            return Err(AppError::RunNotFound(run_id.to_string()));
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    pub fn load_results(&self, run_id: &str) -> AppResult<RunResults> {
        let path = self.run_dir(run_id).join("results.json");
        if !path.exists() {
            return Err(AppError::RunNotFound(run_id.to_string()));
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Manifests of every stored run of the named project.
    pub fn list_runs(&self, project: &str) -> AppResult<Vec<RunManifest>> {
        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id)
                    && manifest.project == project
                {
                    runs.push(manifest);
                }
            }
        }
        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        serde_yaml::from_str(
            r#"
version: 1
name: Hash
rotors:
  - id: r
    name: R
    n_blades: 2
    stations:
      - { radius_m: 0.1, chord_m: 0.1, twist_deg: 0.0, airfoil: a }
      - { radius_m: 1.0, chord_m: 0.1, twist_deg: 0.0, airfoil: a }
operation:
  speed_mps: [0.0]
  rpm: [500.0]
  collective_deg: [5.0]
airfoils:
  - id: a
    model: { type: Linear, cd0: 0.01 }
"#,
        )
        .unwrap()
    }

    #[test]
    fn hash_stability() {
        let p = project();
        assert_eq!(compute_run_id(&p, "v1"), compute_run_id(&p, "v1"));
        assert_eq!(compute_run_id(&p, "v1").len(), 64);
    }

    #[test]
    fn hash_ignores_name_but_not_inputs() {
        let p = project();
        let mut renamed = p.clone();
        renamed.name = "Other".to_string();
        assert_eq!(compute_run_id(&p, "v1"), compute_run_id(&renamed, "v1"));

        let mut faster = p.clone();
        faster.operation.rpm = vec![600.0];
        assert_ne!(compute_run_id(&p, "v1"), compute_run_id(&faster, "v1"));
        assert_ne!(compute_run_id(&p, "v1"), compute_run_id(&p, "v2"));
    }

    #[test]
    fn missing_run_is_reported() {
        let store = RunStore::new(std::env::temp_dir().join("rb_app_store_missing")).unwrap();
        assert!(!store.has_run("nope"));
        assert!(matches!(
            store.load_manifest("nope"),
            Err(AppError::RunNotFound(_))
        ));
    }
}
