//! Smoke tests for the rb-app service layer.

use std::path::PathBuf;

use rb_app::{
    RunOptions, RunStore, list_airfoils, list_rotors, load_project, run_project, validate_project,
    write_json, write_yaml,
};
use rb_project::schema::{AirfoilModelDef, ExtrapolationDef, PolarCurveDef};

fn demo(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // crates
    path.pop(); // repo root
    path.push("demos");
    path.push("projects");
    path.push(name);
    path
}

#[test]
fn demo_projects_build() {
    for name in [
        "01_hover_rotor.yaml",
        "02_propeller_polar.yaml",
        "03_coaxial_stack.yaml",
    ] {
        let project = load_project(&demo(name)).unwrap_or_else(|e| panic!("{name}: {e}"));
        validate_project(&project).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert!(!list_rotors(&project).is_empty());
        assert!(!list_airfoils(&project).is_empty());
    }
}

#[test]
fn coaxial_demo_runs_every_point() {
    let project = load_project(&demo("03_coaxial_stack.yaml")).unwrap();
    let results = run_project(&project, RunOptions::default()).unwrap();

    assert_eq!(results.manifest.n_points, 1);
    assert_eq!(results.manifest.n_failed, 0);
    assert_eq!(results.manifest.solver, "stahlhut");
    assert_eq!(results.rotor_ids, vec!["upper", "lower"]);

    let point = &results.points[0];
    assert!(point.error.is_none());
    assert_eq!(point.rotors.len(), 2);
    assert!(point.rotors[1].thrust_n < point.rotors[0].thrust_n);
    for rotor in &point.rotors {
        assert!(rotor.converged);
        assert!(rotor.elements.is_none());
        assert!(rotor.ct.is_some_and(|ct| ct > 0.0));
        assert_eq!(rotor.power_w, rotor.power_induced_w + rotor.power_profile_w);
    }
}

#[test]
fn sweep_covers_the_cartesian_product() {
    let project = load_project(&demo("01_hover_rotor.yaml")).unwrap();
    let results = run_project(&project, RunOptions { elements: true }).unwrap();
    assert_eq!(results.points.len(), project.operation.n_points());
    for (i, p) in results.points.iter().enumerate() {
        assert_eq!(p.index, i);
    }
    // ISA density drops with altitude
    let low = &results.points[0];
    let high = results.points.iter().find(|p| p.altitude_m > 0.0).unwrap();
    assert!(high.fluid.density < low.fluid.density);

    let solved = results.points.iter().find(|p| p.error.is_none()).unwrap();
    let elements = solved.rotors[0].elements.as_ref().unwrap();
    assert_eq!(elements.len(), 40);
}

#[test]
fn missing_polar_data_fails_the_point_not_the_run() {
    let mut project = load_project(&demo("03_coaxial_stack.yaml")).unwrap();
    project.model.wake_contraction = false;
    project.airfoils[0].model = AirfoilModelDef::Polar {
        extrapolation: ExtrapolationDef::Disabled,
        curves: vec![PolarCurveDef {
            reynolds: 1e5,
            alpha_deg: vec![-2.0, 0.0, 2.0],
            cl: vec![-0.2, 0.0, 0.2],
            cd: vec![0.01, 0.01, 0.01],
        }],
    };

    let results = run_project(&project, RunOptions::default()).unwrap();
    assert_eq!(results.manifest.n_failed, 1);
    let err = results.points[0].error.as_deref().unwrap();
    assert!(err.contains("no valid aerodynamic data"), "{err}");
}

#[test]
fn results_persist_as_json_yaml_and_in_the_store() {
    let project = load_project(&demo("03_coaxial_stack.yaml")).unwrap();
    let results = run_project(&project, RunOptions::default()).unwrap();

    let dir = std::env::temp_dir().join("rb_app_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let json = dir.join("results.json");
    write_json(&json, &results).unwrap();
    write_yaml(&dir.join("results.yaml"), &results).unwrap();
    let text = std::fs::read_to_string(&json).unwrap();
    assert!(text.contains(&results.manifest.run_id));

    let store = RunStore::new(dir.join("runs")).unwrap();
    store.save_run(&results).unwrap();
    assert!(store.has_run(&results.manifest.run_id));
    let loaded = store.load_results(&results.manifest.run_id).unwrap();
    assert_eq!(loaded.manifest, results.manifest);
    assert_eq!(loaded.points.len(), results.points.len());
    let (a, b) = (&loaded.points[0].rotors[0], &results.points[0].rotors[0]);
    assert!((a.thrust_n - b.thrust_n).abs() <= 1e-9 * b.thrust_n.abs());
    assert!(
        store
            .list_runs(&project.name)
            .unwrap()
            .iter()
            .any(|m| m.run_id == results.manifest.run_id)
    );
}
