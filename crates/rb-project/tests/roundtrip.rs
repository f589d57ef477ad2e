use rb_project::schema::*;
use rb_project::{load_json, load_yaml, save_json, save_yaml, validate_project};

fn station(radius_m: f64, twist_deg: f64) -> StationDef {
    StationDef {
        radius_m,
        chord_m: 0.05,
        twist_deg,
        airfoil: "af".to_string(),
    }
}

fn simple_project() -> Project {
    Project {
        version: 1,
        name: "Simple rotor".to_string(),
        model: ModelDef {
            solver: SolverDef::IndVel,
            loss: LossDef::Hub,
            solidity: SolidityModelDef::BladeArea,
            wake_contraction: false,
        },
        numerics: NumericsDef::default(),
        environment: EnvironmentDef::Fixed {
            density_kg_m3: 1.2,
            kinematic_viscosity_m2_s: 1.5e-5,
        },
        rotors: vec![RotorDef {
            id: "r1".to_string(),
            name: "Rotor".to_string(),
            n_blades: 3,
            position_m: 0.0,
            stations: vec![station(0.1, 20.0), station(0.3, 12.0), station(0.5, 6.0)],
            n_elements: 25,
            spacing: SpacingDef::Cosine,
            interpolation: InterpolationDef::Spline,
        }],
        operation: OperationDef {
            altitude_m: vec![0.0],
            speed_mps: vec![0.0, 10.0],
            rpm: vec![3000.0],
            collective_deg: vec![0.0, 2.0],
        },
        airfoils: vec![AirfoilDef {
            id: "af".to_string(),
            model: AirfoilModelDef::Polar {
                extrapolation: ExtrapolationDef::Linear,
                curves: vec![PolarCurveDef {
                    reynolds: 1e5,
                    alpha_deg: vec![-4.0, 0.0, 4.0],
                    cl: vec![-0.4, 0.0, 0.4],
                    cd: vec![0.02, 0.01, 0.02],
                }],
            },
        }],
        output: OutputDef {
            elements: true,
            coefficients: CoefficientsDef {
                kind: CoefficientKindDef::Helicopter,
                eu: true,
            },
        },
    }
}

#[test]
fn roundtrip_yaml_simple_project() {
    let project = simple_project();
    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("rb_project_roundtrip_simple.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json_simple_project() {
    let project = simple_project();
    let path = std::env::temp_dir().join("rb_project_roundtrip_simple.json");
    save_json(&path, &project).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(project, loaded);
}

#[test]
fn minimal_yaml_fills_defaults() {
    let yaml = r#"
version: 1
name: Minimal
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
"#;
    let project: Project = serde_yaml::from_str(yaml).unwrap();
    validate_project(&project).unwrap();

    assert_eq!(project.model.solver, SolverDef::Stahlhut);
    assert_eq!(project.model.loss, LossDef::All);
    assert_eq!(project.numerics, NumericsDef::default());
    assert_eq!(project.environment, EnvironmentDef::Isa);
    assert_eq!(project.rotors[0].n_elements, 50);
    assert_eq!(project.operation.altitude_m, vec![0.0]);
    assert_eq!(project.operation.n_points(), 1);
    match &project.airfoils[0].model {
        AirfoilModelDef::Linear { slope_per_rad, .. } => {
            assert!((slope_per_rad - 2.0 * std::f64::consts::PI).abs() < 1e-12)
        }
        other => panic!("unexpected airfoil model {other:?}"),
    }
}

#[test]
fn lowercase_model_names_are_accepted() {
    let model: ModelDef = serde_yaml::from_str("{ solver: leishman, loss: both }").unwrap();
    assert_eq!(model.solver, SolverDef::Leishman);
    assert_eq!(model.loss, LossDef::All);
}
