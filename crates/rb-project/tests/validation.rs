use rb_project::schema::*;
use rb_project::{ValidationError, validate_project};

fn base() -> Project {
    serde_yaml::from_str(
        r#"
version: 1
name: Base
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
fn base_project_is_valid() {
    validate_project(&base()).unwrap();
}

#[test]
fn newer_version_is_rejected() {
    let mut p = base();
    p.version = rb_project::LATEST_VERSION + 1;
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::UnsupportedVersion { .. })
    ));
}

#[test]
fn unknown_station_airfoil_is_a_missing_reference() {
    let mut p = base();
    p.rotors[0].stations[1].airfoil = "nope".to_string();
    match validate_project(&p) {
        Err(ValidationError::MissingReference { id, .. }) => assert_eq!(id, "nope"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn duplicate_rotor_ids_are_rejected() {
    let mut p = base();
    p.rotors.push(p.rotors[0].clone());
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn non_increasing_stations_are_rejected() {
    let mut p = base();
    p.rotors[0].stations[1].radius_m = 0.1;
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn zero_rpm_is_rejected() {
    let mut p = base();
    p.operation.rpm = vec![500.0, 0.0];
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn relaxation_outside_unit_interval_is_rejected() {
    let mut p = base();
    p.numerics.relax = 1.5;
    assert!(validate_project(&p).is_err());
}

#[test]
fn isa_above_ceiling_is_unsupported() {
    let mut p = base();
    p.operation.altitude_m = vec![25_000.0];
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::Unsupported { .. })
    ));

    p.environment = EnvironmentDef::Fixed {
        density_kg_m3: 0.04,
        kinematic_viscosity_m2_s: 4e-4,
    };
    validate_project(&p).unwrap();
}

#[test]
fn wake_contraction_requires_ordered_stack() {
    let mut p = base();
    let mut lower = p.rotors[0].clone();
    lower.id = "lower".to_string();
    lower.position_m = -0.3;
    p.rotors.push(lower);
    p.model.wake_contraction = true;
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::Unsupported { .. })
    ));

    p.rotors[1].position_m = 0.3;
    validate_project(&p).unwrap();
}

#[test]
fn ragged_polar_is_rejected() {
    let mut p = base();
    p.airfoils[0].model = AirfoilModelDef::Polar {
        extrapolation: ExtrapolationDef::Disabled,
        curves: vec![PolarCurveDef {
            reynolds: 1e5,
            alpha_deg: vec![0.0, 5.0],
            cl: vec![0.0],
            cd: vec![0.01, 0.02],
        }],
    };
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::InvalidValue { .. })
    ));
}
