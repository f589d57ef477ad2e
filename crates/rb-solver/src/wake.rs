//! Slipstream contraction of an upstream rotor seen by a downstream rotor.
//!
//! Simplified model: the upstream slipstream contracts to `κ·R` following a
//! Landgrebe-type law in the axial spacing, mass is conserved through the
//! contraction and angular momentum is conserved along each streamtube.
//! Downstream elements outside the contracted slipstream see the freestream.
//!
//! TODO: validate contraction against coaxial test data.

use crate::error::{SolverError, SolverResult};
use rb_core::numeric::interp_linear;
use rb_rotor::RotorOperatingState;

/// Asymptotic contraction ratio of a hovering rotor wake
const KAPPA_FAR: f64 = 0.78;
/// Contraction rate constant and its thrust-coefficient slope
const LAMBDA_0: f64 = 0.145;
const LAMBDA_CT: f64 = 27.0;

/// Slipstream radius over rotor radius at `spacing` (in rotor radii)
/// downstream of a rotor with helicopter thrust coefficient `ct`.
pub fn contraction_ratio(ct: f64, spacing: f64) -> f64 {
    let rate = LAMBDA_0 + LAMBDA_CT * ct.max(0.0);
    KAPPA_FAR + (1.0 - KAPPA_FAR) * (-rate * spacing.max(0.0)).exp()
}

/// Velocity field imposed on a downstream rotor, one value per element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpstreamField {
    /// Axial velocity [m/s]
    pub axial: Vec<f64>,
    /// Swirl along the downstream rotation direction [m/s]
    pub tangential: Vec<f64>,
}

/// Map the solved `upstream` rotor onto the elements of `downstream`.
pub fn wake_contraction(
    upstream: &RotorOperatingState,
    downstream: &RotorOperatingState,
) -> SolverResult<UpstreamField> {
    let perf = upstream
        .performance
        .as_ref()
        .ok_or_else(|| SolverError::InvalidConfig {
            what: format!("upstream rotor '{}' has not been solved", upstream.rotor.name),
        })?;
    let radius = upstream.rotor.radius();
    let spacing = downstream.rotor.position - upstream.rotor.position;
    if !(spacing > 0.0) {
        return Err(SolverError::InvalidConfig {
            what: format!(
                "rotor '{}' must sit downstream of '{}'",
                downstream.rotor.name, upstream.rotor.name
            ),
        });
    }

    let tip_speed = upstream.tip_speed();
    let ct = perf.thrust / (upstream.fluid.density * upstream.rotor.disk_area() * tip_speed * tip_speed);
    let kappa = contraction_ratio(ct, spacing / radius);

    let y_up: Vec<f64> = upstream
        .rotor
        .blade()
        .elements()
        .iter()
        .map(|e| e.absolute_radius)
        .collect();
    let v_ind: Vec<f64> = upstream.elements.iter().map(|e| e.induced_vel_axial()).collect();
    let u_ind: Vec<f64> = upstream
        .elements
        .iter()
        .map(|e| e.induced_vel_tangential())
        .collect();
    let v_free = upstream.op.speed;

    let mut field = UpstreamField::default();
    for e in downstream.rotor.blade().elements() {
        let y = e.absolute_radius;
        if y <= kappa * radius {
            let y_src = y / kappa;
            let v = interp_linear(&y_up, &v_ind, y_src, true);
            let u = interp_linear(&y_up, &u_ind, y_src, true);
            field.axial.push((v_free + v) / (kappa * kappa));
            field.tangential.push(2.0 * u / kappa);
        } else {
            field.axial.push(downstream.op.speed);
            field.tangential.push(0.0);
        }
    }
    Ok(field)
}
