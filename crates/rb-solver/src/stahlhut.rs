//! Per-element root find on the inflow angle (Stahlhut & Leishman).
//!
//! Momentum and blade-element balances collapse into one residual g(φ) per
//! element. It holds in climb, hover and descent alike, at the price of a
//! bracketed root find whose failure is fatal: no fallback estimate of φ
//! exists.
//!
//! ```text
//! g(φ)  = (V_tg·sinφ − V_ax·cosφ)·sinφ
//!         − sgn₁(φ)·σ/(8r)·[V_tg·cx/K_T + V_ax·cy/K_P]
//! b1(φ) = sinφ − σ·cx / (8·K_T·r·|sinφ|)
//! b2(φ) = cosφ + σ·cy / (8·K_P·r·|sinφ|)
//! ```
//!
//! `cx = cl·cosφ − cd·sinφ` and `cy = cl·sinφ + cd·cosφ` are the expanded
//! forms of `cl·secγ·cos(φ+γ)` and `cl·secγ·sin(φ+γ)` with `γ = atan(cd/cl)`;
//! they stay defined at zero lift.

use crate::common::{element_geometry, fetch_coeffs, force_coeffs};
use crate::config::{LossType, ModelConfig, SolveReport, SolverKind};
use crate::error::{SolverError, SolverResult};
use crate::loss::{loss_factor_at, loss_split};
use crate::root::{ResidualCurve, RootConfig, RootFailure, brent};
use rb_airfoil::AirfoilCoeffProvider;
use rb_rotor::RotorOperatingState;
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, error};

const NAME: &str = "stahlhut";

/// Stand-in for φ = 0 at the end of a bracket, where csc|φ| is singular.
pub const IND_ANGLE_ZERO: f64 = 1e-6;

/// Root-finder abscissa tolerance per unit of convergence tolerance [rad]
const ANGLE_TOL_SCALE: f64 = 1e-3;

/// Signum with `sgn₁(0) = +1`.
///
/// The hover derivation of the residual assumes this convention; with the
/// usual signum the load term would vanish at φ = 0.
#[inline]
pub fn sgn1(x: f64) -> f64 {
    if x >= 0.0 { 1.0 } else { -1.0 }
}

/// Search interval for the inflow angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bracket {
    pub lo: f64,
    pub hi: f64,
}

impl Bracket {
    /// `[0, π/2]`
    pub const CLIMB: Bracket = Bracket {
        lo: 0.0,
        hi: FRAC_PI_2,
    };
    /// `[−π/2, 0]`
    pub const DESCENT: Bracket = Bracket {
        lo: -FRAC_PI_2,
        hi: 0.0,
    };

    /// Same interval with a zero end point replaced by ±[`IND_ANGLE_ZERO`].
    pub fn nudged(self) -> (f64, f64) {
        let lo = if self.lo == 0.0 { IND_ANGLE_ZERO } else { self.lo };
        let hi = if self.hi == 0.0 { -IND_ANGLE_ZERO } else { self.hi };
        (lo, hi)
    }

    pub fn degrees(self) -> (f64, f64) {
        (self.lo.to_degrees(), self.hi.to_degrees())
    }
}

/// Bracket for one element from its axial inflow.
///
/// `g_at_zero` is only evaluated when the inflow is exactly zero: then
/// `g(0) ≤ 0` selects the climb bracket and `g(0) > 0` the descent one.
pub fn select_bracket(axial_inflow: f64, g_at_zero: impl FnOnce() -> f64) -> Bracket {
    if axial_inflow > 0.0 {
        Bracket::CLIMB
    } else if axial_inflow < 0.0 {
        Bracket::DESCENT
    } else if g_at_zero() <= 0.0 {
        Bracket::CLIMB
    } else {
        Bracket::DESCENT
    }
}

/// Residual and auxiliary terms at one inflow angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Residual {
    pub g: f64,
    pub b1: f64,
    pub b2: f64,
}

/// Inputs of g(φ) for one element.
#[derive(Clone, Copy, Debug)]
pub struct ElementResidual {
    pub n_blades: usize,
    pub loss: LossType,
    /// y/R
    pub r: f64,
    /// Root cutout over tip radius
    pub r0: f64,
    pub sigma: f64,
    pub pitch: f64,
    pub axial_inflow: f64,
    pub tangential_inflow: f64,
    pub airfoil: usize,
    pub reynolds: f64,
}

impl ElementResidual {
    /// Evaluate g, b1 and b2. Missing aerodynamic data gives NaN terms.
    pub fn eval(
        &self,
        provider: &dyn AirfoilCoeffProvider,
        phi: f64,
    ) -> rb_airfoil::AirfoilResult<Residual> {
        let f = loss_factor_at(self.n_blades, self.r, self.r0, phi, self.loss);
        let (k_t, k_p) = loss_split(f, phi);
        let coeffs = provider.coeffs(self.airfoil, self.pitch - phi, self.reynolds)?;
        let (cx, cy) = force_coeffs(coeffs, phi);
        let (sin, cos) = phi.sin_cos();
        let k = self.sigma / (8.0 * self.r);

        let g = (self.tangential_inflow * sin - self.axial_inflow * cos) * sin
            - sgn1(phi) * k * (self.tangential_inflow * cx / k_t + self.axial_inflow * cy / k_p);
        Ok(Residual {
            g,
            b1: sin - k * cx / (k_t * sin.abs()),
            b2: cos + k * cy / (k_p * sin.abs()),
        })
    }
}

pub fn solve(
    state: &mut RotorOperatingState,
    config: &ModelConfig,
    provider: &dyn AirfoilCoeffProvider,
) -> SolverResult<SolveReport> {
    let geom = element_geometry(state, config.solidity);
    let r0 = state.rotor.root_cutout() / state.rotor.radius();
    let tip_speed = state.tip_speed();
    let root_cfg = RootConfig {
        x_tol: config.convergence_tol * ANGLE_TOL_SCALE,
        max_iterations: config.max_iter,
    };

    let residuals: Vec<ElementResidual> = state
        .elements
        .iter()
        .zip(&geom)
        .map(|(e, g)| ElementResidual {
            n_blades: state.rotor.n_blades,
            loss: config.loss,
            r: g.r,
            r0,
            sigma: g.sigma,
            pitch: e.true_pitch,
            axial_inflow: e.axial_inflow,
            tangential_inflow: e.tangential_inflow,
            airfoil: e.airfoil,
            reynolds: e.reynolds,
        })
        .collect();

    let mut phi = Vec::with_capacity(residuals.len());
    let mut iterations = 0;
    for (i, res) in residuals.iter().enumerate() {
        let mut lookup_error = None;
        let mut g = |x: f64| match res.eval(provider, x) {
            Ok(r) => r.g,
            Err(e) => {
                lookup_error.get_or_insert(e);
                f64::NAN
            }
        };

        let mut g_zero = None;
        let bracket = select_bracket(res.axial_inflow, || *g_zero.insert(g(0.0)));
        if g_zero == Some(0.0) {
            // Idle element: no load and no through-flow
            debug!(solver = NAME, element = i, "idle element at zero inflow angle");
            phi.push(0.0);
            continue;
        }
        let (lo, hi) = bracket.nudged();
        let outcome = brent(&mut g, lo, hi, &root_cfg);
        if let Some(e) = lookup_error {
            return Err(e.into());
        }

        match outcome {
            Ok(root) => {
                iterations = iterations.max(root.iterations);
                phi.push(root.root);
            }
            Err(failure) => {
                if let RootFailure::NonFinite { x } = failure {
                    return Err(SolverError::InvalidAeroData {
                        solver: NAME,
                        element: i,
                        alpha_deg: (res.pitch - x).to_degrees(),
                        reynolds: res.reynolds,
                    });
                }
                let curve = ResidualCurve::sample(
                    |x| res.eval(provider, x).map(|r| r.g).unwrap_or(f64::NAN),
                    lo,
                    hi,
                    ResidualCurve::DEFAULT_SAMPLES,
                );
                error!(
                    solver = NAME,
                    element = i,
                    lo_deg = bracket.lo.to_degrees(),
                    hi_deg = bracket.hi.to_degrees(),
                    ?failure,
                    "no inflow angle found"
                );
                return Err(SolverError::NoRoot {
                    solver: NAME,
                    element: i,
                    bracket_deg: bracket.degrees(),
                    diagnostic: Box::new(curve),
                });
            }
        }
    }

    for (i, e) in state.elements.iter_mut().enumerate() {
        let alpha = e.true_pitch - phi[i];
        e.set_inflow_angle(phi[i]);
        fetch_coeffs(e, provider, alpha, NAME, i)?;

        if phi[i] == 0.0 {
            // b2 is unbounded at φ = 0; an idle annulus carries no swirl
            e.set_swirl_ratio(e.tangential_inflow / tip_speed);
            e.set_inflow_ratio(0.0);
            continue;
        }
        let res = residuals[i].eval(provider, phi[i])?;
        let xi = e.tangential_inflow / tip_speed * phi[i].cos() / res.b2;
        e.set_swirl_ratio(xi);
        e.set_inflow_ratio(xi * phi[i].tan());
    }

    debug!(solver = NAME, iterations, "solved");
    Ok(SolveReport::converged(SolverKind::Stahlhut, iterations))
}
