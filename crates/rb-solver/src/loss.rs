//! Prandtl tip and hub loss.

use crate::config::LossType;
use crate::error::{SolverError, SolverResult};
use std::f64::consts::PI;

/// Prandtl's g(f) = (2/π)·acos(exp(−f)), capped at 1 against rounding.
#[inline]
fn prandtl(f: f64) -> f64 {
    (2.0 / PI * (-f).exp().acos()).min(1.0)
}

/// Loss factor F at one element.
///
/// `r` and `r0` are radii relative to the tip radius. The inflow angle enters
/// through |sin φ| so that descent (φ < 0) is handled like its mirror.
pub fn loss_factor_at(n_blades: usize, r: f64, r0: f64, phi: f64, loss: LossType) -> f64 {
    if loss == LossType::None {
        return 1.0;
    }
    let b = n_blades as f64;
    let denom = r * phi.sin().abs();
    let tip = || prandtl(0.5 * b * (1.0 - r) / denom);
    let hub = || prandtl(0.5 * b * (r - r0) / denom);
    match loss {
        LossType::None => 1.0,
        LossType::Tip => tip(),
        LossType::Hub => hub(),
        LossType::All => tip() * hub(),
    }
}

/// Loss factor for every element.
pub fn loss_factor(
    n_blades: usize,
    r: &[f64],
    r0: f64,
    phi: &[f64],
    loss: LossType,
) -> SolverResult<Vec<f64>> {
    if r.len() != phi.len() {
        return Err(SolverError::InvalidConfig {
            what: format!(
                "loss factor inputs differ in length ({} radii, {} angles)",
                r.len(),
                phi.len()
            ),
        });
    }
    Ok(r
        .iter()
        .zip(phi)
        .map(|(&ri, &p)| loss_factor_at(n_blades, ri, r0, p, loss))
        .collect())
}

/// Loss split applied to the thrust (`K_T`) and torque (`K_P`) momentum
/// balances.
#[inline]
pub fn loss_split(f: f64, phi: f64) -> (f64, f64) {
    (1.0 - (1.0 - f) * phi.cos(), 1.0 - (1.0 - f) * phi.sin())
}
