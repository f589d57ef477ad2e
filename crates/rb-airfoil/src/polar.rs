//! Tabulated airfoil polars.
//!
//! Each airfoil holds one [`PolarCurve`] per Reynolds number. A lookup
//! interpolates every curve in angle of attack, then interpolates linearly
//! between the two curves bracketing the requested Reynolds number, clamped to
//! the table ends.
//!
//! Outside the tabulated angle range the [`Extrapolation`] policy decides:
//! - `Disabled`: NaN coefficients (caller must treat as an error)
//! - `Linear`: extend the end segments
//! - `Viterna`: Viterna–Corrigan flat-plate blending up to ±90°

use crate::error::{AirfoilError, AirfoilResult};
use crate::model::{AeroCoeffs, AirfoilCoeffProvider, check_index};
use rb_core::numeric::interp_linear;
use std::f64::consts::FRAC_PI_2;

/// Default angle-of-attack window for the lift slope fit [rad]
const SLOPE_FIT_MIN: f64 = -5.0 * std::f64::consts::PI / 180.0;
const SLOPE_FIT_MAX: f64 = 5.0 * std::f64::consts::PI / 180.0;

/// Post-range angle-of-attack policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Extrapolation {
    Disabled,
    Linear,
    /// Viterna–Corrigan with the given maximum drag coefficient
    /// (flat plate: ~2.0, or 1.11 + 0.018·AR for a finite blade).
    Viterna { cd_max: f64 },
}

impl Default for Extrapolation {
    fn default() -> Self {
        Extrapolation::Viterna { cd_max: 2.0 }
    }
}

/// One polar at a fixed Reynolds number.
#[derive(Clone, Debug, PartialEq)]
pub struct PolarCurve {
    pub reynolds: f64,
    /// Angles of attack [rad], strictly increasing
    pub alpha: Vec<f64>,
    pub cl: Vec<f64>,
    pub cd: Vec<f64>,
}

impl PolarCurve {
    pub fn new(reynolds: f64, alpha: Vec<f64>, cl: Vec<f64>, cd: Vec<f64>) -> AirfoilResult<Self> {
        if !(reynolds > 0.0) {
            return Err(AirfoilError::InvalidArg {
                what: "polar Reynolds number must be positive",
            });
        }
        if alpha.len() < 2 {
            return Err(AirfoilError::InvalidArg {
                what: "polar needs at least two angles of attack",
            });
        }
        if cl.len() != alpha.len() || cd.len() != alpha.len() {
            return Err(AirfoilError::InvalidArg {
                what: "polar alpha, cl and cd must have equal length",
            });
        }
        if alpha.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(AirfoilError::InvalidArg {
                what: "polar angles of attack must be strictly increasing",
            });
        }
        if cl.iter().chain(&cd).any(|v| !v.is_finite()) {
            return Err(AirfoilError::NonPhysical {
                what: "polar coefficients must be finite",
            });
        }
        if cd.iter().any(|&v| v < 0.0) {
            return Err(AirfoilError::NonPhysical {
                what: "polar drag must be non-negative",
            });
        }
        Ok(Self {
            reynolds,
            alpha,
            cl,
            cd,
        })
    }

    fn first(&self) -> (f64, f64, f64) {
        (self.alpha[0], self.cl[0], self.cd[0])
    }

    fn last(&self) -> (f64, f64, f64) {
        let n = self.alpha.len() - 1;
        (self.alpha[n], self.cl[n], self.cd[n])
    }

    fn eval(&self, alpha: f64, extrap: Extrapolation) -> AeroCoeffs {
        let (a_min, _, _) = self.first();
        let (a_max, _, _) = self.last();
        if alpha >= a_min && alpha <= a_max {
            return AeroCoeffs::new(
                interp_linear(&self.alpha, &self.cl, alpha, false),
                interp_linear(&self.alpha, &self.cd, alpha, false),
            );
        }

        match extrap {
            Extrapolation::Disabled => AeroCoeffs::missing(),
            Extrapolation::Linear => AeroCoeffs::new(
                interp_linear(&self.alpha, &self.cl, alpha, true),
                interp_linear(&self.alpha, &self.cd, alpha, true).max(0.0),
            ),
            Extrapolation::Viterna { cd_max } => {
                if alpha > a_max {
                    viterna(alpha, self.last(), cd_max)
                } else {
                    // Mirror the negative side onto the positive formula
                    let (a_s, cl_s, cd_s) = self.first();
                    let mirrored = viterna(-alpha, (-a_s, -cl_s, cd_s), cd_max);
                    AeroCoeffs::new(-mirrored.cl, mirrored.cd)
                }
            }
        }
    }

    /// Least-squares slope of cl(α) over the linear window [rad⁻¹].
    fn linear_slope(&self) -> Option<f64> {
        let pts: Vec<(f64, f64)> = self
            .alpha
            .iter()
            .zip(&self.cl)
            .filter(|(a, _)| **a >= SLOPE_FIT_MIN && **a <= SLOPE_FIT_MAX)
            .map(|(a, c)| (*a, *c))
            .collect();
        if pts.len() < 2 {
            return None;
        }
        let n = pts.len() as f64;
        let mean_a = pts.iter().map(|p| p.0).sum::<f64>() / n;
        let mean_c = pts.iter().map(|p| p.1).sum::<f64>() / n;
        let sxy: f64 = pts.iter().map(|p| (p.0 - mean_a) * (p.1 - mean_c)).sum();
        let sxx: f64 = pts.iter().map(|p| (p.0 - mean_a).powi(2)).sum();
        if sxx <= 0.0 {
            return None;
        }
        Some(sxy / sxx)
    }
}

/// Viterna–Corrigan post-stall model anchored at `(alpha_s, cl_s, cd_s)`.
///
/// Valid for `alpha_s < alpha`; angles beyond 90° are clamped to 90°.
fn viterna(alpha: f64, (alpha_s, cl_s, cd_s): (f64, f64, f64), cd_max: f64) -> AeroCoeffs {
    let alpha = alpha.min(FRAC_PI_2);
    let (sin_s, cos_s) = alpha_s.sin_cos();
    let b1 = cd_max;
    let a1 = b1 / 2.0;
    let a2 = (cl_s - cd_max * sin_s * cos_s) * sin_s / (cos_s * cos_s);
    let b2 = (cd_s - cd_max * sin_s * sin_s) / cos_s;

    let (sin_a, cos_a) = alpha.sin_cos();
    let cl = a1 * (2.0 * alpha).sin() + a2 * cos_a * cos_a / sin_a;
    let cd = b1 * sin_a * sin_a + b2 * cos_a;
    AeroCoeffs::new(cl, cd.max(0.0))
}

/// All polars of one airfoil.
#[derive(Clone, Debug, PartialEq)]
pub struct Polar {
    pub name: String,
    /// Curves sorted by increasing Reynolds number
    curves: Vec<PolarCurve>,
}

impl Polar {
    pub fn new(name: impl Into<String>, mut curves: Vec<PolarCurve>) -> AirfoilResult<Self> {
        if curves.is_empty() {
            return Err(AirfoilError::InvalidArg {
                what: "polar needs at least one curve",
            });
        }
        curves.sort_by(|a, b| a.reynolds.total_cmp(&b.reynolds));
        if curves.windows(2).any(|w| w[0].reynolds == w[1].reynolds) {
            return Err(AirfoilError::InvalidArg {
                what: "duplicate Reynolds number in polar",
            });
        }
        Ok(Self {
            name: name.into(),
            curves,
        })
    }

    pub fn curves(&self) -> &[PolarCurve] {
        &self.curves
    }

    /// Bracketing curves and blend weight for the upper one.
    fn bracket(&self, reynolds: f64) -> (usize, usize, f64) {
        let n = self.curves.len();
        if n == 1 || reynolds <= self.curves[0].reynolds {
            return (0, 0, 0.0);
        }
        if reynolds >= self.curves[n - 1].reynolds {
            return (n - 1, n - 1, 0.0);
        }
        let hi = self.curves.partition_point(|c| c.reynolds <= reynolds);
        let lo = hi - 1;
        let t = (reynolds - self.curves[lo].reynolds)
            / (self.curves[hi].reynolds - self.curves[lo].reynolds);
        (lo, hi, t)
    }

    fn eval(&self, alpha: f64, reynolds: f64, extrap: Extrapolation) -> AeroCoeffs {
        let (lo, hi, t) = self.bracket(reynolds);
        let c_lo = self.curves[lo].eval(alpha, extrap);
        if lo == hi {
            return c_lo;
        }
        let c_hi = self.curves[hi].eval(alpha, extrap);
        AeroCoeffs::new(
            c_lo.cl + t * (c_hi.cl - c_lo.cl),
            c_lo.cd + t * (c_hi.cd - c_lo.cd),
        )
    }

    /// Lift slope interpolated (and extrapolated) in Reynolds number.
    fn slope(&self, reynolds: f64) -> AirfoilResult<f64> {
        let (re, slopes): (Vec<f64>, Vec<f64>) = self
            .curves
            .iter()
            .filter_map(|c| c.linear_slope().map(|s| (c.reynolds, s)))
            .unzip();
        if re.is_empty() {
            return Err(AirfoilError::SlopeUnavailable {
                what: "no polar has two points within ±5°",
            });
        }
        Ok(interp_linear(&re, &slopes, reynolds, true))
    }
}

/// Provider backed by tabulated polars.
#[derive(Clone, Debug)]
pub struct PolarTable {
    polars: Vec<Polar>,
    extrapolation: Extrapolation,
}

impl PolarTable {
    pub fn new(polars: Vec<Polar>, extrapolation: Extrapolation) -> AirfoilResult<Self> {
        if polars.is_empty() {
            return Err(AirfoilError::InvalidArg {
                what: "at least one airfoil polar is required",
            });
        }
        if let Extrapolation::Viterna { cd_max } = extrapolation {
            if !(cd_max > 0.0) {
                return Err(AirfoilError::InvalidArg {
                    what: "Viterna cd_max must be positive",
                });
            }
        }
        Ok(Self {
            polars,
            extrapolation,
        })
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    pub fn polars(&self) -> &[Polar] {
        &self.polars
    }
}

impl AirfoilCoeffProvider for PolarTable {
    fn name(&self) -> &str {
        "polar-table"
    }

    fn n_airfoils(&self) -> usize {
        self.polars.len()
    }

    fn coeffs(&self, airfoil: usize, alpha: f64, reynolds: f64) -> AirfoilResult<AeroCoeffs> {
        check_index(airfoil, self.polars.len())?;
        if alpha.is_nan() || reynolds.is_nan() {
            return Ok(AeroCoeffs::missing());
        }
        Ok(self.polars[airfoil].eval(alpha, reynolds, self.extrapolation))
    }

    fn lift_slope(&self, airfoil: usize, reynolds: f64) -> AirfoilResult<f64> {
        check_index(airfoil, self.polars.len())?;
        self.polars[airfoil].slope(reynolds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(reynolds: f64, slope: f64) -> PolarCurve {
        let alpha: Vec<f64> = (-10..=10).map(|d| (d as f64).to_radians()).collect();
        let cl = alpha.iter().map(|a| slope * a).collect();
        let cd = alpha.iter().map(|a| 0.01 + 0.5 * a * a).collect();
        PolarCurve::new(reynolds, alpha, cl, cd).unwrap()
    }

    fn table(extrapolation: Extrapolation) -> PolarTable {
        let polar = Polar::new("test", vec![curve(1e6, 6.0), curve(1e5, 5.0)]).unwrap();
        PolarTable::new(vec![polar], extrapolation).unwrap()
    }

    #[test]
    fn curves_are_sorted_by_reynolds() {
        let t = table(Extrapolation::Disabled);
        let re: Vec<f64> = t.polars()[0].curves().iter().map(|c| c.reynolds).collect();
        assert_eq!(re, vec![1e5, 1e6]);
    }

    #[test]
    fn interpolates_between_reynolds_numbers() {
        let t = table(Extrapolation::Disabled);
        let a = 0.05;
        let c = t.coeffs(0, a, 5.5e5).unwrap();
        assert!((c.cl - 5.5 * a).abs() < 1e-12);
    }

    #[test]
    fn clamps_outside_reynolds_range() {
        let t = table(Extrapolation::Disabled);
        let c = t.coeffs(0, 0.05, 1e8).unwrap();
        assert!((c.cl - 6.0 * 0.05).abs() < 1e-12);
    }

    #[test]
    fn disabled_extrapolation_yields_nan() {
        let t = table(Extrapolation::Disabled);
        assert!(t.coeffs(0, 0.5, 1e6).unwrap().is_missing());
    }

    #[test]
    fn linear_extrapolation_extends_segments() {
        let t = table(Extrapolation::Linear);
        let c = t.coeffs(0, 0.3, 1e6).unwrap();
        assert!((c.cl - 1.8).abs() < 1e-9);
    }

    #[test]
    fn viterna_is_continuous_at_table_end() {
        let t = table(Extrapolation::Viterna { cd_max: 2.0 });
        let a_end = 10.0_f64.to_radians();
        let inside = t.coeffs(0, a_end, 1e6).unwrap();
        let outside = t.coeffs(0, a_end + 1e-9, 1e6).unwrap();
        assert!((inside.cl - outside.cl).abs() < 1e-6);
        assert!((inside.cd - outside.cd).abs() < 1e-6);

        let neg_inside = t.coeffs(0, -a_end, 1e6).unwrap();
        let neg_outside = t.coeffs(0, -a_end - 1e-9, 1e6).unwrap();
        assert!((neg_inside.cl - neg_outside.cl).abs() < 1e-6);
    }

    #[test]
    fn viterna_reaches_flat_plate_drag_at_ninety_degrees() {
        let t = table(Extrapolation::Viterna { cd_max: 2.0 });
        let c = t.coeffs(0, FRAC_PI_2, 1e6).unwrap();
        assert!((c.cd - 2.0).abs() < 1e-9);
        assert!(c.cl.abs() < 1e-9);
    }

    #[test]
    fn lift_slope_interpolates_and_extrapolates() {
        let t = table(Extrapolation::Disabled);
        assert!((t.lift_slope(0, 5.5e5).unwrap() - 5.5).abs() < 1e-9);
        // Extrapolated beyond the last curve
        assert!((t.lift_slope(0, 1.9e6).unwrap() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_curves_are_rejected() {
        assert!(PolarCurve::new(1e5, vec![0.0], vec![0.0], vec![0.0]).is_err());
        assert!(PolarCurve::new(1e5, vec![0.1, 0.0], vec![0.0; 2], vec![0.0; 2]).is_err());
        assert!(PolarCurve::new(1e5, vec![0.0, 0.1], vec![0.0; 2], vec![-0.1, 0.0]).is_err());
        assert!(Polar::new("dup", vec![curve(1e5, 5.0), curve(1e5, 6.0)]).is_err());
    }
}
