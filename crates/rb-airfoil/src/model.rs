//! Airfoil coefficient provider trait.

use crate::error::{AirfoilError, AirfoilResult};

/// Lift and drag coefficients at one (α, Re) point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AeroCoeffs {
    pub cl: f64,
    pub cd: f64,
}

impl AeroCoeffs {
    pub fn new(cl: f64, cd: f64) -> Self {
        Self { cl, cd }
    }

    /// Coefficients a provider returns when it has no data for the request.
    pub fn missing() -> Self {
        Self {
            cl: f64::NAN,
            cd: f64::NAN,
        }
    }

    /// True when either coefficient is NaN.
    pub fn is_missing(&self) -> bool {
        self.cl.is_nan() || self.cd.is_nan()
    }
}

/// Source of sectional lift and drag coefficients.
///
/// Implementations must be thread-safe (Send + Sync) so that independent
/// operating points can be solved in parallel against one shared provider.
///
/// A request outside the provider's data range with extrapolation disabled
/// returns [`AeroCoeffs::missing`] rather than an error: the solvers decide
/// how fatal that is and attach element context to the report.
pub trait AirfoilCoeffProvider: Send + Sync {
    /// Provider name for diagnostics.
    fn name(&self) -> &str;

    /// Number of airfoils addressable by index.
    fn n_airfoils(&self) -> usize;

    /// Lift and drag coefficients.
    ///
    /// # Arguments
    /// * `airfoil` - Airfoil index (foreign key from the blade element)
    /// * `alpha` - Angle of attack [rad]
    /// * `reynolds` - Chord Reynolds number
    fn coeffs(&self, airfoil: usize, alpha: f64, reynolds: f64) -> AirfoilResult<AeroCoeffs>;

    /// Lift-curve slope dCl/dα [1/rad] of the linear range at `reynolds`.
    ///
    /// Default implementation takes a central difference of `coeffs` over
    /// ±2° around zero incidence.
    fn lift_slope(&self, airfoil: usize, reynolds: f64) -> AirfoilResult<f64> {
        let h = 2.0_f64.to_radians();
        let up = self.coeffs(airfoil, h, reynolds)?;
        let down = self.coeffs(airfoil, -h, reynolds)?;
        let slope = (up.cl - down.cl) / (2.0 * h);
        if slope.is_finite() {
            Ok(slope)
        } else {
            Err(AirfoilError::SlopeUnavailable {
                what: "no lift data around zero incidence",
            })
        }
    }

    /// Batch lookup over element arrays of equal length.
    fn coeffs_many(
        &self,
        airfoils: &[usize],
        alpha: &[f64],
        reynolds: &[f64],
    ) -> AirfoilResult<Vec<AeroCoeffs>> {
        if airfoils.len() != alpha.len() || alpha.len() != reynolds.len() {
            return Err(AirfoilError::InvalidArg {
                what: "airfoil, alpha and reynolds arrays must have equal length",
            });
        }
        airfoils
            .iter()
            .zip(alpha)
            .zip(reynolds)
            .map(|((&af, &a), &re)| self.coeffs(af, a, re))
            .collect()
    }
}

/// Validate an airfoil index against a provider size.
pub(crate) fn check_index(index: usize, count: usize) -> AirfoilResult<()> {
    if index < count {
        Ok(())
    } else {
        Err(AirfoilError::UnknownAirfoil { index, count })
    }
}
