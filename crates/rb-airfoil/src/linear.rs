//! Thin-airfoil lift with a parabolic drag polar.

use crate::error::{AirfoilError, AirfoilResult};
use crate::model::{AeroCoeffs, AirfoilCoeffProvider, check_index};
use std::f64::consts::PI;

/// One linear airfoil section.
///
/// ```text
/// cl = slope * (alpha - alpha_0)
/// cd = cd0 + cd2 * cl^2
/// ```
///
/// With `cl_max` set, lift saturates at ±cl_max (a crude stall model).
#[derive(Clone, Debug, PartialEq)]
pub struct LinearSection {
    /// Lift-curve slope [1/rad]
    pub slope: f64,
    /// Zero-lift angle of attack [rad]
    pub alpha_0: f64,
    /// Zero-lift drag coefficient
    pub cd0: f64,
    /// Induced drag factor
    pub cd2: f64,
    /// Optional lift saturation
    pub cl_max: Option<f64>,
}

impl LinearSection {
    /// Thin-airfoil theory section (`cl = 2πα`) with constant drag.
    pub fn thin(cd0: f64) -> Self {
        Self {
            slope: 2.0 * PI,
            alpha_0: 0.0,
            cd0,
            cd2: 0.0,
            cl_max: None,
        }
    }

    pub fn validate(&self) -> AirfoilResult<()> {
        if !self.slope.is_finite() || self.slope <= 0.0 {
            return Err(AirfoilError::InvalidArg {
                what: "lift-curve slope must be positive",
            });
        }
        if !self.alpha_0.is_finite() {
            return Err(AirfoilError::InvalidArg {
                what: "zero-lift angle must be finite",
            });
        }
        if !(self.cd0 >= 0.0) || !(self.cd2 >= 0.0) {
            return Err(AirfoilError::NonPhysical {
                what: "drag polar coefficients must be non-negative",
            });
        }
        if let Some(cl_max) = self.cl_max {
            if !(cl_max > 0.0) {
                return Err(AirfoilError::InvalidArg {
                    what: "cl_max must be positive",
                });
            }
        }
        Ok(())
    }

    fn eval(&self, alpha: f64) -> AeroCoeffs {
        let mut cl = self.slope * (alpha - self.alpha_0);
        if let Some(cl_max) = self.cl_max {
            cl = cl.clamp(-cl_max, cl_max);
        }
        AeroCoeffs::new(cl, self.cd0 + self.cd2 * cl * cl)
    }
}

/// Provider made of linear sections, one per airfoil index.
#[derive(Clone, Debug)]
pub struct LinearAirfoils {
    sections: Vec<LinearSection>,
}

impl LinearAirfoils {
    pub fn new(sections: Vec<LinearSection>) -> AirfoilResult<Self> {
        if sections.is_empty() {
            return Err(AirfoilError::InvalidArg {
                what: "at least one section is required",
            });
        }
        for section in &sections {
            section.validate()?;
        }
        Ok(Self { sections })
    }

    /// Single thin airfoil (`cl = 2πα`, constant `cd0`).
    pub fn thin(cd0: f64) -> AirfoilResult<Self> {
        Self::new(vec![LinearSection::thin(cd0)])
    }

    pub fn sections(&self) -> &[LinearSection] {
        &self.sections
    }
}

impl AirfoilCoeffProvider for LinearAirfoils {
    fn name(&self) -> &str {
        "linear"
    }

    fn n_airfoils(&self) -> usize {
        self.sections.len()
    }

    fn coeffs(&self, airfoil: usize, alpha: f64, _reynolds: f64) -> AirfoilResult<AeroCoeffs> {
        check_index(airfoil, self.sections.len())?;
        if alpha.is_nan() {
            return Ok(AeroCoeffs::missing());
        }
        Ok(self.sections[airfoil].eval(alpha))
    }

    fn lift_slope(&self, airfoil: usize, _reynolds: f64) -> AirfoilResult<f64> {
        check_index(airfoil, self.sections.len())?;
        Ok(self.sections[airfoil].slope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thin_airfoil_lift() {
        let af = LinearAirfoils::thin(0.01).unwrap();
        let c = af.coeffs(0, 0.1, 1e6).unwrap();
        assert!((c.cl - 2.0 * PI * 0.1).abs() < 1e-12);
        assert_eq!(c.cd, 0.01);
    }

    #[test]
    fn drag_polar_and_stall_clamp() {
        let section = LinearSection {
            slope: 6.0,
            alpha_0: -0.02,
            cd0: 0.008,
            cd2: 0.01,
            cl_max: Some(1.2),
        };
        let af = LinearAirfoils::new(vec![section]).unwrap();

        let c = af.coeffs(0, 0.08, 1e6).unwrap();
        assert!((c.cl - 0.6).abs() < 1e-12);
        assert!((c.cd - (0.008 + 0.01 * 0.36)).abs() < 1e-12);

        let stalled = af.coeffs(0, 1.0, 1e6).unwrap();
        assert_eq!(stalled.cl, 1.2);
    }

    #[test]
    fn slope_is_exact() {
        let af = LinearAirfoils::thin(0.01).unwrap();
        assert_eq!(af.lift_slope(0, 5e5).unwrap(), 2.0 * PI);
    }

    #[test]
    fn invalid_sections_are_rejected() {
        assert!(LinearAirfoils::new(vec![]).is_err());
        let mut bad = LinearSection::thin(0.01);
        bad.cd0 = -0.1;
        assert!(LinearAirfoils::new(vec![bad]).is_err());
    }

    #[test]
    fn nan_alpha_gives_missing_coeffs() {
        let af = LinearAirfoils::thin(0.01).unwrap();
        assert!(af.coeffs(0, f64::NAN, 1e5).unwrap().is_missing());
    }
}
