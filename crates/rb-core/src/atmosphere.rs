//! International Standard Atmosphere (ISA) up to 20 km.
//!
//! The solver only needs density, kinematic viscosity and speed of sound at
//! the operating altitude; [`Atmosphere`] is the seam through which the
//! orchestration layer obtains them.

use crate::error::{RbError, RbResult};
use crate::units::constants::{G0_MPS2, GAMMA_AIR, R_AIR};
use crate::units::{Density, KinVisc, si};

/// Fluid properties at one altitude.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FluidProperties {
    /// Static temperature [K]
    pub temperature: f64,
    /// Static pressure [Pa]
    pub pressure: f64,
    /// Density [kg/m³]
    pub density: f64,
    /// Dynamic viscosity [Pa·s]
    pub dynamic_viscosity: f64,
    /// Speed of sound [m/s]
    pub speed_of_sound: f64,
}

impl FluidProperties {
    /// Kinematic viscosity [m²/s]
    pub fn kinematic_viscosity(&self) -> f64 {
        self.dynamic_viscosity / self.density
    }

    /// Fixed properties given density and kinematic viscosity.
    ///
    /// Temperature and pressure are derived from the ideal gas law assuming
    /// sea-level temperature, which only matters for reporting.
    pub fn fixed(density: f64, kinematic_viscosity: f64) -> RbResult<Self> {
        if !(density > 0.0) {
            return Err(RbError::InvalidArg {
                what: "density must be positive",
            });
        }
        if !(kinematic_viscosity > 0.0) {
            return Err(RbError::InvalidArg {
                what: "kinematic viscosity must be positive",
            });
        }
        let temperature = Isa::T0;
        Ok(Self {
            temperature,
            pressure: density * R_AIR * temperature,
            density,
            dynamic_viscosity: kinematic_viscosity * density,
            speed_of_sound: (GAMMA_AIR * R_AIR * temperature).sqrt(),
        })
    }

    /// [`FluidProperties::fixed`] from typed quantities.
    pub fn from_quantities(density: Density, kinematic_viscosity: KinVisc) -> RbResult<Self> {
        Self::fixed(
            si::kilograms_per_cubic_meter(density),
            si::square_meters_per_second(kinematic_viscosity),
        )
    }
}

/// Source of fluid properties as a function of altitude.
pub trait Atmosphere: Send + Sync {
    fn properties(&self, altitude: f64) -> RbResult<FluidProperties>;
}

/// ISA troposphere (linear lapse) and lower stratosphere (isothermal).
#[derive(Clone, Copy, Debug, Default)]
pub struct Isa;

impl Isa {
    pub const T0: f64 = 288.15;
    pub const P0: f64 = 101_325.0;
    pub const LAPSE: f64 = -0.0065;
    pub const TROPOPAUSE: f64 = 11_000.0;
    pub const CEILING: f64 = 20_000.0;

    // Sutherland's law constants for air
    const MU_REF: f64 = 1.716e-5;
    const T_REF: f64 = 273.15;
    const SUTHERLAND: f64 = 110.4;

    fn sutherland(t: f64) -> f64 {
        Self::MU_REF * (t / Self::T_REF).powf(1.5) * (Self::T_REF + Self::SUTHERLAND)
            / (t + Self::SUTHERLAND)
    }
}

impl Atmosphere for Isa {
    fn properties(&self, altitude: f64) -> RbResult<FluidProperties> {
        if !altitude.is_finite() {
            return Err(RbError::NonFinite {
                what: "altitude",
                value: altitude,
            });
        }
        if altitude < -1_000.0 || altitude > Self::CEILING {
            return Err(RbError::InvalidArg {
                what: "altitude outside ISA range [-1000, 20000] m",
            });
        }

        let (temperature, pressure) = if altitude <= Self::TROPOPAUSE {
            let t = Self::T0 + Self::LAPSE * altitude;
            let p = Self::P0 * (t / Self::T0).powf(-G0_MPS2 / (Self::LAPSE * R_AIR));
            (t, p)
        } else {
            let t11 = Self::T0 + Self::LAPSE * Self::TROPOPAUSE;
            let p11 = Self::P0 * (t11 / Self::T0).powf(-G0_MPS2 / (Self::LAPSE * R_AIR));
            let p = p11 * (-G0_MPS2 * (altitude - Self::TROPOPAUSE) / (R_AIR * t11)).exp();
            (t11, p)
        };

        Ok(FluidProperties {
            temperature,
            pressure,
            density: pressure / (R_AIR * temperature),
            dynamic_viscosity: Self::sutherland(temperature),
            speed_of_sound: (GAMMA_AIR * R_AIR * temperature).sqrt(),
        })
    }
}
