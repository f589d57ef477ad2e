// rb-core/src/units.rs

use uom::si::f64::{
    Angle as UomAngle, AngularVelocity as UomAngularVelocity,
    DiffusionCoefficient, Length as UomLength,
    MassDensity as UomMassDensity, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type AngularVelocity = UomAngularVelocity;
pub type KinVisc = DiffusionCoefficient;
pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type Velocity = UomVelocity;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn rpm(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::revolution_per_minute;
    AngularVelocity::new::<revolution_per_minute>(v)
}

#[inline]
pub fn rad_per_s(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::radian_per_second;
    AngularVelocity::new::<radian_per_second>(v)
}

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn m2_per_s(v: f64) -> KinVisc {
    use uom::si::diffusion_coefficient::square_meter_per_second;
    KinVisc::new::<square_meter_per_second>(v)
}

/// SI magnitude helpers used at the boundary between typed inputs and the
/// plain `f64` solver loops.
pub mod si {
    use super::*;

    #[inline]
    pub fn meters(v: Length) -> f64 {
        v.get::<uom::si::length::meter>()
    }

    #[inline]
    pub fn meters_per_second(v: Velocity) -> f64 {
        v.get::<uom::si::velocity::meter_per_second>()
    }

    #[inline]
    pub fn radians_per_second(v: AngularVelocity) -> f64 {
        v.get::<uom::si::angular_velocity::radian_per_second>()
    }

    #[inline]
    pub fn radians(v: Angle) -> f64 {
        v.get::<uom::si::angle::radian>()
    }

    #[inline]
    pub fn kilograms_per_cubic_meter(v: Density) -> f64 {
        v.get::<uom::si::mass_density::kilogram_per_cubic_meter>()
    }

    #[inline]
    pub fn square_meters_per_second(v: KinVisc) -> f64 {
        v.get::<uom::si::diffusion_coefficient::square_meter_per_second>()
    }
}

pub mod constants {
    pub const G0_MPS2: f64 = 9.806_65;

    /// Specific gas constant of dry air [J/(kg·K)]
    pub const R_AIR: f64 = 287.052_87;

    /// Ratio of specific heats of air
    pub const GAMMA_AIR: f64 = 1.4;
}
