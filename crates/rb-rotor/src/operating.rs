//! Operating points and the per-rotor state the solvers mutate.

use crate::element::ElementState;
use crate::error::{RotorError, RotorResult};
use crate::rotor::Rotor;
use rb_core::units::{Angle, AngularVelocity, Length, Velocity, si};
use rb_core::FluidProperties;
use std::f64::consts::PI;
use std::sync::Arc;

/// Flight condition of one rotor.
///
/// Built from typed quantities, stored as SI `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperatingPoint {
    /// Altitude [m]
    pub altitude: f64,
    /// Axial speed [m/s], positive in climb / forward flight
    pub speed: f64,
    /// Rotational speed [rad/s]
    pub omega: f64,
    /// Collective pitch [rad]
    pub collective: f64,
}

impl OperatingPoint {
    pub fn new(
        altitude: Length,
        speed: Velocity,
        omega: AngularVelocity,
        collective: Angle,
    ) -> RotorResult<Self> {
        let op = Self {
            altitude: si::meters(altitude),
            speed: si::meters_per_second(speed),
            omega: si::radians_per_second(omega),
            collective: si::radians(collective),
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> RotorResult<()> {
        if !(self.omega > 0.0) || !self.omega.is_finite() {
            return Err(RotorError::InvalidOperatingPoint {
                what: "rotational speed must be positive",
            });
        }
        if !self.speed.is_finite() || !self.altitude.is_finite() || !self.collective.is_finite() {
            return Err(RotorError::InvalidOperatingPoint {
                what: "altitude, speed and collective must be finite",
            });
        }
        Ok(())
    }

    /// Rotational speed [rpm]
    pub fn rpm(&self) -> f64 {
        self.omega * 60.0 / (2.0 * PI)
    }

    /// Revolutions per second
    pub fn rev_per_s(&self) -> f64 {
        self.omega / (2.0 * PI)
    }
}

/// Integrated rotor performance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotorPerformance {
    /// [N]
    pub thrust: f64,
    /// [N·m]
    pub torque: f64,
    /// [W]
    pub power: f64,
    pub power_induced: f64,
    pub power_profile: f64,
    /// T·V/P; not finite in hover or at zero power
    pub efficiency: f64,
    /// T^1.5 / (P·sqrt(2ρA))
    pub figure_of_merit: f64,
}

/// Everything the solvers read and write for one rotor at one operating point.
#[derive(Clone, Debug)]
pub struct RotorOperatingState {
    pub rotor: Arc<Rotor>,
    pub op: OperatingPoint,
    pub fluid: FluidProperties,
    pub elements: Vec<ElementState>,
    pub performance: Option<RotorPerformance>,
}

impl RotorOperatingState {
    pub fn new(rotor: Arc<Rotor>, op: OperatingPoint, fluid: FluidProperties) -> RotorResult<Self> {
        op.validate()?;
        let nu = fluid.kinematic_viscosity();
        if !(nu > 0.0) || !(fluid.density > 0.0) {
            return Err(RotorError::InvalidOperatingPoint {
                what: "fluid density and viscosity must be positive",
            });
        }

        let tip_speed = op.omega * rotor.radius();
        let elements = rotor
            .blade()
            .elements()
            .iter()
            .map(|e| {
                let tangential = op.omega * e.absolute_radius;
                let reynolds = op.speed.hypot(tangential) * e.chord / nu;
                ElementState::new(
                    e.airfoil_index,
                    tangential,
                    tip_speed,
                    reynolds,
                    e.twist + op.collective,
                    op.speed,
                )
            })
            .collect();

        Ok(Self {
            rotor,
            op,
            fluid,
            elements,
            performance: None,
        })
    }

    pub fn n_elem(&self) -> usize {
        self.elements.len()
    }

    pub fn tip_speed(&self) -> f64 {
        self.op.omega * self.rotor.radius()
    }

    /// Overwrite the upstream velocity field (coaxial stack).
    ///
    /// `axial` replaces the axial inflow. `tangential` is the upstream swirl,
    /// subtracted from Ω·y. All solver output is cleared.
    pub fn set_upstream_velocity(&mut self, axial: &[f64], tangential: &[f64]) -> RotorResult<()> {
        let n = self.n_elem();
        for (what, got) in [
            ("upstream axial velocity", axial.len()),
            ("upstream tangential velocity", tangential.len()),
        ] {
            if got != n {
                return Err(RotorError::LengthMismatch {
                    what,
                    expected: n,
                    got,
                });
            }
        }
        for ((e, &va), &vt) in self.elements.iter_mut().zip(axial).zip(tangential) {
            e.axial_inflow = va;
            e.tangential_inflow = e.tangential_speed - vt;
            e.reset();
        }
        self.performance = None;
        Ok(())
    }

    /// Restore freestream inflow on every element.
    pub fn reset_upstream(&mut self) {
        let v = self.op.speed;
        for e in &mut self.elements {
            e.axial_inflow = v;
            e.tangential_inflow = e.tangential_speed;
        }
    }

    /// Clear solver output and integrated performance.
    pub fn reset(&mut self) {
        self.elements.iter_mut().for_each(ElementState::reset);
        self.performance = None;
    }
}
