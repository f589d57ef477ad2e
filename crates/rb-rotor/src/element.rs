//! Per-element flow state.
//!
//! The induced velocities are the only stored representation of the induced
//! flow. Inflow/swirl ratios and induction factors are derived on demand, and
//! the ratio setters write back into the induced velocities.

use rb_airfoil::{AeroCoeffs, AirfoilCoeffProvider, AirfoilResult};

/// Elemental loads written by force integration (all blades included).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementForces {
    /// Lift of one blade element [N]
    pub d_lift: f64,
    /// Drag of one blade element [N]
    pub d_drag: f64,
    /// Thrust [N]
    pub d_thrust: f64,
    /// Torque [N·m]
    pub d_torque: f64,
    /// Induced power [W]
    pub d_power_induced: f64,
    /// Profile power [W]
    pub d_power_profile: f64,
    /// Total power [W]; always `d_power_induced + d_power_profile`
    pub d_power: f64,
}

/// Flow state of one blade element at one operating point.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementState {
    /// Airfoil index of the element
    pub airfoil: usize,
    /// Ω·y [m/s]
    pub tangential_speed: f64,
    /// Ω·R [m/s]
    pub tip_speed: f64,
    /// Chord Reynolds number
    pub reynolds: f64,
    /// Twist + collective [rad]
    pub true_pitch: f64,
    /// Axial velocity arriving at the element, freestream unless overwritten
    /// by an upstream rotor [m/s]
    pub axial_inflow: f64,
    /// Tangential velocity seen by the element (Ω·y minus upstream swirl) [m/s]
    pub tangential_inflow: f64,

    inflow_angle: f64,
    angle_of_attack: f64,
    cl: f64,
    cd: f64,
    induced_vel_axial: f64,
    induced_vel_tangential: f64,
    forces: Option<ElementForces>,
}

impl ElementState {
    pub fn new(
        airfoil: usize,
        tangential_speed: f64,
        tip_speed: f64,
        reynolds: f64,
        true_pitch: f64,
        axial_inflow: f64,
    ) -> Self {
        Self {
            airfoil,
            tangential_speed,
            tip_speed,
            reynolds,
            true_pitch,
            axial_inflow,
            tangential_inflow: tangential_speed,
            inflow_angle: f64::NAN,
            angle_of_attack: f64::NAN,
            cl: f64::NAN,
            cd: f64::NAN,
            induced_vel_axial: 0.0,
            induced_vel_tangential: 0.0,
            forces: None,
        }
    }

    /// Clear everything a solver or force integration wrote.
    pub fn reset(&mut self) {
        self.inflow_angle = f64::NAN;
        self.angle_of_attack = f64::NAN;
        self.cl = f64::NAN;
        self.cd = f64::NAN;
        self.induced_vel_axial = 0.0;
        self.induced_vel_tangential = 0.0;
        self.forces = None;
    }

    pub fn inflow_angle(&self) -> f64 {
        self.inflow_angle
    }

    pub fn set_inflow_angle(&mut self, phi: f64) {
        self.inflow_angle = phi;
    }

    pub fn angle_of_attack(&self) -> f64 {
        self.angle_of_attack
    }

    pub fn cl(&self) -> f64 {
        self.cl
    }

    pub fn cd(&self) -> f64 {
        self.cd
    }

    /// Set α and refetch cl/cd from `provider` at the element's Reynolds number.
    ///
    /// The returned coefficients may be [`AeroCoeffs::missing`]; they are
    /// stored as-is and the caller decides what to do with them.
    pub fn set_angle_of_attack(
        &mut self,
        provider: &dyn AirfoilCoeffProvider,
        alpha: f64,
    ) -> AirfoilResult<AeroCoeffs> {
        let coeffs = provider.coeffs(self.airfoil, alpha, self.reynolds)?;
        self.angle_of_attack = alpha;
        self.cl = coeffs.cl;
        self.cd = coeffs.cd;
        Ok(coeffs)
    }

    pub fn induced_vel_axial(&self) -> f64 {
        self.induced_vel_axial
    }

    pub fn induced_vel_tangential(&self) -> f64 {
        self.induced_vel_tangential
    }

    pub fn set_induced_velocities(&mut self, axial: f64, tangential: f64) {
        self.induced_vel_axial = axial;
        self.induced_vel_tangential = tangential;
    }

    /// Axial velocity through the disk [m/s].
    pub fn disk_axial_velocity(&self) -> f64 {
        self.axial_inflow + self.induced_vel_axial
    }

    /// Tangential velocity seen by the blade [m/s].
    pub fn disk_tangential_velocity(&self) -> f64 {
        self.tangential_inflow - self.induced_vel_tangential
    }

    /// λ = (V_ax + v_i) / ΩR
    pub fn inflow_ratio(&self) -> f64 {
        self.disk_axial_velocity() / self.tip_speed
    }

    pub fn set_inflow_ratio(&mut self, lambda: f64) {
        self.induced_vel_axial = lambda * self.tip_speed - self.axial_inflow;
    }

    /// ξ = (V_tg − u_i) / ΩR
    pub fn swirl_ratio(&self) -> f64 {
        self.disk_tangential_velocity() / self.tip_speed
    }

    pub fn set_swirl_ratio(&mut self, xi: f64) {
        self.induced_vel_tangential = self.tangential_inflow - xi * self.tip_speed;
    }

    /// λ_i = v_i / ΩR
    pub fn induced_inflow_ratio(&self) -> f64 {
        self.induced_vel_axial / self.tip_speed
    }

    /// ξ_i = u_i / ΩR
    pub fn induced_swirl_ratio(&self) -> f64 {
        self.induced_vel_tangential / self.tip_speed
    }

    /// a = v_i / V_ax; non-finite in hover.
    pub fn axial_induction(&self) -> f64 {
        self.induced_vel_axial / self.axial_inflow
    }

    /// b = u_i / V_tg
    pub fn tangential_induction(&self) -> f64 {
        self.induced_vel_tangential / self.tangential_inflow
    }

    /// W = |(V_ax + v_i, V_tg − u_i)|
    pub fn relative_velocity(&self) -> f64 {
        self.disk_axial_velocity()
            .hypot(self.disk_tangential_velocity())
    }

    pub fn forces(&self) -> Option<&ElementForces> {
        self.forces.as_ref()
    }

    pub fn set_forces(&mut self, forces: ElementForces) {
        self.forces = Some(forces);
    }
}
