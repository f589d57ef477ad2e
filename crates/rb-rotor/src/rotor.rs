//! Rotor definition: blade count, blade and axial position in a stack.

use crate::error::{RotorError, RotorResult};
use crate::geometry::{Blade, SolidityDef};
use std::f64::consts::PI;

#[derive(Clone, Debug)]
pub struct Rotor {
    pub name: String,
    pub n_blades: usize,
    /// Axial position along the shaft [m], positive downstream
    pub position: f64,
    blade: Blade,
}

impl Rotor {
    pub fn new(name: impl Into<String>, n_blades: usize, blade: Blade) -> RotorResult<Self> {
        if n_blades == 0 {
            return Err(RotorError::InvalidGeometry {
                what: "rotor needs at least one blade",
            });
        }
        Ok(Self {
            name: name.into(),
            n_blades,
            position: 0.0,
            blade,
        })
    }

    pub fn with_position(mut self, position: f64) -> Self {
        self.position = position;
        self
    }

    pub fn blade(&self) -> &Blade {
        &self.blade
    }

    /// Tip radius R [m]
    pub fn radius(&self) -> f64 {
        self.blade.tip_radius()
    }

    pub fn root_cutout(&self) -> f64 {
        self.blade.root_cutout()
    }

    pub fn diameter(&self) -> f64 {
        2.0 * self.radius()
    }

    /// Swept disk area πR² [m²]
    pub fn disk_area(&self) -> f64 {
        PI * self.radius().powi(2)
    }

    /// Solidity of each element under the chosen definition.
    pub fn solidity(&self, def: SolidityDef) -> Vec<f64> {
        let b = self.n_blades as f64;
        let r = self.radius();
        match def {
            SolidityDef::LocalChord => self
                .blade
                .elements()
                .iter()
                .map(|e| b * e.chord / (PI * r))
                .collect(),
            SolidityDef::BladeArea => {
                let sigma = b * self.blade.area() / (PI * r * r);
                vec![sigma; self.blade.n_elem()]
            }
        }
    }

    /// Check that every element's airfoil index exists in a provider of
    /// `n_airfoils` airfoils.
    pub fn check_airfoils(&self, n_airfoils: usize) -> RotorResult<()> {
        if self
            .blade
            .elements()
            .iter()
            .any(|e| e.airfoil_index >= n_airfoils)
        {
            return Err(RotorError::InvalidGeometry {
                what: "blade references an airfoil the provider does not define",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Discretization, GuideStations};

    fn rotor() -> Rotor {
        let blade = Blade::new(
            GuideStations::rectangular(0.2, 1.0, 0.1, 0.0),
            Discretization {
                n_elem: 10,
                ..Default::default()
            },
        )
        .unwrap();
        Rotor::new("main", 4, blade).unwrap()
    }

    #[test]
    fn solidity_definitions() {
        let r = rotor();
        let local = r.solidity(SolidityDef::LocalChord);
        assert!(local.iter().all(|s| (s - 0.4 / PI).abs() < 1e-12));

        // 4 blades × 0.08 m² over π m²
        let area = r.solidity(SolidityDef::BladeArea);
        assert_eq!(area.len(), 10);
        assert!((area[0] - 0.32 / PI).abs() < 1e-12);
    }

    #[test]
    fn zero_blades_rejected() {
        let blade = rotor().blade().clone();
        assert!(Rotor::new("bad", 0, blade).is_err());
    }

    #[test]
    fn airfoil_indices_are_checked() {
        let r = rotor();
        assert!(r.check_airfoils(1).is_ok());
        assert!(r.check_airfoils(0).is_err());
    }
}
