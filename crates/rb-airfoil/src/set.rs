//! Heterogeneous airfoil set.
//!
//! Blades may mix airfoils described by different models. [`AirfoilSet`]
//! concatenates providers so that a single airfoil index space addresses all
//! of them.

use crate::error::{AirfoilError, AirfoilResult};
use crate::model::{AeroCoeffs, AirfoilCoeffProvider, check_index};

/// Concatenation of providers. Index `i` maps to the provider holding the
/// `i`-th airfoil overall.
#[derive(Default)]
pub struct AirfoilSet {
    providers: Vec<Box<dyn AirfoilCoeffProvider>>,
    /// (provider, local index) per global index
    lookup: Vec<(usize, usize)>,
}

impl AirfoilSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every airfoil of `provider`; returns the global index of its first airfoil.
    pub fn push(&mut self, provider: Box<dyn AirfoilCoeffProvider>) -> AirfoilResult<usize> {
        let count = provider.n_airfoils();
        if count == 0 {
            return Err(AirfoilError::InvalidArg {
                what: "provider has no airfoils",
            });
        }
        let first = self.lookup.len();
        let p = self.providers.len();
        self.lookup.extend((0..count).map(|local| (p, local)));
        self.providers.push(provider);
        Ok(first)
    }

    fn resolve(&self, airfoil: usize) -> AirfoilResult<(&dyn AirfoilCoeffProvider, usize)> {
        check_index(airfoil, self.lookup.len())?;
        let (p, local) = self.lookup[airfoil];
        Ok((self.providers[p].as_ref(), local))
    }
}

impl std::fmt::Debug for AirfoilSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("AirfoilSet")
            .field("providers", &names)
            .field("n_airfoils", &self.lookup.len())
            .finish()
    }
}

impl AirfoilCoeffProvider for AirfoilSet {
    fn name(&self) -> &str {
        "airfoil-set"
    }

    fn n_airfoils(&self) -> usize {
        self.lookup.len()
    }

    fn coeffs(&self, airfoil: usize, alpha: f64, reynolds: f64) -> AirfoilResult<AeroCoeffs> {
        let (provider, local) = self.resolve(airfoil)?;
        provider.coeffs(local, alpha, reynolds)
    }

    fn lift_slope(&self, airfoil: usize, reynolds: f64) -> AirfoilResult<f64> {
        let (provider, local) = self.resolve(airfoil)?;
        provider.lift_slope(local, reynolds)
    }
}
