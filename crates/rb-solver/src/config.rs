//! Solver selection, numerical settings and the solve report.

use crate::error::{SolverError, SolverResult};
use rb_rotor::SolidityDef;
use std::fmt;
use std::str::FromStr;

/// The four BEMT formulations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolverKind {
    /// Closed-form inflow ratio (helicopter hover/climb)
    Leishman,
    /// Fixed-point iteration on induction factors (propellers)
    IndFact,
    /// Fixed-point iteration on slipstream velocities (turbines)
    IndVel,
    /// Per-element root find on the inflow angle
    Stahlhut,
}

impl SolverKind {
    pub const ALL: [SolverKind; 4] = [
        SolverKind::Leishman,
        SolverKind::IndFact,
        SolverKind::IndVel,
        SolverKind::Stahlhut,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SolverKind::Leishman => "leishman",
            SolverKind::IndFact => "indfact",
            SolverKind::IndVel => "indvel",
            SolverKind::Stahlhut => "stahlhut",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SolverKind::Leishman => "closed-form inflow ratio, helicopter rotors in hover and climb",
            SolverKind::IndFact => "induction factors by relaxed fixed point, propellers",
            SolverKind::IndVel => "slipstream velocities by relaxed fixed point, all regimes",
            SolverKind::Stahlhut => "inflow angle root find per element, climb/hover/descent",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        SolverKind::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| SolverError::InvalidConfig {
                what: format!("unknown solver '{s}'"),
            })
    }
}

/// Prandtl loss correction applied at the tip, the hub, both or neither.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LossType {
    #[default]
    None,
    Hub,
    Tip,
    All,
}

impl LossType {
    pub fn name(self) -> &'static str {
        match self {
            LossType::None => "none",
            LossType::Hub => "hub",
            LossType::Tip => "tip",
            LossType::All => "all",
        }
    }
}

impl FromStr for LossType {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(LossType::None),
            "hub" => Ok(LossType::Hub),
            "tip" => Ok(LossType::Tip),
            "all" | "both" => Ok(LossType::All),
            _ => Err(SolverError::InvalidConfig {
                what: format!("unknown loss type '{s}'"),
            }),
        }
    }
}

/// Spanwise quadrature of elemental loads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Quadrature {
    /// Trapezoidal rule on load per unit span at element centres
    #[default]
    Trapezoidal,
    /// Plain sum of elemental loads
    Rectangular,
}

/// Numerical model settings shared by every solver.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    pub solver: SolverKind,
    pub loss: LossType,
    /// Relative tolerance of the convergence tests
    pub convergence_tol: f64,
    pub max_iter: usize,
    /// Under-relaxation factor in (0, 1]
    pub relax: f64,
    pub integration: Quadrature,
    pub solidity: SolidityDef,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            solver: SolverKind::Stahlhut,
            loss: LossType::All,
            convergence_tol: 1e-4,
            max_iter: 500,
            relax: 0.1,
            integration: Quadrature::default(),
            solidity: SolidityDef::default(),
        }
    }
}

impl ModelConfig {
    pub fn new(solver: SolverKind) -> Self {
        Self {
            solver,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> SolverResult<()> {
        if !(self.convergence_tol > 0.0) || !self.convergence_tol.is_finite() {
            return Err(SolverError::InvalidConfig {
                what: format!(
                    "convergence tolerance must be positive, got {}",
                    self.convergence_tol
                ),
            });
        }
        if self.max_iter == 0 {
            return Err(SolverError::InvalidConfig {
                what: "max_iter must be at least 1".to_string(),
            });
        }
        if !(self.relax > 0.0 && self.relax <= 1.0) {
            return Err(SolverError::InvalidConfig {
                what: format!("relaxation factor must be in (0, 1], got {}", self.relax),
            });
        }
        Ok(())
    }
}

/// Outcome of a successful solve.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolveReport {
    pub solver: Option<SolverKind>,
    pub converged: bool,
    pub iterations: usize,
    pub warnings: Vec<String>,
}

impl SolveReport {
    pub(crate) fn converged(solver: SolverKind, iterations: usize) -> Self {
        Self {
            solver: Some(solver),
            converged: true,
            iterations,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn capped(solver: SolverKind, iterations: usize) -> Self {
        Self {
            solver: Some(solver),
            converged: false,
            iterations,
            warnings: vec![format!(
                "{solver}: not converged after {iterations} iterations, keeping last iterate"
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_names_parse_case_insensitively() {
        assert_eq!("Stahlhut".parse::<SolverKind>().unwrap(), SolverKind::Stahlhut);
        assert_eq!(" INDFACT ".parse::<SolverKind>().unwrap(), SolverKind::IndFact);
        assert!("newton".parse::<SolverKind>().is_err());
        for kind in SolverKind::ALL {
            assert_eq!(kind.to_string().parse::<SolverKind>().unwrap(), kind);
        }
    }

    #[test]
    fn loss_type_accepts_both_alias() {
        assert_eq!("both".parse::<LossType>().unwrap(), LossType::All);
        assert_eq!("Tip".parse::<LossType>().unwrap(), LossType::Tip);
        assert!("prandtl".parse::<LossType>().is_err());
    }

    #[test]
    fn validation_rejects_bad_numerics() {
        assert!(ModelConfig::default().validate().is_ok());

        let mut cfg = ModelConfig::default();
        cfg.convergence_tol = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = ModelConfig::default();
        cfg.max_iter = 0;
        assert!(cfg.validate().is_err());

        for relax in [0.0, -0.5, 1.5, f64::NAN] {
            let mut cfg = ModelConfig::default();
            cfg.relax = relax;
            assert!(cfg.validate().is_err(), "relax={relax}");
        }
        let mut cfg = ModelConfig::default();
        cfg.relax = 1.0;
        assert!(cfg.validate().is_ok());
    }
}
