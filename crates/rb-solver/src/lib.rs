//! Blade Element Momentum Theory solvers.
//!
//! Four interchangeable formulations find, for every blade element, the
//! induced flow that satisfies both annular momentum and blade-element
//! loading. Elemental loads are then integrated into rotor totals.

mod common;

pub mod coefficients;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod forces;
pub mod indfact;
pub mod indvel;
pub mod leishman;
pub mod loss;
pub mod perf;
pub mod root;
pub mod stahlhut;
pub mod wake;

pub use coefficients::{CoefficientKind, Coefficients, Convention, coefficients, coefficients_of};
pub use config::{LossType, ModelConfig, Quadrature, SolveReport, SolverKind};
pub use dispatch::{bemt, solve};
pub use error::{SolverError, SolverResult};
pub use forces::calc_forces;
pub use loss::{loss_factor, loss_factor_at, loss_split};
pub use perf::calc_perf;
pub use root::ResidualCurve;
pub use stahlhut::{Bracket, IND_ANGLE_ZERO, select_bracket};
pub use wake::{UpstreamField, wake_contraction};
