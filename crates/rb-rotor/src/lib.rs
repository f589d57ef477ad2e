//! rb-rotor: blade geometry and the per-element state solved by rb-solver.

pub mod element;
pub mod error;
pub mod geometry;
pub mod operating;
pub mod rotor;

pub use element::{ElementForces, ElementState};
pub use error::{RotorError, RotorResult};
pub use geometry::{
    Blade, BladeElement, Discretization, GuideStations, SolidityDef, Spacing, StationInterp,
    element_edges,
};
pub use operating::{OperatingPoint, RotorOperatingState, RotorPerformance};
pub use rotor::Rotor;
