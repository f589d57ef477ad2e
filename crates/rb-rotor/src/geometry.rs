//! Blade geometry: guide stations, interpolation and spanwise discretization.

use crate::error::{RotorError, RotorResult};
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

/// Spanwise distribution of element edges between root cutout and tip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Spacing {
    /// Equal-width elements.
    #[default]
    Linear,
    /// Half-cosine distribution, clustering elements at root and tip.
    Cosine,
}

/// How chord and twist are interpolated between guide stations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StationInterp {
    Linear,
    /// Natural cubic spline (zero curvature at both ends).
    #[default]
    Spline,
}

/// Rotor solidity definition.
///
/// The literature form uses the local chord over the tip radius and is what
/// every solver formula in this workspace was written against. The blade-area
/// form spreads the geometric rotor solidity uniformly over the span; it is
/// kept selectable because neither form has been verified against test data
/// for tapered blades.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SolidityDef {
    /// σ_i = B·c_i / (π·R)
    #[default]
    LocalChord,
    /// σ = B·A_blade / (π·R²), same value for every element
    BladeArea,
}

/// Blade description at a few radial guide stations.
#[derive(Clone, Debug, PartialEq)]
pub struct GuideStations {
    /// Absolute radius of each station [m]; first is the root cutout, last the tip
    pub radius: Vec<f64>,
    /// Chord [m]
    pub chord: Vec<f64>,
    /// Twist [rad]
    pub twist: Vec<f64>,
    /// Airfoil index used from this station outboard
    pub airfoil: Vec<usize>,
}

impl GuideStations {
    /// Constant chord, constant twist blade with a single airfoil.
    pub fn rectangular(root_cutout: f64, tip: f64, chord: f64, twist: f64) -> Self {
        Self {
            radius: vec![root_cutout, tip],
            chord: vec![chord, chord],
            twist: vec![twist, twist],
            airfoil: vec![0, 0],
        }
    }

    pub fn validate(&self) -> RotorResult<()> {
        let n = self.radius.len();
        if n < 2 {
            return Err(RotorError::InvalidGeometry {
                what: "at least two guide stations are required",
            });
        }
        for (what, len) in [
            ("guide station chord", self.chord.len()),
            ("guide station twist", self.twist.len()),
            ("guide station airfoil", self.airfoil.len()),
        ] {
            if len != n {
                return Err(RotorError::LengthMismatch {
                    what,
                    expected: n,
                    got: len,
                });
            }
        }
        if !(self.radius[0] >= 0.0) {
            return Err(RotorError::InvalidGeometry {
                what: "root cutout must be non-negative",
            });
        }
        if self.radius.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(RotorError::InvalidGeometry {
                what: "guide station radii must be strictly increasing",
            });
        }
        if self.chord.iter().any(|&c| !(c > 0.0) || !c.is_finite()) {
            return Err(RotorError::InvalidGeometry {
                what: "chord must be positive",
            });
        }
        if self.twist.iter().any(|t| !t.is_finite()) {
            return Err(RotorError::InvalidGeometry {
                what: "twist must be finite",
            });
        }
        Ok(())
    }

    pub fn root_cutout(&self) -> f64 {
        self.radius[0]
    }

    pub fn tip_radius(&self) -> f64 {
        self.radius[self.radius.len() - 1]
    }

    /// Airfoil of the station interval containing `y` (inboard station wins).
    fn airfoil_at(&self, y: f64) -> usize {
        let idx = self.radius.partition_point(|&r| r <= y);
        self.airfoil[idx.saturating_sub(1).min(self.airfoil.len() - 1)]
    }
}

/// Natural cubic spline through `(xs, ys)`.
#[derive(Clone, Debug)]
pub(crate) struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at the knots
    m: Vec<f64>,
}

impl CubicSpline {
    pub(crate) fn natural(xs: &[f64], ys: &[f64]) -> RotorResult<Self> {
        let n = xs.len();
        if n < 2 || ys.len() != n {
            return Err(RotorError::Spline {
                what: "spline needs at least two knots of matching length",
            });
        }
        let mut m = vec![0.0; n];

        if n > 2 {
            let k = n - 2;
            let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
            let mut a = DMatrix::<f64>::zeros(k, k);
            let mut rhs = DVector::<f64>::zeros(k);
            for row in 0..k {
                let i = row + 1;
                a[(row, row)] = 2.0 * (h[i - 1] + h[i]);
                if row > 0 {
                    a[(row, row - 1)] = h[i - 1];
                }
                if row + 1 < k {
                    a[(row, row + 1)] = h[i];
                }
                rhs[row] =
                    6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
            }
            let sol = a.lu().solve(&rhs).ok_or(RotorError::Spline {
                what: "singular spline system",
            })?;
            m[1..(k + 1)].copy_from_slice(sol.as_slice());
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m,
        })
    }

    pub(crate) fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let i = match self.xs.partition_point(|&xi| xi <= x) {
            0 => 0,
            j if j >= n => n - 2,
            j => j - 1,
        };
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a.powi(3) - a) * self.m[i] + (b.powi(3) - b) * self.m[i + 1]) * h * h / 6.0
    }
}

fn interpolate(method: StationInterp, xs: &[f64], ys: &[f64], at: &[f64]) -> RotorResult<Vec<f64>> {
    match method {
        StationInterp::Linear => Ok(at
            .iter()
            .map(|&x| rb_core::numeric::interp_linear(xs, ys, x, true))
            .collect()),
        StationInterp::Spline => {
            let spline = CubicSpline::natural(xs, ys)?;
            Ok(at.iter().map(|&x| spline.eval(x)).collect())
        }
    }
}

/// Element edge positions between `root` and `tip`.
pub fn element_edges(root: f64, tip: f64, n_elem: usize, spacing: Spacing) -> Vec<f64> {
    (0..=n_elem)
        .map(|j| {
            let s = j as f64 / n_elem as f64;
            let frac = match spacing {
                Spacing::Linear => s,
                Spacing::Cosine => 0.5 * (1.0 - (PI * s).cos()),
            };
            root + (tip - root) * frac
        })
        .collect()
}

/// One spanwise slice of the blade.
#[derive(Clone, Debug, PartialEq)]
pub struct BladeElement {
    /// Non-dimensional radius y/R
    pub relative_radius: f64,
    /// Radius of the element centre [m]
    pub absolute_radius: f64,
    /// Element width [m]
    pub span: f64,
    /// Planform area chord·span [m²]
    pub area: f64,
    /// Chord [m]
    pub chord: f64,
    /// Twist [rad]
    pub twist: f64,
    pub airfoil_index: usize,
}

/// Discretization controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Discretization {
    pub n_elem: usize,
    pub spacing: Spacing,
    pub interp: StationInterp,
}

impl Default for Discretization {
    fn default() -> Self {
        Self {
            n_elem: 50,
            spacing: Spacing::default(),
            interp: StationInterp::default(),
        }
    }
}

/// Discretized blade (all blades of a rotor are identical).
#[derive(Clone, Debug)]
pub struct Blade {
    stations: GuideStations,
    elements: Vec<BladeElement>,
}

impl Blade {
    pub fn new(stations: GuideStations, disc: Discretization) -> RotorResult<Self> {
        stations.validate()?;
        if disc.n_elem == 0 {
            return Err(RotorError::InvalidGeometry {
                what: "number of elements must be positive",
            });
        }

        let root = stations.root_cutout();
        let tip = stations.tip_radius();
        let edges = element_edges(root, tip, disc.n_elem, disc.spacing);
        let centres: Vec<f64> = edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();

        let chord = interpolate(disc.interp, &stations.radius, &stations.chord, &centres)?;
        let twist = interpolate(disc.interp, &stations.radius, &stations.twist, &centres)?;

        let mut elements = Vec::with_capacity(disc.n_elem);
        for (i, &y) in centres.iter().enumerate() {
            if !(chord[i] > 0.0) {
                return Err(RotorError::InvalidGeometry {
                    what: "interpolated chord is not positive (spline overshoot?)",
                });
            }
            let span = edges[i + 1] - edges[i];
            elements.push(BladeElement {
                relative_radius: y / tip,
                absolute_radius: y,
                span,
                area: chord[i] * span,
                chord: chord[i],
                twist: twist[i],
                airfoil_index: stations.airfoil_at(y),
            });
        }

        Ok(Self { stations, elements })
    }

    pub fn elements(&self) -> &[BladeElement] {
        &self.elements
    }

    pub fn n_elem(&self) -> usize {
        self.elements.len()
    }

    pub fn stations(&self) -> &GuideStations {
        &self.stations
    }

    pub fn tip_radius(&self) -> f64 {
        self.stations.tip_radius()
    }

    pub fn root_cutout(&self) -> f64 {
        self.stations.root_cutout()
    }

    /// Planform area of one blade [m²].
    pub fn area(&self) -> f64 {
        self.elements.iter().map(|e| e.area).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_edges_are_uniform() {
        let e = element_edges(0.1, 1.0, 9, Spacing::Linear);
        assert_eq!(e.len(), 10);
        assert!((e[1] - e[0] - 0.1).abs() < 1e-12);
        assert!((e[9] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_edges_cluster_at_ends() {
        let e = element_edges(0.0, 1.0, 10, Spacing::Cosine);
        let first = e[1] - e[0];
        let middle = e[6] - e[5];
        assert!(first < middle);
        assert!((e[10] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn spline_reproduces_knots_and_lines() {
        let xs = [0.0, 1.0, 2.5, 4.0];
        let ys = [1.0, 3.0, 6.0, 9.0];
        let s = CubicSpline::natural(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(&ys) {
            assert!((s.eval(*x) - y).abs() < 1e-12);
        }
        // A straight line has zero curvature everywhere
        let line = CubicSpline::natural(&[0.0, 1.0, 3.0], &[0.0, 2.0, 6.0]).unwrap();
        assert!((line.eval(2.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn rectangular_blade_elements() {
        let stations = GuideStations::rectangular(0.1, 1.0, 0.1, 0.0);
        let blade = Blade::new(
            stations,
            Discretization {
                n_elem: 18,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(blade.n_elem(), 18);
        let total_span: f64 = blade.elements().iter().map(|e| e.span).sum();
        assert!((total_span - 0.9).abs() < 1e-12);
        assert!((blade.area() - 0.09).abs() < 1e-12);
        assert!(
            blade
                .elements()
                .windows(2)
                .all(|w| w[1].absolute_radius > w[0].absolute_radius)
        );
        assert!(blade.elements().iter().all(|e| (e.chord - 0.1).abs() < 1e-12));
    }

    #[test]
    fn airfoil_follows_inboard_station() {
        let stations = GuideStations {
            radius: vec![0.2, 0.5, 1.0],
            chord: vec![0.1, 0.1, 0.1],
            twist: vec![0.2, 0.1, 0.0],
            airfoil: vec![0, 1, 1],
        };
        let blade = Blade::new(
            stations,
            Discretization {
                n_elem: 8,
                spacing: Spacing::Linear,
                interp: StationInterp::Linear,
            },
        )
        .unwrap();
        for e in blade.elements() {
            let expected = if e.absolute_radius < 0.5 { 0 } else { 1 };
            assert_eq!(e.airfoil_index, expected);
        }
    }

    #[test]
    fn invalid_stations_are_rejected() {
        let mut s = GuideStations::rectangular(0.1, 1.0, 0.1, 0.0);
        s.radius = vec![1.0, 0.1];
        assert!(s.validate().is_err());

        let mut s = GuideStations::rectangular(0.1, 1.0, 0.1, 0.0);
        s.chord = vec![0.1];
        assert!(matches!(
            s.validate(),
            Err(RotorError::LengthMismatch { expected: 2, got: 1, .. })
        ));

        let s = GuideStations::rectangular(0.1, 1.0, -0.1, 0.0);
        assert!(s.validate().is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn elements_tile_the_span(
            n_elem in 1usize..80,
            root in 0.0f64..0.5,
            len in 0.1f64..5.0,
            cosine in any::<bool>(),
        ) {
            let tip = root + len;
            let spacing = if cosine { Spacing::Cosine } else { Spacing::Linear };
            let blade = Blade::new(
                GuideStations::rectangular(root, tip, 0.05, 0.1),
                Discretization { n_elem, spacing, interp: StationInterp::Spline },
            ).unwrap();
            let span: f64 = blade.elements().iter().map(|e| e.span).sum();
            prop_assert!((span - len).abs() < 1e-9 * tip);
            prop_assert!(blade.elements().iter().all(|e| e.relative_radius > 0.0 && e.relative_radius <= 1.0));
        }
    }
}
